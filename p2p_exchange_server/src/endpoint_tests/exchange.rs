use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use chrono::{Duration, Utc};
use mockall::predicate::eq;
use p2p_exchange_engine::{
    db_types::SessionStatus,
    traits::{GatewayError, PayoutReceipt, TransferReceipt},
};
use pxg_common::CryptoCurrency;

use super::{
    helpers::{
        get_request,
        json,
        post_request,
        send_request,
        session_from,
        session_with,
        ton_order,
        SELLER_CARD,
        SESSION_ID,
    },
    mocks::{flow_api, MockBank, MockCrypto, MockExchangeDb},
};
use crate::routes::{ConfirmRoute, CurrenciesRoute, ExchangeStatusRoute, MatchOrderRoute, SessionRoute};

fn register(cfg: &mut ServiceConfig, db: MockExchangeDb, bank: MockBank, crypto: MockCrypto) {
    cfg.service(MatchOrderRoute::<MockExchangeDb, MockBank, MockCrypto>::new())
        .service(ExchangeStatusRoute::<MockExchangeDb, MockBank, MockCrypto>::new())
        .service(ConfirmRoute::<MockExchangeDb, MockBank, MockCrypto>::new())
        .service(SessionRoute::<MockExchangeDb, MockBank, MockCrypto>::new())
        .service(CurrenciesRoute::new())
        .app_data(web::Data::new(flow_api(db, bank, crypto)));
}

//----------------------------------------------   Match  ----------------------------------------------------

fn configure_matching(cfg: &mut ServiceConfig) {
    let mut db = MockExchangeDb::new();
    db.expect_find_best_order().returning(|currency, window| {
        let order = ton_order(1, 5_000.0, 350.0);
        Ok((currency == CryptoCurrency::Ton && window.contains(order.amount)).then_some(order))
    });
    db.expect_fetch_seller_card().with(eq(1)).returning(|_| Ok(Some(SELLER_CARD.to_string())));
    db.expect_create_session().returning(|new| Ok(session_from(new)));
    register(cfg, db, MockBank::new(), MockCrypto::new());
}

#[actix_web::test]
async fn match_order_from_json() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri("/match")
        .set_json(serde_json::json!({"amount": 5000, "card_number": "4276 1234 5678 9014", "currency": "TON"}));
    let (status, body) = send_request(req, configure_matching).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let body = json(&body);
    assert_eq!(body["success"], true);
    assert_eq!(body["order"]["id"], 1);
    assert_eq!(body["order"]["amount"], 5000.0);
    assert_eq!(body["order"]["rate"], 350.0);
    assert_eq!(body["order"]["currency"], "TON");
    let crypto_amount = body["order"]["crypto_amount"].as_f64().unwrap();
    assert!((crypto_amount - 14.2857).abs() < 1e-4);
    assert_eq!(body["seller_card"], "4276 **** **** 0128");
    let session_id = body["session_id"].as_str().unwrap();
    assert_eq!(session_id.len(), 32);
    assert_eq!(body["next_step_url"], format!("confirm?session_id={session_id}"));
}

#[actix_web::test]
async fn match_order_from_form() {
    let _ = env_logger::try_init().ok();
    // No currency field: TON is the default
    let req = TestRequest::post()
        .uri("/match")
        .set_form([("amount", "4900"), ("card_number", "4276 1234 5678 9014")]);
    let (status, body) = send_request(req, configure_matching).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let body = json(&body);
    assert_eq!(body["order"]["amount"], 4900.0);
    assert_eq!(body["order"]["crypto_amount"], 14.0);
}

#[actix_web::test]
async fn match_order_without_a_matching_order() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri("/match")
        .set_json(serde_json::json!({"amount": 7500, "card_number": "4276123456789014"}));
    let (status, body) = send_request(req, configure_matching).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["error"], "The data was not found. No suitable order found for 7500 in TON");
}

// The mock has no expectations, so any backend call fails the test.
fn configure_no_backend(cfg: &mut ServiceConfig) {
    register(cfg, MockExchangeDb::new(), MockBank::new(), MockCrypto::new());
}

#[actix_web::test]
async fn match_order_rejects_invalid_requests() {
    let _ = env_logger::try_init().ok();
    let cases = [
        (serde_json::json!({"amount": 500, "card_number": "4276123456789014"}), "at least 1000"),
        (serde_json::json!({"card_number": "4276123456789014"}), "An amount is required"),
        (serde_json::json!({"amount": 5000, "card_number": "4276 1234 5678"}), "exactly 16 digits"),
        (serde_json::json!({"amount": 5000}), "exactly 16 digits"),
        (serde_json::json!({"amount": 5000, "card_number": "4276-1234-5678-9014"}), "digits and spaces"),
        (serde_json::json!({"amount": 5000, "card_number": "4276123456789014", "currency": "DOGE"}), "DOGE"),
        (serde_json::json!({"amount": 4000, "card_number": "4276123456789014", "currency": "BTC"}), "BTC is 5000"),
    ];
    for (payload, expected) in cases {
        let req = TestRequest::post().uri("/match").set_json(&payload);
        let (status, body) = send_request(req, configure_no_backend).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        let message = json(&body)["error"].as_str().unwrap().to_string();
        assert!(message.contains(expected), "{message} does not contain {expected}");
    }
}

#[actix_web::test]
async fn match_order_malformed_json() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri("/match")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"amount": "#);
    let (status, body) = send_request(req, configure_no_backend).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].as_str().unwrap().starts_with("Payload deserialization error."));
}

#[actix_web::test]
async fn wrong_method_is_not_allowed() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/match", configure_no_backend).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json(&body)["error"], "Method not allowed");
    let (status, _) = get_request(&format!("/confirm?session_id={SESSION_ID}"), configure_no_backend).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    let (status, _) = post_request("/currencies", configure_no_backend).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

//----------------------------------------------   Status  ----------------------------------------------------

#[actix_web::test]
async fn status_requires_a_session_id() {
    let _ = env_logger::try_init().ok();
    for path in ["/status", "/status?session_id=", "/session", "/confirm"] {
        let req = if path == "/confirm" { TestRequest::post() } else { TestRequest::get() };
        let (status, body) = send_request(req.uri(path), configure_no_backend).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(json(&body)["error"], "A session_id is required");
    }
}

fn configure_unknown_session(cfg: &mut ServiceConfig) {
    let mut db = MockExchangeDb::new();
    db.expect_fetch_session().returning(|_| Ok(None));
    db.expect_claim_payment().returning(|_| Ok(None));
    register(cfg, db, MockBank::new(), MockCrypto::new());
}

#[actix_web::test]
async fn unknown_sessions() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/status?session_id=nope", configure_unknown_session).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["error"], "The data was not found. Exchange session nope does not exist");
    let (status, _) = get_request("/session?session_id=nope", configure_unknown_session).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = post_request("/confirm?session_id=nope", configure_unknown_session).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn configure_processing_payout(cfg: &mut ServiceConfig) {
    let mut db = MockExchangeDb::new();
    db.expect_fetch_session()
        .returning(|_| Ok(Some(session_with(SessionStatus::Success, SessionStatus::Processing))));
    db.expect_update_exchange_status()
        .with(eq(p2p_exchange_engine::db_types::SessionId::from(SESSION_ID)), eq(SessionStatus::Success))
        .times(1)
        .returning(|_, status| Ok(session_with(SessionStatus::Success, status)));
    register(cfg, db, MockBank::new(), MockCrypto::new());
}

#[actix_web::test]
async fn polling_completes_a_processing_payout() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request(&format!("/status?session_id={SESSION_ID}"), configure_processing_payout).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let body = json(&body);
    assert_eq!(body["payment_status"], "success");
    assert_eq!(body["exchange_status"], "success");
    assert_eq!(body["updated_at"], "2024-06-01T12:31:00Z");
}

fn configure_unpaid_session(cfg: &mut ServiceConfig) {
    let mut db = MockExchangeDb::new();
    db.expect_fetch_session().returning(|_| Ok(Some(session_with(SessionStatus::Pending, SessionStatus::Pending))));
    db.expect_update_exchange_status().never();
    db.expect_fetch_order().returning(|id| Ok(Some(ton_order(id, 5_000.0, 350.0))));
    register(cfg, db, MockBank::new(), MockCrypto::new());
}

#[actix_web::test]
async fn polling_an_unpaid_session_changes_nothing() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request(&format!("/status?session_id={SESSION_ID}"), configure_unpaid_session).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["payment_status"], "pending");
    assert_eq!(body["exchange_status"], "pending");
}

#[actix_web::test]
async fn session_view_masks_cards() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request(&format!("/session?session_id={SESSION_ID}"), configure_unpaid_session).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let body = json(&body);
    assert_eq!(body["session_id"], SESSION_ID);
    assert_eq!(body["order_id"], 1);
    assert_eq!(body["currency"], "TON");
    assert_eq!(body["currency_name"], "Toncoin");
    assert_eq!(body["fiat_currency"], "RUB");
    assert_eq!(body["rate"], 350.0);
    assert_eq!(body["buyer_card"], "4276 **** **** 9014");
    assert_eq!(body["seller_card"], "4276 **** **** 0128");
    assert_eq!(body["payment_status_text"], "Waiting");
    assert!(body.get("refresh_after_secs").is_none());
    assert!(body.get("payment_message").is_none());
    assert!(!body.to_string().contains("4276123456789014"));
}

//----------------------------------------------   Confirm  ----------------------------------------------------

fn configure_successful_confirm(cfg: &mut ServiceConfig) {
    let mut db = MockExchangeDb::new();
    db.expect_claim_payment()
        .times(1)
        .returning(|_| Ok(Some(session_with(SessionStatus::Processing, SessionStatus::Pending))));
    db.expect_fetch_session().never();
    db.expect_update_payment_status()
        .with(mockall::predicate::always(), eq(SessionStatus::Success))
        .times(1)
        .returning(|_, status| Ok(session_with(status, SessionStatus::Pending)));
    db.expect_update_exchange_status()
        .with(mockall::predicate::always(), eq(SessionStatus::Processing))
        .times(1)
        .returning(|_, status| Ok(session_with(SessionStatus::Success, status)));
    db.expect_fetch_order().returning(|id| Ok(Some(ton_order(id, 5_000.0, 350.0))));
    let mut bank = MockBank::new();
    bank.expect_card_to_card()
        .withf(|t| t.amount == 5_000.0 && t.to_card == SELLER_CARD && t.description == "P2P exchange TON #1")
        .times(1)
        .returning(|_| {
            Ok(TransferReceipt {
                status: SessionStatus::Success,
                transaction_id: Some("TX0123456789ABCDEF".into()),
                message: "Transfer completed".into(),
            })
        });
    let mut crypto = MockCrypto::new();
    crypto.expect_send_payout().withf(|p| p.order_id == 1 && p.currency == CryptoCurrency::Ton).times(1).returning(
        |_| {
            Ok(PayoutReceipt {
                status: SessionStatus::Processing,
                transaction_id: Some("0xabc".into()),
                message: "Payout submitted".into(),
                estimated_completion: Some(Utc::now() + Duration::minutes(5)),
            })
        },
    );
    register(cfg, db, bank, crypto);
}

#[actix_web::test]
async fn confirm_charges_the_buyer_and_starts_the_payout() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_request(&format!("/confirm?session_id={SESSION_ID}"), configure_successful_confirm).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let body = json(&body);
    assert_eq!(body["payment_status"], "success");
    assert_eq!(body["exchange_status"], "processing");
    assert_eq!(body["exchange_status_text"], "In progress");
    assert_eq!(body["refresh_after_secs"], 30);
    assert_eq!(body["payment_message"], "Transfer completed");
    assert_eq!(body["payout_message"], "Payout submitted");
    assert_eq!(body["payout_transaction_id"], "0xabc");
    assert!(body["estimated_completion"].is_string());
}

fn configure_declined_confirm(cfg: &mut ServiceConfig) {
    let mut db = MockExchangeDb::new();
    db.expect_claim_payment()
        .times(1)
        .returning(|_| Ok(Some(session_with(SessionStatus::Processing, SessionStatus::Pending))));
    db.expect_fetch_session().never();
    db.expect_update_payment_status()
        .with(mockall::predicate::always(), eq(SessionStatus::Error))
        .times(1)
        .returning(|_, status| Ok(session_with(status, SessionStatus::Pending)));
    db.expect_update_exchange_status().never();
    db.expect_fetch_order().returning(|_| Ok(None));
    let mut bank = MockBank::new();
    bank.expect_card_to_card().times(1).returning(|_| Err(GatewayError::Unreachable("connection refused".into())));
    let mut crypto = MockCrypto::new();
    crypto.expect_send_payout().never();
    register(cfg, db, bank, crypto);
}

#[actix_web::test]
async fn failed_payment_skips_the_payout() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_request(&format!("/confirm?session_id={SESSION_ID}"), configure_declined_confirm).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let body = json(&body);
    assert_eq!(body["payment_status"], "error");
    assert_eq!(body["exchange_status"], "pending");
    assert_eq!(body["payment_message"], "The gateway could not be reached: connection refused");
    assert!(body["rate"].is_null());
    assert!(body.get("payout_message").is_none());
    assert!(body.get("refresh_after_secs").is_none());
}

fn configure_repeat_confirm(cfg: &mut ServiceConfig) {
    let mut db = MockExchangeDb::new();
    db.expect_claim_payment().times(1).returning(|_| Ok(None));
    db.expect_fetch_session()
        .returning(|_| Ok(Some(session_with(SessionStatus::Success, SessionStatus::Processing))));
    db.expect_update_payment_status().never();
    db.expect_fetch_order().returning(|id| Ok(Some(ton_order(id, 5_000.0, 350.0))));
    let mut bank = MockBank::new();
    bank.expect_card_to_card().never();
    register(cfg, db, bank, MockCrypto::new());
}

#[actix_web::test]
async fn confirming_twice_does_not_charge_again() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_request(&format!("/confirm?session_id={SESSION_ID}"), configure_repeat_confirm).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let body = json(&body);
    assert_eq!(body["payment_status"], "success");
    assert!(body.get("payment_message").is_none());
}

//----------------------------------------------   Currencies  ----------------------------------------------------

#[actix_web::test]
async fn currency_catalogue() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/currencies", configure_no_backend).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["fiat_currency"], "RUB");
    assert_eq!(body["default_currency"], "TON");
    let currencies = body["currencies"].as_array().unwrap();
    assert_eq!(currencies.len(), 4);
    let btc = currencies.iter().find(|c| c["code"] == "BTC").unwrap();
    assert_eq!(btc["full_name"], "Bitcoin");
    assert_eq!(btc["min_amount"], 5000.0);
    assert_eq!(btc["reference_rate"], 5_000_000.0);
}
