use actix_web::{test, test::TestRequest, web, web::ServiceConfig, App};
use p2p_exchange_engine::{
    test_utils::prepare_env::seeded_test_db,
    traits::ExchangeDatabase,
    ExchangeFlowApi,
    FlowOptions,
    SimulatedBank,
    SimulatedCryptoNetwork,
    SqliteDatabase,
};
use pxg_common::Secret;
use serde_json::Value;

use crate::{
    routes::{ConfirmRoute, ExchangeStatusRoute, MatchOrderRoute, SessionRoute},
    server::configure_extractors,
};

type Bank = SimulatedBank;
type Crypto = SimulatedCryptoNetwork;

fn register(cfg: &mut ServiceConfig, db: SqliteDatabase) {
    let bank = SimulatedBank::new(Secret::new("bank-key".into()), 1.0);
    let crypto = SimulatedCryptoNetwork::new(Secret::new("crypto-key".into()), chrono::Duration::seconds(60));
    cfg.service(MatchOrderRoute::<SqliteDatabase, Bank, Crypto>::new())
        .service(ExchangeStatusRoute::<SqliteDatabase, Bank, Crypto>::new())
        .service(ConfirmRoute::<SqliteDatabase, Bank, Crypto>::new())
        .service(SessionRoute::<SqliteDatabase, Bank, Crypto>::new())
        .app_data(web::Data::new(ExchangeFlowApi::new(db, bank, crypto, FlowOptions::new(1_000.0, 1.0))));
}

/// Runs a full exchange over HTTP against a real database. Every step goes through a separate connection pool.
#[actix_web::test]
async fn exchange_round_trip_on_sqlite() {
    let _ = env_logger::try_init().ok();
    let db = seeded_test_db().await;
    let url = db.url().to_string();
    let confirm_db = SqliteDatabase::new_with_url(&url, 2).await.expect("Error opening confirm pool");
    let status_db = SqliteDatabase::new_with_url(&url, 2).await.expect("Error opening status pool");
    let matcher = App::new().configure(configure_extractors).configure(|cfg| register(cfg, db));
    let matcher = test::init_service(matcher).await;
    let confirmer = App::new().configure(configure_extractors).configure(|cfg| register(cfg, confirm_db));
    let confirmer = test::init_service(confirmer).await;
    let poller = App::new().configure(configure_extractors).configure(|cfg| register(cfg, status_db));
    let poller = test::init_service(poller).await;

    let req = TestRequest::post()
        .uri("/match")
        .set_json(serde_json::json!({"amount": 5000, "card_number": "4111 1111 1111 1111", "currency": "TON"}))
        .to_request();
    let matched: Value = test::call_and_read_body_json(&matcher, req).await;
    assert_eq!(matched["success"], true);
    assert_eq!(matched["order"]["id"], 1);
    let session_id = matched["session_id"].as_str().expect("No session id").to_string();

    let req = TestRequest::post().uri(&format!("/confirm?session_id={session_id}")).to_request();
    let confirmed: Value = test::call_and_read_body_json(&confirmer, req).await;
    assert_eq!(confirmed["session_id"], session_id.as_str());
    assert_eq!(confirmed["payment_status"], "success");
    assert_eq!(confirmed["exchange_status"], "processing");
    assert_eq!(confirmed["buyer_card"], "4111 **** **** 1111");
    assert!(confirmed["payout_transaction_id"].as_str().is_some_and(|tx| tx.starts_with("0x")));

    let req = TestRequest::get().uri(&format!("/status?session_id={session_id}")).to_request();
    let status: Value = test::call_and_read_body_json(&poller, req).await;
    assert_eq!(status["payment_status"], "success");
    assert_eq!(status["exchange_status"], "success");

    let req = TestRequest::get().uri(&format!("/session?session_id={session_id}")).to_request();
    let view: Value = test::call_and_read_body_json(&matcher, req).await;
    assert_eq!(view["exchange_status"], "success");
    assert_eq!(view["exchange_status_text"], "Completed");
    assert_eq!(view["rate"], 350.0);

    let req = TestRequest::post().uri(&format!("/confirm?session_id={session_id}")).to_request();
    let again: Value = test::call_and_read_body_json(&matcher, req).await;
    assert_eq!(again["payment_status"], "success");
    assert!(again.get("payment_message").is_none());
}
