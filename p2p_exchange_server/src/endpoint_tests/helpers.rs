use actix_web::{http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use chrono::{TimeZone, Utc};
use log::debug;
use p2p_exchange_engine::db_types::{ExchangeSession, NewExchangeSession, Order, OrderStatusType, SessionStatus};
use pxg_common::CryptoCurrency;

use crate::server::configure_extractors;

pub const BUYER_CARD: &str = "4276123456789014";
pub const SELLER_CARD: &str = "4276234567890128";
pub const SESSION_ID: &str = "00112233445566778899aabbccddeeff";

pub async fn send_request(req: TestRequest, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    let app = App::new().configure(configure_extractors).configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}

pub async fn get_request(path: &str, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    send_request(TestRequest::get().uri(path), configure).await
}

pub async fn post_request(path: &str, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    send_request(TestRequest::post().uri(path), configure).await
}

pub fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).expect("Response was not JSON")
}

pub fn ton_order(id: i64, amount: f64, rate: f64) -> Order {
    Order {
        id,
        amount,
        crypto_amount: amount / rate,
        rate,
        currency: CryptoCurrency::Ton,
        seller_id: 2,
        status: OrderStatusType::Active,
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    }
}

pub fn session_from(new: NewExchangeSession) -> ExchangeSession {
    ExchangeSession {
        id: new.id,
        order_id: new.order_id,
        buyer_card: new.buyer_card,
        seller_card: new.seller_card,
        amount: new.amount,
        crypto_amount: new.crypto_amount,
        currency: new.currency,
        payment_status: SessionStatus::Pending,
        exchange_status: SessionStatus::Pending,
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap(),
    }
}

/// A TON session for 5000 against order #1, with the given statuses.
pub fn session_with(payment_status: SessionStatus, exchange_status: SessionStatus) -> ExchangeSession {
    ExchangeSession {
        id: SESSION_ID.into(),
        order_id: 1,
        buyer_card: BUYER_CARD.into(),
        seller_card: SELLER_CARD.into(),
        amount: 5_000.0,
        crypto_amount: 5_000.0 / 350.0,
        currency: CryptoCurrency::Ton,
        payment_status,
        exchange_status,
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 31, 0).unwrap(),
    }
}
