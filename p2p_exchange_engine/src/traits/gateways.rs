use chrono::{DateTime, Utc};
use pxg_common::CryptoCurrency;
use serde::Serialize;
use thiserror::Error;

use crate::db_types::SessionStatus;

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("The gateway could not be reached: {0}")]
    Unreachable(String),
    #[error("The gateway rejected the request: {0}")]
    Rejected(String),
}

/// A card-to-card transfer instruction sent to the bank.
#[derive(Debug, Clone)]
pub struct CardTransfer {
    pub from_card: String,
    pub to_card: String,
    pub amount: f64,
    pub description: String,
}

/// The bank's answer to a [`CardTransfer`].
#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    /// Either `success` or `error`.
    pub status: SessionStatus,
    pub transaction_id: Option<String>,
    pub message: String,
}

impl TransferReceipt {
    pub fn is_success(&self) -> bool {
        self.status == SessionStatus::Success
    }
}

/// Instruction to send the purchased coins for an order to the buyer.
#[derive(Debug, Clone)]
pub struct PayoutRequest {
    pub order_id: i64,
    pub crypto_amount: f64,
    pub currency: CryptoCurrency,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayoutReceipt {
    /// Either `processing` or `error`. Payouts are never confirmed synchronously.
    pub status: SessionStatus,
    pub transaction_id: Option<String>,
    pub message: String,
    pub estimated_completion: Option<DateTime<Utc>>,
}

/// The fiat leg of an exchange.
#[allow(async_fn_in_trait)]
pub trait BankGateway {
    /// Moves `amount` from one card to another. A declined transfer is an `Ok` receipt with an `error` status; `Err` is
    /// reserved for the cases where the bank could not give an answer at all.
    async fn card_to_card(&self, transfer: &CardTransfer) -> Result<TransferReceipt, GatewayError>;
}

/// The crypto leg of an exchange.
#[allow(async_fn_in_trait)]
pub trait CryptoGateway {
    /// Starts a payout. On success the receipt status is `processing`; completion is observed later.
    async fn send_payout(&self, request: &PayoutRequest) -> Result<PayoutReceipt, GatewayError>;
}
