use chrono::{Duration, Utc};
use log::*;
use pxg_common::Secret;
use serde_json::json;

use super::{random_hex, TRANSACTION_LOG_TARGET};
use crate::{
    db_types::SessionStatus,
    traits::{CryptoGateway, GatewayError, PayoutReceipt, PayoutRequest},
};

pub const DEFAULT_PAYOUT_ETA_SECS: i64 = 300;
/// Payout estimates are capped at one day.
pub const MAX_PAYOUT_ETA_SECS: i64 = 86_400;

/// A stand-in for the crypto payout service. Payouts are accepted immediately and reported as `processing`.
#[derive(Debug, Clone)]
pub struct SimulatedCryptoNetwork {
    api_key: Secret<String>,
    payout_eta: Duration,
}

impl Default for SimulatedCryptoNetwork {
    fn default() -> Self {
        Self::new(Secret::default(), Duration::seconds(DEFAULT_PAYOUT_ETA_SECS))
    }
}

impl SimulatedCryptoNetwork {
    /// Negative estimates are treated as zero, and estimates longer than [`MAX_PAYOUT_ETA_SECS`] are capped.
    pub fn new(api_key: Secret<String>, payout_eta: Duration) -> Self {
        if api_key.is_blank() {
            warn!("🪙️ No crypto API key has been configured. Payouts are simulated.");
        }
        let max_eta = Duration::seconds(MAX_PAYOUT_ETA_SECS);
        if payout_eta > max_eta {
            warn!("🪙️ A payout estimate of {payout_eta} is too long. Capping it at {max_eta}.");
        }
        let payout_eta = payout_eta.clamp(Duration::zero(), max_eta);
        Self { api_key, payout_eta }
    }
}

impl CryptoGateway for SimulatedCryptoNetwork {
    async fn send_payout(&self, request: &PayoutRequest) -> Result<PayoutReceipt, GatewayError> {
        let receipt = if !request.crypto_amount.is_finite() || request.crypto_amount <= 0.0 {
            PayoutReceipt {
                status: SessionStatus::Error,
                transaction_id: None,
                message: "Missing required payout fields".to_string(),
                estimated_completion: None,
            }
        } else {
            PayoutReceipt {
                status: SessionStatus::Processing,
                transaction_id: Some(format!("0x{}", random_hex(32))),
                message: "Payout submitted to the network".to_string(),
                estimated_completion: Utc::now().checked_add_signed(self.payout_eta),
            }
        };
        let record = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "type": "crypto_payout",
            "order_id": request.order_id,
            "crypto_amount": request.crypto_amount,
            "currency": request.currency,
            "status": receipt.status,
            "transaction_id": receipt.transaction_id,
            "estimated_completion": receipt.estimated_completion,
        });
        info!(target: TRANSACTION_LOG_TARGET, "{record}");
        trace!("🪙️ Payout handled with API key {}", self.api_key);
        Ok(receipt)
    }
}
