use chrono::Utc;
use log::*;
use pxg_common::{luhn_check, mask_card_number, Secret};
use rand::Rng;
use serde_json::json;

use super::{random_hex, TRANSACTION_LOG_TARGET};
use crate::{
    db_types::SessionStatus,
    traits::{BankGateway, CardTransfer, GatewayError, TransferReceipt},
};

pub const DEFAULT_PAYMENT_SUCCESS_PROBABILITY: f64 = 0.9;

/// A stand-in for the bank's card-to-card transfer API.
#[derive(Debug, Clone)]
pub struct SimulatedBank {
    api_key: Secret<String>,
    success_probability: f64,
}

impl Default for SimulatedBank {
    fn default() -> Self {
        Self::new(Secret::default(), DEFAULT_PAYMENT_SUCCESS_PROBABILITY)
    }
}

impl SimulatedBank {
    pub fn new(api_key: Secret<String>, success_probability: f64) -> Self {
        if api_key.is_blank() {
            warn!("🏦️ No bank API key has been configured. Transfers are simulated.");
        }
        let success_probability = if success_probability.is_nan() { 0.0 } else { success_probability.clamp(0.0, 1.0) };
        Self { api_key, success_probability }
    }

    pub fn success_probability(&self) -> f64 {
        self.success_probability
    }

    fn validate(transfer: &CardTransfer) -> Result<(), String> {
        if transfer.from_card.trim().is_empty() || transfer.to_card.trim().is_empty() || transfer.amount <= 0.0 {
            return Err("Missing required transfer fields".to_string());
        }
        if !luhn_check(&transfer.from_card) {
            return Err("Invalid sender card number".to_string());
        }
        if !luhn_check(&transfer.to_card) {
            return Err("Invalid recipient card number".to_string());
        }
        Ok(())
    }
}

impl BankGateway for SimulatedBank {
    async fn card_to_card(&self, transfer: &CardTransfer) -> Result<TransferReceipt, GatewayError> {
        let receipt = match Self::validate(transfer) {
            Err(message) => TransferReceipt { status: SessionStatus::Error, transaction_id: None, message },
            Ok(()) => {
                let approved = rand::thread_rng().gen_bool(self.success_probability);
                let transaction_id = Some(format!("TX{}", random_hex(8).to_uppercase()));
                if approved {
                    TransferReceipt {
                        status: SessionStatus::Success,
                        transaction_id,
                        message: "Transfer completed".to_string(),
                    }
                } else {
                    TransferReceipt {
                        status: SessionStatus::Error,
                        transaction_id,
                        message: "Transfer declined by the bank".to_string(),
                    }
                }
            },
        };
        let record = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "type": "card_to_card",
            "from_card": mask_card_number(&transfer.from_card),
            "to_card": mask_card_number(&transfer.to_card),
            "amount": transfer.amount,
            "description": transfer.description,
            "status": receipt.status,
            "transaction_id": receipt.transaction_id,
            "message": receipt.message,
        });
        info!(target: TRANSACTION_LOG_TARGET, "{record}");
        trace!("🏦️ Transfer handled with API key {}", self.api_key);
        Ok(receipt)
    }
}
