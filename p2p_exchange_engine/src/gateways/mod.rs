//! Simulated payment rails.
//!
//! Neither gateway talks to a real service. [`SimulatedBank`] approves card-to-card transfers with a configurable
//! probability, and [`SimulatedCryptoNetwork`] accepts every well-formed payout and reports it as `processing`.
//! Both write one JSON line per request to the [`TRANSACTION_LOG_TARGET`] log target, with card numbers masked.
mod bank;
mod crypto;

pub use bank::{SimulatedBank, DEFAULT_PAYMENT_SUCCESS_PROBABILITY};
pub use crypto::{SimulatedCryptoNetwork, DEFAULT_PAYOUT_ETA_SECS, MAX_PAYOUT_ETA_SECS};

pub const TRANSACTION_LOG_TARGET: &str = "pxg::transactions";

fn random_hex(n_bytes: usize) -> String {
    (0..n_bytes).map(|_| format!("{:02x}", rand::random::<u8>())).collect()
}
