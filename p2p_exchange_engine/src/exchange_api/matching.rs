use pxg_common::CryptoCurrency;
use serde::Serialize;

use crate::db_types::Order;

/// Orders whose amount is within this fraction of the requested amount are eligible for a match.
pub const MATCH_TOLERANCE: f64 = 0.05;

/// The band of order amounts that may satisfy a request for `requested` fiat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchWindow {
    pub requested: f64,
    pub min_amount: f64,
    pub max_amount: f64,
}

impl MatchWindow {
    /// The standard ±5% window around the requested amount.
    pub fn around(requested: f64) -> Self {
        Self::with_tolerance(requested, MATCH_TOLERANCE)
    }

    pub fn with_tolerance(requested: f64, tolerance: f64) -> Self {
        Self { requested, min_amount: requested * (1.0 - tolerance), max_amount: requested * (1.0 + tolerance) }
    }

    /// Bounds are inclusive.
    pub fn contains(&self, amount: f64) -> bool {
        amount >= self.min_amount && amount <= self.max_amount
    }
}

/// An order as offered to a particular buyer. The amount is what the buyer asked for, not the order's listed amount,
/// and the crypto amount follows from it at the order's rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedOrder {
    #[serde(rename = "id")]
    pub order_id: i64,
    pub amount: f64,
    pub crypto_amount: f64,
    pub rate: f64,
    pub currency: CryptoCurrency,
    #[serde(skip)]
    pub seller_id: i64,
}

impl MatchedOrder {
    pub fn new(order: &Order, requested: f64) -> Self {
        Self {
            order_id: order.id,
            amount: requested,
            crypto_amount: requested / order.rate,
            rate: order.rate,
            currency: order.currency,
            seller_id: order.seller_id,
        }
    }
}
