use serde::{Deserialize, Serialize};

use crate::{
    db_types::{ExchangeSession, SessionStatus},
    exchange_api::matching::MatchedOrder,
    traits::{PayoutReceipt, TransferReceipt},
};

/// A buyer's request to exchange fiat for crypto. The fields are taken as entered; validation happens in
/// [`crate::ExchangeFlowApi::match_order`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequest {
    pub amount: f64,
    pub card_number: String,
    pub currency: String,
}

impl MatchRequest {
    pub fn new<S1: Into<String>, S2: Into<String>>(amount: f64, card_number: S1, currency: S2) -> Self {
        Self { amount, card_number: card_number.into(), currency: currency.into() }
    }
}

/// The result of a successful match: the freshly created session and the order terms offered to the buyer.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub session: ExchangeSession,
    pub order: MatchedOrder,
}

/// A session together with the rate of the order it was matched against. The rate is `None` if the order has since
/// disappeared.
#[derive(Debug, Clone)]
pub struct SessionDetails {
    pub session: ExchangeSession,
    pub rate: Option<f64>,
}

impl SessionDetails {
    /// True while the client should keep polling for a result.
    pub fn awaiting_payout(&self) -> bool {
        self.session.payment_status == SessionStatus::Success && self.session.is_exchange_processing()
    }
}

/// What happened during a confirmation call. The receipts are only present for the legs that were attempted on this
/// call; confirming an already-paid session attempts neither.
#[derive(Debug, Clone)]
pub struct ConfirmOutcome {
    pub details: SessionDetails,
    pub payment: Option<TransferReceipt>,
    pub payout: Option<PayoutReceipt>,
}
