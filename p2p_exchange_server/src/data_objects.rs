use chrono::{DateTime, Utc};
use p2p_exchange_engine::{
    db_types::{ExchangeSession, SessionStatus},
    ConfirmOutcome,
    MatchOutcome,
    MatchRequest,
    MatchedOrder,
    SessionDetails,
};
use pxg_common::{mask_card_number, CryptoCurrency, CurrencyInfo, DEFAULT_CURRENCY, FIAT_CURRENCY_CODE};
use serde::{Deserialize, Serialize};

use crate::errors::ServerError;

/// How long a client should wait before polling again while a payout is in flight.
pub const REFRESH_AFTER_SECS: u64 = 30;

/// The exchange form, as JSON or url-encoded form data. Missing fields are reported by [`MatchParams::into_request`]
/// rather than by the deserializer, so that the buyer gets a sensible message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchParams {
    pub amount: Option<f64>,
    pub card_number: Option<String>,
    pub currency: Option<String>,
}

impl MatchParams {
    pub fn into_request(self) -> Result<MatchRequest, ServerError> {
        let amount = self.amount.ok_or_else(|| ServerError::InvalidRequest("An amount is required".into()))?;
        let card_number = self.card_number.unwrap_or_default();
        let currency = self
            .currency
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.code().to_string());
        Ok(MatchRequest::new(amount, card_number, currency))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionQuery {
    pub session_id: Option<String>,
}

impl SessionQuery {
    pub fn session_id(&self) -> Result<&str, ServerError> {
        self.session_id.as_deref().map(str::trim).filter(|s| !s.is_empty()).ok_or(ServerError::MissingSessionId)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub success: bool,
    pub session_id: String,
    pub order: MatchedOrder,
    pub seller_card: String,
    pub next_step_url: String,
}

impl From<MatchOutcome> for MatchResponse {
    fn from(outcome: MatchOutcome) -> Self {
        let MatchOutcome { session, order } = outcome;
        Self {
            success: true,
            next_step_url: format!("confirm?session_id={}", session.id),
            session_id: session.id.to_string(),
            seller_card: mask_card_number(&session.seller_card),
            order,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub payment_status: SessionStatus,
    pub exchange_status: SessionStatus,
    pub updated_at: DateTime<Utc>,
}

impl From<ExchangeSession> for StatusResponse {
    fn from(session: ExchangeSession) -> Self {
        Self {
            payment_status: session.payment_status,
            exchange_status: session.exchange_status,
            updated_at: session.updated_at,
        }
    }
}

/// Everything the buyer needs to follow an exchange session. Card numbers are always masked.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub order_id: i64,
    pub currency: CryptoCurrency,
    pub currency_name: String,
    pub fiat_currency: String,
    pub amount: f64,
    pub rate: Option<f64>,
    pub crypto_amount: f64,
    pub buyer_card: String,
    pub seller_card: String,
    pub payment_status: SessionStatus,
    pub payment_status_text: String,
    pub exchange_status: SessionStatus,
    pub exchange_status_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_after_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_completion: Option<DateTime<Utc>>,
}

impl From<SessionDetails> for SessionView {
    fn from(details: SessionDetails) -> Self {
        let refresh_after_secs = details.awaiting_payout().then_some(REFRESH_AFTER_SECS);
        let SessionDetails { session, rate } = details;
        Self {
            session_id: session.id.to_string(),
            order_id: session.order_id,
            currency: session.currency,
            currency_name: session.currency.full_name().to_string(),
            fiat_currency: FIAT_CURRENCY_CODE.to_string(),
            amount: session.amount,
            rate,
            crypto_amount: session.crypto_amount,
            buyer_card: mask_card_number(&session.buyer_card),
            seller_card: mask_card_number(&session.seller_card),
            payment_status: session.payment_status,
            payment_status_text: session.payment_status.description().to_string(),
            exchange_status: session.exchange_status,
            exchange_status_text: session.exchange_status.description().to_string(),
            created_at: session.created_at,
            updated_at: session.updated_at,
            refresh_after_secs,
            payment_message: None,
            payout_message: None,
            payout_transaction_id: None,
            estimated_completion: None,
        }
    }
}

impl From<ConfirmOutcome> for SessionView {
    fn from(outcome: ConfirmOutcome) -> Self {
        let mut view = SessionView::from(outcome.details);
        view.payment_message = outcome.payment.map(|r| r.message);
        if let Some(payout) = outcome.payout {
            view.payout_message = Some(payout.message);
            view.payout_transaction_id = payout.transaction_id;
            view.estimated_completion = payout.estimated_completion;
        }
        view
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrencyCatalogue {
    pub fiat_currency: &'static str,
    pub default_currency: CryptoCurrency,
    pub currencies: Vec<CurrencyInfo>,
}

impl Default for CurrencyCatalogue {
    fn default() -> Self {
        Self {
            fiat_currency: FIAT_CURRENCY_CODE,
            default_currency: DEFAULT_CURRENCY,
            currencies: CryptoCurrency::catalogue(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WalletAddressResponse {
    pub user_id: i64,
    pub currency: CryptoCurrency,
    pub address: String,
}
