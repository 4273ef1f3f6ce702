use std::fmt::Debug;

use log::*;
use pxg_common::{CardNumber, CryptoCurrency, FIAT_CURRENCY_CODE};
use rand::Rng;

use crate::{
    db_types::{ExchangeSession, NewExchangeSession, SessionId, SessionStatus},
    exchange_api::{
        errors::ExchangeFlowError,
        exchange_objects::{ConfirmOutcome, MatchOutcome, MatchRequest, SessionDetails},
        matching::{MatchWindow, MatchedOrder},
    },
    traits::{
        BankGateway,
        CardTransfer,
        CryptoGateway,
        ExchangeDatabase,
        PayoutReceipt,
        PayoutRequest,
        TransferReceipt,
    },
};

pub const DEFAULT_MIN_AMOUNT: f64 = 1_000.0;
pub const DEFAULT_PAYOUT_COMPLETION_PROBABILITY: f64 = 0.3;

/// Tunables for the exchange flow.
#[derive(Debug, Clone, Copy)]
pub struct FlowOptions {
    /// The smallest fiat amount accepted for any currency.
    pub min_amount: f64,
    /// The chance that a single status poll observes a `processing` payout as complete.
    pub payout_completion_probability: f64,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self { min_amount: DEFAULT_MIN_AMOUNT, payout_completion_probability: DEFAULT_PAYOUT_COMPLETION_PROBABILITY }
    }
}

impl FlowOptions {
    pub fn new(min_amount: f64, payout_completion_probability: f64) -> Self {
        let p =
            if payout_completion_probability.is_nan() { 0.0 } else { payout_completion_probability.clamp(0.0, 1.0) };
        Self { min_amount, payout_completion_probability: p }
    }
}

/// `ExchangeFlowApi` is the primary API for the exchange flow.
///
/// A buyer's request is matched against the order book ([`Self::match_order`]), which opens an exchange session.
/// Confirming the session ([`Self::confirm_payment`]) charges the buyer's card through the bank and, if that succeeds,
/// starts the crypto payout. The client then polls ([`Self::poll_status`]) until the payout completes.
pub struct ExchangeFlowApi<B, K, C> {
    db: B,
    bank: K,
    crypto: C,
    options: FlowOptions,
}

impl<B, K, C> Debug for ExchangeFlowApi<B, K, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ExchangeFlowApi ({:?})", self.options)
    }
}

impl<B, K, C> ExchangeFlowApi<B, K, C> {
    pub fn new(db: B, bank: K, crypto: C, options: FlowOptions) -> Self {
        Self { db, bank, crypto, options }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn options(&self) -> &FlowOptions {
        &self.options
    }
}

impl<B, K, C> ExchangeFlowApi<B, K, C>
where
    B: ExchangeDatabase,
    K: BankGateway,
    C: CryptoGateway,
{
    /// Validates the buyer's request, finds the best order for it and opens a new exchange session.
    ///
    /// The request is rejected if
    /// * the amount is below the global minimum,
    /// * the card number is not 16 digits once spaces are removed,
    /// * the currency is not supported, or the amount is below that currency's minimum.
    ///
    /// The cheapest active order whose amount is within ±5% of the request wins. The session records the requested
    /// amount and the crypto amount at the winning order's rate.
    pub async fn match_order(&self, request: MatchRequest) -> Result<MatchOutcome, ExchangeFlowError> {
        let amount = request.amount;
        if !amount.is_finite() || amount < self.options.min_amount {
            debug!("🔄️🔍️ Rejecting request for {amount}. Below minimum of {}", self.options.min_amount);
            return Err(ExchangeFlowError::AmountTooSmall { amount, minimum: self.options.min_amount });
        }
        let card = CardNumber::parse(&request.card_number)?;
        let currency = request.currency.parse::<CryptoCurrency>()?;
        if amount < currency.min_amount() {
            debug!("🔄️🔍️ Rejecting request for {amount} {currency}. Below the currency minimum");
            return Err(ExchangeFlowError::BelowCurrencyMinimum { currency, minimum: currency.min_amount() });
        }
        let window = MatchWindow::around(amount);
        let order = self
            .db
            .find_best_order(currency, &window)
            .await?
            .filter(|o| o.currency == currency && window.contains(o.amount))
            .ok_or(ExchangeFlowError::NoMatchingOrder { amount, currency })?;
        trace!("🔄️🔍️ Order #{} ({} @ {}) matches request for {amount} {currency}", order.id, order.amount, order.rate);
        let seller_card = self
            .db
            .fetch_seller_card(order.id)
            .await?
            .ok_or(ExchangeFlowError::SellerCardUnavailable(order.id))?;
        let matched = MatchedOrder::new(&order, amount);
        let new_session = NewExchangeSession {
            id: SessionId::random(),
            order_id: order.id,
            buyer_card: card.into(),
            seller_card,
            amount,
            crypto_amount: matched.crypto_amount,
            currency,
        };
        let session = self.db.create_session(new_session).await?;
        info!(
            "🔄️🔍️ Session {} opened: {amount} {FIAT_CURRENCY_CODE} for {:.8} {currency} against order #{}",
            session.id, matched.crypto_amount, order.id
        );
        Ok(MatchOutcome { session, order: matched })
    }

    /// Runs the payment leg and, if the payment succeeds, starts the payout leg of the session.
    ///
    /// This only does anything while the session's payment is `pending`. The payment is claimed (moved to
    /// `processing`) in a single database statement before the bank is called, so concurrent or repeated
    /// confirmations never charge the buyer twice. Callers that lose the claim get the current state, unchanged.
    pub async fn confirm_payment(&self, id: &SessionId) -> Result<ConfirmOutcome, ExchangeFlowError> {
        let Some(session) = self.db.claim_payment(id).await? else {
            let session = self.fetch_session(id).await?;
            debug!("🔄️💳️ Session {id} has already been confirmed (payment is {})", session.payment_status);
            let details = self.details_for(session).await?;
            return Ok(ConfirmOutcome { details, payment: None, payout: None });
        };
        let receipt = self.charge_buyer(&session).await;
        let payment_status = if receipt.is_success() { SessionStatus::Success } else { SessionStatus::Error };
        let mut session = self.db.update_payment_status(id, payment_status).await?;
        info!("🔄️💳️ Session {id}: payment {payment_status}. {}", receipt.message);
        let mut payout = None;
        if payment_status == SessionStatus::Success {
            let payout_receipt = self.start_payout(&session).await;
            session = self.db.update_exchange_status(id, payout_receipt.status).await?;
            info!("🔄️🪙️ Session {id}: payout {}. {}", payout_receipt.status, payout_receipt.message);
            payout = Some(payout_receipt);
        }
        let details = self.details_for(session).await?;
        Ok(ConfirmOutcome { details, payment: Some(receipt), payout })
    }

    /// Returns the current state of the session.
    ///
    /// While the payment has succeeded and the payout is `processing`, each call completes the payout with the
    /// configured probability.
    pub async fn poll_status(&self, id: &SessionId) -> Result<ExchangeSession, ExchangeFlowError> {
        let session = self.fetch_session(id).await?;
        if session.payment_status != SessionStatus::Success || !session.is_exchange_processing() {
            return Ok(session);
        }
        let completed = rand::thread_rng().gen_bool(self.options.payout_completion_probability);
        if completed {
            let session = self.db.update_exchange_status(id, SessionStatus::Success).await?;
            info!("🔄️🪙️ Session {id}: payout of {:.8} {} completed", session.crypto_amount, session.currency);
            Ok(session)
        } else {
            trace!("🔄️🪙️ Session {id}: payout still processing");
            Ok(session)
        }
    }

    /// Returns the session and its order's rate, without changing anything.
    pub async fn session_details(&self, id: &SessionId) -> Result<SessionDetails, ExchangeFlowError> {
        let session = self.fetch_session(id).await?;
        self.details_for(session).await
    }

    async fn fetch_session(&self, id: &SessionId) -> Result<ExchangeSession, ExchangeFlowError> {
        self.db.fetch_session(id).await?.ok_or_else(|| ExchangeFlowError::SessionNotFound(id.to_string()))
    }

    async fn details_for(&self, session: ExchangeSession) -> Result<SessionDetails, ExchangeFlowError> {
        let rate = self.db.fetch_order(session.order_id).await?.map(|o| o.rate);
        Ok(SessionDetails { session, rate })
    }

    async fn charge_buyer(&self, session: &ExchangeSession) -> TransferReceipt {
        let transfer = CardTransfer {
            from_card: session.buyer_card.clone(),
            to_card: session.seller_card.clone(),
            amount: session.amount,
            description: format!("P2P exchange {} #{}", session.currency, session.order_id),
        };
        self.bank.card_to_card(&transfer).await.unwrap_or_else(|e| {
            warn!("🔄️💳️ Bank transfer for session {} failed. {e}", session.id);
            TransferReceipt { status: SessionStatus::Error, transaction_id: None, message: e.to_string() }
        })
    }

    async fn start_payout(&self, session: &ExchangeSession) -> PayoutReceipt {
        let request = PayoutRequest {
            order_id: session.order_id,
            crypto_amount: session.crypto_amount,
            currency: session.currency,
        };
        self.crypto.send_payout(&request).await.unwrap_or_else(|e| {
            warn!("🔄️🪙️ Crypto payout for session {} failed. {e}", session.id);
            PayoutReceipt {
                status: SessionStatus::Error,
                transaction_id: None,
                message: e.to_string(),
                estimated_completion: None,
            }
        })
    }
}
