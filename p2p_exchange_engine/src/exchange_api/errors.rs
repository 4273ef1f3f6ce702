use pxg_common::{CardNumberError, CryptoCurrency, UnsupportedCurrency};
use thiserror::Error;

use crate::traits::ExchangeDbError;

#[derive(Debug, Clone, Error)]
pub enum ExchangeFlowError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The amount must be at least {minimum}. Got {amount}")]
    AmountTooSmall { amount: f64, minimum: f64 },
    #[error("Invalid card number. {0}")]
    InvalidCard(#[from] CardNumberError),
    #[error("{0}")]
    UnsupportedCurrency(#[from] UnsupportedCurrency),
    #[error("The minimum amount for {currency} is {minimum}")]
    BelowCurrencyMinimum { currency: CryptoCurrency, minimum: f64 },
    #[error("No suitable order found for {amount} in {currency}")]
    NoMatchingOrder { amount: f64, currency: CryptoCurrency },
    #[error("The seller's card for order {0} is not available")]
    SellerCardUnavailable(i64),
    #[error("Order {0} does not exist")]
    OrderNotFound(i64),
    #[error("Exchange session {0} does not exist")]
    SessionNotFound(String),
    #[error("User {0} does not exist")]
    UserNotFound(i64),
    #[error("User {user_id} has no {currency} wallet address")]
    WalletNotFound { user_id: i64, currency: CryptoCurrency },
}

impl From<ExchangeDbError> for ExchangeFlowError {
    fn from(e: ExchangeDbError) -> Self {
        match e {
            ExchangeDbError::DatabaseError(s) => Self::DatabaseError(s),
            ExchangeDbError::OrderNotFound(id) => Self::OrderNotFound(id),
            ExchangeDbError::SessionNotFound(id) => Self::SessionNotFound(id),
            ExchangeDbError::UserNotFound(id) => Self::UserNotFound(id),
        }
    }
}
