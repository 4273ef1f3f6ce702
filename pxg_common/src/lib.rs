//! Shared primitives for the P2P exchange gateway: card numbers, the supported crypto currency catalogue and a couple
//! of small configuration helpers.
mod card;
mod currency;
mod secret;

pub mod helpers;

pub use card::{luhn_check, mask_card_number, normalize_card_number, CardNumber, CardNumberError};
pub use currency::{CryptoCurrency, CurrencyInfo, UnsupportedCurrency, DEFAULT_CURRENCY, FIAT_CURRENCY_CODE};
pub use secret::Secret;
