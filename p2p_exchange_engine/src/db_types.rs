use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use pxg_common::CryptoCurrency;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid status: {0}")]
pub struct ConversionError(String);

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusType {
    /// The order is on the book and may be matched.
    Active,
    /// The order has been withdrawn by the seller.
    Inactive,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Active => write!(f, "active"),
            OrderStatusType::Inactive => write!(f, "inactive"),
        }
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------    SessionStatus      ---------------------------------------------------------
/// The state of one leg (fiat payment or crypto payout) of an exchange session.
///
/// `Failed` can be stored and read back, but the exchange flow never moves a session into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Pending,
    Processing,
    Success,
    Error,
    Failed,
}

impl SessionStatus {
    /// A short, human-readable description of the status, suitable for display to the buyer.
    pub fn description(&self) -> &'static str {
        match self {
            SessionStatus::Pending => "Waiting",
            SessionStatus::Processing => "In progress",
            SessionStatus::Success => "Completed",
            SessionStatus::Error => "Error",
            SessionStatus::Failed => "Failed",
        }
    }
}

impl Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Pending => write!(f, "pending"),
            SessionStatus::Processing => write!(f, "processing"),
            SessionStatus::Success => write!(f, "success"),
            SessionStatus::Error => write!(f, "error"),
            SessionStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            "failed" => Ok(Self::Failed),
            s => Err(ConversionError(format!("Invalid session status: {s}"))),
        }
    }
}

//--------------------------------------       SessionId       ---------------------------------------------------------
/// An opaque 128-bit session token, rendered as 32 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn random() -> Self {
        let bytes: [u8; 16] = rand::random();
        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

//--------------------------------------         User          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing)]
    pub card_number: Option<String>,
    pub ton_address: Option<String>,
    pub btc_address: Option<String>,
    pub eth_address: Option<String>,
    pub usdt_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn wallet_address(&self, currency: CryptoCurrency) -> Option<&str> {
        let address = match currency {
            CryptoCurrency::Ton => &self.ton_address,
            CryptoCurrency::Btc => &self.btc_address,
            CryptoCurrency::Eth => &self.eth_address,
            CryptoCurrency::Usdt => &self.usdt_address,
        };
        address.as_deref().filter(|a| !a.is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: String,
    pub card_number: Option<String>,
    pub ton_address: Option<String>,
    pub btc_address: Option<String>,
    pub eth_address: Option<String>,
    pub usdt_address: Option<String>,
}

impl NewUser {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn with_card<S: Into<String>>(mut self, card_number: S) -> Self {
        self.card_number = Some(card_number.into());
        self
    }

    pub fn with_wallet<S: Into<String>>(mut self, currency: CryptoCurrency, address: S) -> Self {
        let address = Some(address.into());
        match currency {
            CryptoCurrency::Ton => self.ton_address = address,
            CryptoCurrency::Btc => self.btc_address = address,
            CryptoCurrency::Eth => self.eth_address = address,
            CryptoCurrency::Usdt => self.usdt_address = address,
        }
        self
    }
}

//--------------------------------------        Order          ---------------------------------------------------------
/// A standing offer from a seller to sell `crypto_amount` of `currency` for `amount` fiat, at `rate` fiat per coin.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Order {
    pub id: i64,
    pub amount: f64,
    pub crypto_amount: f64,
    pub rate: f64,
    pub currency: CryptoCurrency,
    pub seller_id: i64,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub amount: f64,
    pub crypto_amount: f64,
    pub rate: f64,
    pub currency: CryptoCurrency,
    pub seller_id: i64,
}

impl NewOrder {
    /// Creates a new order at the given rate. The crypto amount is derived from the fiat amount and rate.
    pub fn new(amount: f64, rate: f64, currency: CryptoCurrency, seller_id: i64) -> Self {
        let crypto_amount = if rate > 0.0 { amount / rate } else { 0.0 };
        Self { amount, crypto_amount, rate, currency, seller_id }
    }
}

//--------------------------------------    ExchangeSession    ---------------------------------------------------------
/// One buyer's attempt to fill an order. The amounts are frozen at match time.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ExchangeSession {
    pub id: SessionId,
    pub order_id: i64,
    pub buyer_card: String,
    pub seller_card: String,
    pub amount: f64,
    pub crypto_amount: f64,
    pub currency: CryptoCurrency,
    pub payment_status: SessionStatus,
    pub exchange_status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExchangeSession {
    pub fn is_exchange_processing(&self) -> bool {
        self.exchange_status == SessionStatus::Processing
    }
}

#[derive(Debug, Clone)]
pub struct NewExchangeSession {
    pub id: SessionId,
    pub order_id: i64,
    pub buyer_card: String,
    pub seller_card: String,
    pub amount: f64,
    pub crypto_amount: f64,
    pub currency: CryptoCurrency,
}
