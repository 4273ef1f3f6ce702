use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

/// Fiat amounts on the exchange are denominated in roubles.
pub const FIAT_CURRENCY_CODE: &str = "RUB";
pub const DEFAULT_CURRENCY: CryptoCurrency = CryptoCurrency::Ton;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported currency: {0}")]
pub struct UnsupportedCurrency(pub String);

//--------------------------------------    CryptoCurrency     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum CryptoCurrency {
    Ton,
    Btc,
    Eth,
    Usdt,
}

/// Static catalogue data for a supported currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyInfo {
    pub code: CryptoCurrency,
    pub full_name: &'static str,
    /// Smallest fiat amount that may be exchanged for this currency
    pub min_amount: f64,
    /// Indicative fiat price of one coin. Sellers set their own rates on their orders.
    pub reference_rate: f64,
}

impl CryptoCurrency {
    pub const ALL: [CryptoCurrency; 4] = [Self::Ton, Self::Btc, Self::Eth, Self::Usdt];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Ton => "TON",
            Self::Btc => "BTC",
            Self::Eth => "ETH",
            Self::Usdt => "USDT",
        }
    }

    pub fn full_name(&self) -> &'static str {
        match self {
            Self::Ton => "Toncoin",
            Self::Btc => "Bitcoin",
            Self::Eth => "Ethereum",
            Self::Usdt => "Tether",
        }
    }

    pub fn min_amount(&self) -> f64 {
        match self {
            Self::Ton | Self::Usdt => 1_000.0,
            Self::Btc => 5_000.0,
            Self::Eth => 3_000.0,
        }
    }

    pub fn reference_rate(&self) -> f64 {
        match self {
            Self::Ton => 350.0,
            Self::Btc => 5_000_000.0,
            Self::Eth => 300_000.0,
            Self::Usdt => 90.0,
        }
    }

    pub fn info(&self) -> CurrencyInfo {
        CurrencyInfo {
            code: *self,
            full_name: self.full_name(),
            min_amount: self.min_amount(),
            reference_rate: self.reference_rate(),
        }
    }

    pub fn catalogue() -> Vec<CurrencyInfo> {
        Self::ALL.iter().map(CryptoCurrency::info).collect()
    }
}

impl Default for CryptoCurrency {
    fn default() -> Self {
        DEFAULT_CURRENCY
    }
}

impl Display for CryptoCurrency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CryptoCurrency {
    type Err = UnsupportedCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TON" => Ok(Self::Ton),
            "BTC" => Ok(Self::Btc),
            "ETH" => Ok(Self::Eth),
            "USDT" => Ok(Self::Usdt),
            _ => Err(UnsupportedCurrency(s.to_string())),
        }
    }
}
