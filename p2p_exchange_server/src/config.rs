use std::env;

use chrono::Duration;
use log::*;
use p2p_exchange_engine::{
    gateways::{DEFAULT_PAYMENT_SUCCESS_PROBABILITY, DEFAULT_PAYOUT_ETA_SECS, MAX_PAYOUT_ETA_SECS},
    FlowOptions,
    DEFAULT_MIN_AMOUNT,
    DEFAULT_PAYOUT_COMPLETION_PROBABILITY,
};
use pxg_common::{
    helpers::{parse_boolean_flag, parse_probability},
    Secret,
};

const DEFAULT_PXG_HOST: &str = "127.0.0.1";
const DEFAULT_PXG_PORT: u16 = 8480;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/p2p_exchange.db";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Credentials for the bank's card-to-card transfer API.
    pub bank_api_key: Secret<String>,
    /// Credentials for the crypto payout API.
    pub crypto_api_key: Secret<String>,
    /// The fraction of transfers the simulated bank approves.
    pub payment_success_probability: f64,
    /// The chance that a single status poll sees a processing payout complete.
    pub payout_completion_probability: f64,
    /// How long the crypto gateway estimates a payout will take.
    pub payout_eta: Duration,
    /// The smallest fiat amount the exchange accepts, regardless of currency.
    pub min_amount: f64,
    /// If true, the database is wiped and the demonstration data set is loaded on start. **DANGER**
    pub seed_test_data: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_PXG_HOST.to_string(),
            port: DEFAULT_PXG_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bank_api_key: Secret::default(),
            crypto_api_key: Secret::default(),
            payment_success_probability: DEFAULT_PAYMENT_SUCCESS_PROBABILITY,
            payout_completion_probability: DEFAULT_PAYOUT_COMPLETION_PROBABILITY,
            payout_eta: Duration::seconds(DEFAULT_PAYOUT_ETA_SECS),
            min_amount: DEFAULT_MIN_AMOUNT,
            seed_test_data: false,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any source of `PXG_*` variables. Invalid values are logged and replaced with
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where F: Fn(&str) -> Option<String> {
        let host = lookup("PXG_HOST").unwrap_or_else(|| DEFAULT_PXG_HOST.into());
        let port = lookup("PXG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for PXG_PORT. {e} Using the default, {DEFAULT_PXG_PORT}, instead."
                    );
                    DEFAULT_PXG_PORT
                })
            })
            .unwrap_or(DEFAULT_PXG_PORT);
        let database_url = lookup("PXG_DATABASE_URL").filter(|s| !s.trim().is_empty()).unwrap_or_else(|| {
            info!("🪛️ PXG_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let bank_api_key = Secret::new(lookup("PXG_BANK_API_KEY").unwrap_or_else(|| {
            warn!("🪛️ PXG_BANK_API_KEY is not set. Bank transfers will be simulated without credentials.");
            String::default()
        }));
        let crypto_api_key = Secret::new(lookup("PXG_CRYPTO_API_KEY").unwrap_or_else(|| {
            warn!("🪛️ PXG_CRYPTO_API_KEY is not set. Crypto payouts will be simulated without credentials.");
            String::default()
        }));
        let payment_success_probability = probability_from(
            &lookup,
            "PXG_PAYMENT_SUCCESS_PROBABILITY",
            DEFAULT_PAYMENT_SUCCESS_PROBABILITY,
        );
        let payout_completion_probability = probability_from(
            &lookup,
            "PXG_PAYOUT_COMPLETION_PROBABILITY",
            DEFAULT_PAYOUT_COMPLETION_PROBABILITY,
        );
        let payout_eta = lookup("PXG_PAYOUT_ETA_SECS")
            .and_then(|s| {
                s.parse::<i64>().ok().filter(|secs| (0..=MAX_PAYOUT_ETA_SECS).contains(secs)).or_else(|| {
                    error!(
                        "🪛️ {s} is not a valid number of seconds for PXG_PAYOUT_ETA_SECS (0 to {MAX_PAYOUT_ETA_SECS}). \
                         Using the default, {DEFAULT_PAYOUT_ETA_SECS}."
                    );
                    None
                })
            })
            .unwrap_or(DEFAULT_PAYOUT_ETA_SECS);
        let payout_eta = Duration::seconds(payout_eta);
        let min_amount = lookup("PXG_MIN_AMOUNT")
            .and_then(|s| {
                s.parse::<f64>().ok().filter(|a| a.is_finite() && *a >= 0.0).or_else(|| {
                    error!(
                        "🪛️ {s} is not a valid amount for PXG_MIN_AMOUNT. Using the default, {DEFAULT_MIN_AMOUNT}."
                    );
                    None
                })
            })
            .unwrap_or(DEFAULT_MIN_AMOUNT);
        let seed_test_data = parse_boolean_flag(lookup("PXG_SEED_TEST_DATA"), false);
        if seed_test_data {
            warn!("🪛️ PXG_SEED_TEST_DATA is set. The database will be wiped and re-seeded on start.");
        }
        Self {
            host,
            port,
            database_url,
            bank_api_key,
            crypto_api_key,
            payment_success_probability,
            payout_completion_probability,
            payout_eta,
            min_amount,
            seed_test_data,
        }
    }

    pub fn flow_options(&self) -> FlowOptions {
        FlowOptions::new(self.min_amount, self.payout_completion_probability)
    }
}

fn probability_from<F>(lookup: &F, name: &str, default: f64) -> f64
where F: Fn(&str) -> Option<String> {
    match lookup(name) {
        None => default,
        Some(s) => parse_probability(&s).unwrap_or_else(|| {
            error!("🪛️ {s} is not a valid probability for {name}. Using the default, {default}.");
            default
        }),
    }
}
