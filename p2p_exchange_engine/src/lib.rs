//! P2P Exchange Engine
//!
//! The P2P exchange engine lets a buyer swap fiat for crypto by paying a seller's card directly. The seller's standing
//! offers ("orders") form an order book, and the engine matches each buyer request against it.
//!
//! The library is divided into three main sections:
//! 1. Storage ([`mod@traits`] and [`SqliteDatabase`]). Backends implement the traits in [`mod@traits`]; SQLite is the
//!    supported backend. The data types stored in the database are defined in [`mod@db_types`] and are public.
//! 2. Payment rails ([`mod@gateways`]). The bank and crypto payout services are simulated.
//! 3. The exchange engine public API ([`ExchangeFlowApi`] and [`UserApi`]). This is the part that servers use: order
//!    matching, the payment and payout legs of a session, and status polling.
pub mod db_types;
pub mod gateways;
pub mod seed;
pub mod traits;

mod exchange_api;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use exchange_api::{
    errors::ExchangeFlowError,
    exchange_flow_api::{ExchangeFlowApi, FlowOptions, DEFAULT_MIN_AMOUNT, DEFAULT_PAYOUT_COMPLETION_PROBABILITY},
    exchange_objects::{ConfirmOutcome, MatchOutcome, MatchRequest, SessionDetails},
    matching::{MatchWindow, MatchedOrder, MATCH_TOLERANCE},
    users_api::UserApi,
};
pub use gateways::{SimulatedBank, SimulatedCryptoNetwork};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
