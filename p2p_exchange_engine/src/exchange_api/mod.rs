//! # Exchange engine public API
//!
//! The `exchange_api` module exposes the programmatic API of the exchange engine. As with the storage traits, the API
//! is split up so that clients can pick the parts they need.
//!
//! * [`exchange_flow_api`] is the primary API. It matches buyers with orders, runs the payment and payout legs of a
//!   session and answers status polls.
//! * [`users_api`] provides read access to user reference data, such as wallet addresses.
//! * [`matching`] holds the tolerance window used to pick an order for a requested amount.
//!
//! # API usage
//!
//! An API instance is created by supplying the backends that implement the traits it needs:
//!
//! ```rust,ignore
//! use p2p_exchange_engine::{ExchangeFlowApi, FlowOptions, SimulatedBank, SimulatedCryptoNetwork, SqliteDatabase};
//! let db = SqliteDatabase::open_or_create("sqlite://data/p2p_exchange.db", 5).await?;
//! let (bank, crypto) = (SimulatedBank::default(), SimulatedCryptoNetwork::default());
//! let api = ExchangeFlowApi::new(db, bank, crypto, FlowOptions::default());
//! let outcome = api.match_order(MatchRequest::new(5000.0, "4276 1234 5678 9014", "TON")).await?;
//! ```
pub mod errors;
pub mod exchange_flow_api;
pub mod exchange_objects;
pub mod matching;
pub mod users_api;
