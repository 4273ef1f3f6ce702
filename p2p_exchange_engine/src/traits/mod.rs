//! # Backend contracts
//!
//! This module defines the interface contracts of the exchange engine *backends*: the storage layer and the two
//! external payment rails.
//!
//! * [`OrderManagement`] stores seller orders and finds the best order for a buyer's request.
//! * [`SessionManagement`] creates exchange sessions and records status transitions on them.
//! * [`UserManagement`] provides read access to the user reference data (cards and wallet addresses).
//! * [`ExchangeDatabase`] is the union of the three, which is what the exchange flow needs from a database.
//! * [`BankGateway`] moves fiat from the buyer's card to the seller's card.
//! * [`CryptoGateway`] sends the purchased coins to the buyer.
mod exchange_database;
mod gateways;
mod order_management;
mod session_management;
mod user_management;

pub use exchange_database::{ExchangeDatabase, ExchangeDbError};
pub use gateways::{
    BankGateway,
    CardTransfer,
    CryptoGateway,
    GatewayError,
    PayoutReceipt,
    PayoutRequest,
    TransferReceipt,
};
pub use order_management::OrderManagement;
pub use session_management::SessionManagement;
pub use user_management::UserManagement;
