use thiserror::Error;

use crate::traits::{OrderManagement, SessionManagement, UserManagement};

#[derive(Debug, Clone, Error)]
pub enum ExchangeDbError {
    #[error("We have an internal database engine (configuration/uptime etc.) : {0}")]
    DatabaseError(String),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(i64),
    #[error("The requested exchange session {0} does not exist")]
    SessionNotFound(String),
    #[error("The requested user {0} does not exist")]
    UserNotFound(i64),
}

impl From<sqlx::Error> for ExchangeDbError {
    fn from(e: sqlx::Error) -> Self {
        ExchangeDbError::DatabaseError(e.to_string())
    }
}

/// This trait defines the highest level of behaviour for backends supporting the exchange flow: everything needed to
/// match orders, run sessions and look up users.
pub trait ExchangeDatabase: Clone + OrderManagement + SessionManagement + UserManagement {
    /// The URL of the database
    fn url(&self) -> &str;
}
