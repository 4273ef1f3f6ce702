use crate::{
    db_types::{ExchangeSession, NewExchangeSession, SessionId, SessionStatus},
    traits::ExchangeDbError,
};

/// The `SessionManagement` trait defines the behaviour for persisting exchange sessions and their status transitions.
///
/// Sessions are never deleted. Both statuses start out as `pending`. Every status update also refreshes `updated_at`.
#[allow(async_fn_in_trait)]
pub trait SessionManagement {
    async fn create_session(&self, session: NewExchangeSession) -> Result<ExchangeSession, ExchangeDbError>;

    async fn fetch_session(&self, id: &SessionId) -> Result<Option<ExchangeSession>, ExchangeDbError>;

    /// Atomically moves the payment status from `pending` to `processing` and returns the claimed session.
    ///
    /// Returns `None` if the session does not exist or its payment is no longer `pending`. Of any number of concurrent
    /// callers, at most one receives the session.
    async fn claim_payment(&self, id: &SessionId) -> Result<Option<ExchangeSession>, ExchangeDbError>;

    /// Returns the updated session, or [`ExchangeDbError::SessionNotFound`].
    async fn update_payment_status(
        &self,
        id: &SessionId,
        status: SessionStatus,
    ) -> Result<ExchangeSession, ExchangeDbError>;

    /// Returns the updated session, or [`ExchangeDbError::SessionNotFound`].
    async fn update_exchange_status(
        &self,
        id: &SessionId,
        status: SessionStatus,
    ) -> Result<ExchangeSession, ExchangeDbError>;
}
