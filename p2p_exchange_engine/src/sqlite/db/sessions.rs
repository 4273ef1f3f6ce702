use sqlx::SqliteConnection;

use crate::{
    db_types::{ExchangeSession, NewExchangeSession, SessionId, SessionStatus},
    traits::ExchangeDbError,
};

// Statements with a `RETURNING` clause are always read to the end (`fetch_all`). A partially consumed statement is
// not reset, and the write stays invisible to the other connections in the pool.

pub async fn insert_session(
    session: NewExchangeSession,
    conn: &mut SqliteConnection,
) -> Result<ExchangeSession, ExchangeDbError> {
    let id = session.id.to_string();
    let rows: Vec<ExchangeSession> = sqlx::query_as(
        r#"
            INSERT INTO exchange_sessions (id, order_id, buyer_card, seller_card, amount, crypto_amount, currency)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *;
        "#,
    )
    .bind(session.id)
    .bind(session.order_id)
    .bind(session.buyer_card)
    .bind(session.seller_card)
    .bind(session.amount)
    .bind(session.crypto_amount)
    .bind(session.currency)
    .fetch_all(conn)
    .await?;
    rows.into_iter()
        .next()
        .ok_or_else(|| ExchangeDbError::DatabaseError(format!("Session {id} was not returned after insert")))
}

pub async fn fetch_session(
    id: &SessionId,
    conn: &mut SqliteConnection,
) -> Result<Option<ExchangeSession>, ExchangeDbError> {
    let session =
        sqlx::query_as("SELECT * FROM exchange_sessions WHERE id = $1").bind(id.as_str()).fetch_optional(conn).await?;
    Ok(session)
}

/// Moves the payment status from `pending` to `processing` in a single statement. Returns `None` if the session does
/// not exist or its payment has already left `pending`, so at most one caller ever wins the claim.
pub async fn claim_payment(
    id: &SessionId,
    conn: &mut SqliteConnection,
) -> Result<Option<ExchangeSession>, ExchangeDbError> {
    let rows: Vec<ExchangeSession> = sqlx::query_as(
        r#"
            UPDATE exchange_sessions SET payment_status = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND payment_status = $3
            RETURNING *;
        "#,
    )
    .bind(SessionStatus::Processing)
    .bind(id.as_str())
    .bind(SessionStatus::Pending)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().next())
}

pub async fn update_payment_status(
    id: &SessionId,
    status: SessionStatus,
    conn: &mut SqliteConnection,
) -> Result<ExchangeSession, ExchangeDbError> {
    let rows: Vec<ExchangeSession> = sqlx::query_as(
        "UPDATE exchange_sessions SET payment_status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
    )
    .bind(status)
    .bind(id.as_str())
    .fetch_all(conn)
    .await?;
    rows.into_iter().next().ok_or_else(|| ExchangeDbError::SessionNotFound(id.to_string()))
}

pub async fn update_exchange_status(
    id: &SessionId,
    status: SessionStatus,
    conn: &mut SqliteConnection,
) -> Result<ExchangeSession, ExchangeDbError> {
    let rows: Vec<ExchangeSession> = sqlx::query_as(
        "UPDATE exchange_sessions SET exchange_status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
    )
    .bind(status)
    .bind(id.as_str())
    .fetch_all(conn)
    .await?;
    rows.into_iter().next().ok_or_else(|| ExchangeDbError::SessionNotFound(id.to_string()))
}

pub async fn delete_all(conn: &mut SqliteConnection) -> Result<u64, ExchangeDbError> {
    let result = sqlx::query("DELETE FROM exchange_sessions").execute(conn).await?;
    Ok(result.rows_affected())
}
