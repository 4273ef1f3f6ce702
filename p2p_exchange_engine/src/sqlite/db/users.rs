use sqlx::SqliteConnection;

use crate::{
    db_types::{NewUser, User},
    traits::ExchangeDbError,
};

pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<User, ExchangeDbError> {
    let rows: Vec<User> = sqlx::query_as(
        r#"
            INSERT INTO users (name, card_number, ton_address, btc_address, eth_address, usdt_address)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(user.name)
    .bind(user.card_number)
    .bind(user.ton_address)
    .bind(user.btc_address)
    .bind(user.eth_address)
    .bind(user.usdt_address)
    .fetch_all(conn)
    .await?;
    rows.into_iter().next().ok_or_else(|| ExchangeDbError::DatabaseError("User was not returned after insert".into()))
}

pub async fn fetch_user(id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, ExchangeDbError> {
    let user = sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(user)
}

pub async fn delete_all(conn: &mut SqliteConnection) -> Result<u64, ExchangeDbError> {
    let result = sqlx::query("DELETE FROM users").execute(conn).await?;
    Ok(result.rows_affected())
}
