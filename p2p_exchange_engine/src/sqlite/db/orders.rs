use log::trace;
use pxg_common::CryptoCurrency;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order, OrderStatusType},
    exchange_api::matching::MatchWindow,
    traits::ExchangeDbError,
};

/// Inserts a new order into the database using the given connection. This is not atomic. You can embed this call
/// inside a transaction if you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, ExchangeDbError> {
    let rows: Vec<Order> = sqlx::query_as(
        r#"
            INSERT INTO orders (amount, crypto_amount, rate, currency, seller_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(order.amount)
    .bind(order.crypto_amount)
    .bind(order.rate)
    .bind(order.currency)
    .bind(order.seller_id)
    .fetch_all(conn)
    .await?;
    rows.into_iter().next().ok_or_else(|| ExchangeDbError::DatabaseError("Order was not returned after insert".into()))
}

pub async fn fetch_order(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, ExchangeDbError> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(order)
}

/// Selects the cheapest active order of `currency` whose amount lies inside the window. Bounds are inclusive.
pub async fn find_best_order(
    currency: CryptoCurrency,
    window: &MatchWindow,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, ExchangeDbError> {
    trace!("🗃️ Searching for {currency} orders between {:.2} and {:.2}", window.min_amount, window.max_amount);
    let order = sqlx::query_as(
        r#"
            SELECT * FROM orders
            WHERE status = 'active' AND currency = $1 AND amount >= $2 AND amount <= $3
            ORDER BY rate ASC, id ASC
            LIMIT 1;
        "#,
    )
    .bind(currency)
    .bind(window.min_amount)
    .bind(window.max_amount)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

pub async fn fetch_seller_card(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<String>, ExchangeDbError> {
    let card: Option<(Option<String>,)> = sqlx::query_as(
        r#"
            SELECT users.card_number FROM orders
            JOIN users ON orders.seller_id = users.id
            WHERE orders.id = $1
        "#,
    )
    .bind(order_id)
    .fetch_optional(conn)
    .await?;
    Ok(card.and_then(|(c,)| c).filter(|c| !c.is_empty()))
}

pub async fn update_status(
    id: i64,
    status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Order, ExchangeDbError> {
    let rows: Vec<Order> = sqlx::query_as("UPDATE orders SET status = $1 WHERE id = $2 RETURNING *")
        .bind(status)
        .bind(id)
        .fetch_all(conn)
        .await?;
    rows.into_iter().next().ok_or(ExchangeDbError::OrderNotFound(id))
}

pub async fn delete_all(conn: &mut SqliteConnection) -> Result<u64, ExchangeDbError> {
    let result = sqlx::query("DELETE FROM orders").execute(conn).await?;
    Ok(result.rows_affected())
}
