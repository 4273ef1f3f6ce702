use pxg_common::CryptoCurrency;

use crate::{
    db_types::{NewOrder, Order, OrderStatusType},
    exchange_api::matching::MatchWindow,
    traits::ExchangeDbError,
};

/// The `OrderManagement` trait defines the behaviour for storing and querying seller orders in the database backend.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Stores a new order. The order is `active` when created. Returns the stored record.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, ExchangeDbError>;

    async fn fetch_order(&self, id: i64) -> Result<Option<Order>, ExchangeDbError>;

    /// Fetches the best active order of the given currency whose listed amount lies inside `window` (bounds
    /// inclusive). "Best" means the lowest rate. Ties on the rate are broken by the lowest order id.
    ///
    /// Returns `None` if no order qualifies.
    async fn find_best_order(
        &self,
        currency: CryptoCurrency,
        window: &MatchWindow,
    ) -> Result<Option<Order>, ExchangeDbError>;

    /// Fetches the card number of the seller who placed the given order.
    ///
    /// Returns `None` if the order does not exist or the seller has no card on file.
    async fn fetch_seller_card(&self, order_id: i64) -> Result<Option<String>, ExchangeDbError>;

    /// Sets the status of an order. Returns the updated order, or [`ExchangeDbError::OrderNotFound`].
    async fn update_order_status(&self, id: i64, status: OrderStatusType) -> Result<Order, ExchangeDbError>;
}
