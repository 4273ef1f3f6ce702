//! `SqliteDatabase` is a concrete implementation of an exchange engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::{fmt::Debug, path::Path};

use log::*;
use pxg_common::CryptoCurrency;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};

use super::db::{new_pool, orders, sessions, users};
use crate::{
    db_types::{
        ExchangeSession,
        NewExchangeSession,
        NewOrder,
        NewUser,
        Order,
        OrderStatusType,
        SessionId,
        SessionStatus,
        User,
    },
    exchange_api::matching::MatchWindow,
    seed::{seed_orders, seed_users},
    traits::{ExchangeDatabase, ExchangeDbError, OrderManagement, SessionManagement, UserManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl ExchangeDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, ExchangeDbError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::insert_order(order, &mut conn).await?;
        debug!("🗃️ Order #{} ({} {}) has been saved in the DB", order.id, order.amount, order.currency);
        Ok(order)
    }

    async fn fetch_order(&self, id: i64) -> Result<Option<Order>, ExchangeDbError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order(id, &mut conn).await
    }

    async fn find_best_order(
        &self,
        currency: CryptoCurrency,
        window: &MatchWindow,
    ) -> Result<Option<Order>, ExchangeDbError> {
        let mut conn = self.pool.acquire().await?;
        orders::find_best_order(currency, window, &mut conn).await
    }

    async fn fetch_seller_card(&self, order_id: i64) -> Result<Option<String>, ExchangeDbError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_seller_card(order_id, &mut conn).await
    }

    async fn update_order_status(&self, id: i64, status: OrderStatusType) -> Result<Order, ExchangeDbError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::update_status(id, status, &mut conn).await?;
        debug!("🗃️ Order #{id} is now {status}");
        Ok(order)
    }
}

impl SessionManagement for SqliteDatabase {
    async fn create_session(&self, session: NewExchangeSession) -> Result<ExchangeSession, ExchangeDbError> {
        let mut conn = self.pool.acquire().await?;
        let session = sessions::insert_session(session, &mut conn).await?;
        debug!("🗃️ Exchange session {} created for order #{}", session.id, session.order_id);
        Ok(session)
    }

    async fn fetch_session(&self, id: &SessionId) -> Result<Option<ExchangeSession>, ExchangeDbError> {
        let mut conn = self.pool.acquire().await?;
        sessions::fetch_session(id, &mut conn).await
    }

    async fn claim_payment(&self, id: &SessionId) -> Result<Option<ExchangeSession>, ExchangeDbError> {
        let mut conn = self.pool.acquire().await?;
        let session = sessions::claim_payment(id, &mut conn).await?;
        match &session {
            Some(_) => debug!("🗃️ Session {id}: payment claimed for processing"),
            None => trace!("🗃️ Session {id}: payment could not be claimed"),
        }
        Ok(session)
    }

    async fn update_payment_status(
        &self,
        id: &SessionId,
        status: SessionStatus,
    ) -> Result<ExchangeSession, ExchangeDbError> {
        let mut conn = self.pool.acquire().await?;
        let session = sessions::update_payment_status(id, status, &mut conn).await?;
        debug!("🗃️ Session {id}: payment status is now {status}");
        Ok(session)
    }

    async fn update_exchange_status(
        &self,
        id: &SessionId,
        status: SessionStatus,
    ) -> Result<ExchangeSession, ExchangeDbError> {
        let mut conn = self.pool.acquire().await?;
        let session = sessions::update_exchange_status(id, status, &mut conn).await?;
        debug!("🗃️ Session {id}: exchange status is now {status}");
        Ok(session)
    }
}

impl UserManagement for SqliteDatabase {
    async fn insert_user(&self, user: NewUser) -> Result<User, ExchangeDbError> {
        let mut conn = self.pool.acquire().await?;
        users::insert_user(user, &mut conn).await
    }

    async fn fetch_user(&self, id: i64) -> Result<Option<User>, ExchangeDbError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_user(id, &mut conn).await
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Opens the database at `url`, creating the parent directory and the database file if they do not exist yet, and
    /// brings the schema up to date.
    pub async fn open_or_create(url: &str, max_connections: u32) -> Result<Self, ExchangeDbError> {
        if let Some(dir) = sqlite_parent_dir(url) {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                info!("🗃️ Creating database directory {}", dir.display());
                std::fs::create_dir_all(dir).map_err(|e| ExchangeDbError::DatabaseError(e.to_string()))?;
            }
        }
        if !Sqlite::database_exists(url).await? {
            info!("🗃️ Creating new database at {url}");
            Sqlite::create_database(url).await?;
        }
        let db = Self::new_with_url(url, max_connections).await?;
        db.run_migrations().await?;
        Ok(db)
    }

    pub async fn run_migrations(&self) -> Result<(), ExchangeDbError> {
        sqlx::migrate!("./src/sqlite/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ExchangeDbError::DatabaseError(format!("Migration failed. {e}")))?;
        info!("🗃️ Migrations complete");
        Ok(())
    }

    /// Wipes all sessions, orders and users and replaces them with the demonstration data set, in a single
    /// transaction. Ids restart from 1.
    pub async fn reset_and_seed(&self) -> Result<(), ExchangeDbError> {
        let mut tx = self.pool.begin().await?;
        let n_sessions = sessions::delete_all(&mut tx).await?;
        let n_orders = orders::delete_all(&mut tx).await?;
        let n_users = users::delete_all(&mut tx).await?;
        sqlx::query("DELETE FROM sqlite_sequence WHERE name IN ('orders', 'users')").execute(&mut *tx).await?;
        debug!("🗃️ Cleared {n_sessions} sessions, {n_orders} orders and {n_users} users");
        let mut seller_ids = Vec::new();
        for user in seed_users() {
            let user = users::insert_user(user, &mut tx).await?;
            seller_ids.push(user.id);
        }
        let mut count = 0;
        for (seller, order) in seed_orders() {
            let seller_id = seller_ids.get(seller).copied().ok_or(ExchangeDbError::UserNotFound(seller as i64))?;
            orders::insert_order(NewOrder { seller_id, ..order }, &mut tx).await?;
            count += 1;
        }
        tx.commit().await?;
        info!("🗃️ Seeded {} users and {count} orders", seller_ids.len());
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Extracts the directory part of a `sqlite://path/to/file.db` style URL. In-memory databases have none.
fn sqlite_parent_dir(url: &str) -> Option<&Path> {
    let path = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next()?;
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Path::new(path).parent()
}
