use pxg_common::CryptoCurrency;

use crate::{
    db_types::{NewUser, User},
    traits::ExchangeDbError,
};

/// Access to the (mostly static) user reference data: display names, card numbers and wallet addresses.
#[allow(async_fn_in_trait)]
pub trait UserManagement {
    async fn insert_user(&self, user: NewUser) -> Result<User, ExchangeDbError>;

    async fn fetch_user(&self, id: i64) -> Result<Option<User>, ExchangeDbError>;

    /// Fetches the user's wallet address for the given currency.
    ///
    /// Returns [`ExchangeDbError::UserNotFound`] if the user does not exist, and `None` if the user exists but has no
    /// address for that currency.
    async fn fetch_wallet_address(
        &self,
        user_id: i64,
        currency: CryptoCurrency,
    ) -> Result<Option<String>, ExchangeDbError> {
        let user = self.fetch_user(user_id).await?.ok_or(ExchangeDbError::UserNotFound(user_id))?;
        Ok(user.wallet_address(currency).map(String::from))
    }
}
