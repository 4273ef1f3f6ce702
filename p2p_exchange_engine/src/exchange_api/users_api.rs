use std::fmt::Debug;

use log::*;
use pxg_common::CryptoCurrency;

use crate::{db_types::User, exchange_api::errors::ExchangeFlowError, traits::UserManagement};

/// Read access to user reference data.
pub struct UserApi<B> {
    db: B,
}

impl<B> Debug for UserApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UserApi")
    }
}

impl<B> UserApi<B>
where B: UserManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn user(&self, user_id: i64) -> Result<User, ExchangeFlowError> {
        self.db.fetch_user(user_id).await?.ok_or(ExchangeFlowError::UserNotFound(user_id))
    }

    /// The user's wallet address for `currency`. Users without an address for that currency yield
    /// [`ExchangeFlowError::WalletNotFound`].
    pub async fn wallet_address(&self, user_id: i64, currency: CryptoCurrency) -> Result<String, ExchangeFlowError> {
        let address = self.db.fetch_wallet_address(user_id, currency).await?;
        trace!("👤️ Wallet lookup for user #{user_id} ({currency}): {}", address.is_some());
        address.ok_or(ExchangeFlowError::WalletNotFound { user_id, currency })
    }
}
