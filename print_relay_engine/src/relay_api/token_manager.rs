use std::{fmt::Debug, sync::Arc};

use log::*;
use relay_common::Secret;
use tokio::sync::Mutex;

use crate::{
    relay_api::errors::AuthError,
    token_store::{TokenRecord, TokenStore, TokenStoreError},
    traits::{MerchantCredentials, TokenExchange},
};

/// Owns the merchant's token pair: the authorization-code exchange, the refresh-token exchange, and reads of the
/// current credentials.
///
/// Every read-modify-write of the store happens under a single lock, so a refresh triggered by the poller and one
/// triggered by an on-demand query cannot interleave. The store is only written after a successful exchange; a failed
/// exchange leaves the previous record untouched.
///
/// None of the methods retry. Retry policy belongs to the caller.
pub struct TokenManager<S, X> {
    store: S,
    exchange: Arc<X>,
    lock: Mutex<()>,
}

impl<S, X> Debug for TokenManager<S, X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TokenManager")
    }
}

impl<S, X> TokenManager<S, X>
where
    S: TokenStore,
    X: TokenExchange,
{
    pub fn new(store: S, exchange: Arc<X>) -> Self {
        Self { store, exchange, lock: Mutex::new(()) }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn current(&self) -> Result<Option<TokenRecord>, TokenStoreError> {
        self.store.load()
    }

    pub fn credentials(&self) -> Result<Option<MerchantCredentials>, TokenStoreError> {
        Ok(self.store.load()?.map(|r| r.credentials()))
    }

    /// Exchanges the authorization code from the OAuth redirect for a token pair, and replaces the stored record.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenRecord, AuthError> {
        let _guard = self.lock.lock().await;
        debug!("🔑️ Exchanging authorization code");
        let grant = self.exchange.exchange_code(code).await.map_err(|e| {
            error!("🔑️ Token exchange failed. {e}");
            AuthError::Exchange(e)
        })?;
        if grant.access_token.is_empty() {
            return Err(AuthError::IncompleteGrant("access_token"));
        }
        let refresh_token = grant.refresh_token.filter(|t| !t.is_empty()).ok_or(AuthError::IncompleteGrant("refresh_token"))?;
        let merchant_id = grant.merchant_id.filter(|m| !m.is_empty()).ok_or(AuthError::IncompleteGrant("merchant_id"))?;
        let record = TokenRecord { access_token: grant.access_token, refresh_token, merchant_id };
        self.store.save(&record)?;
        info!("🔑️ OAuth tokens saved for merchant {}", record.merchant_id);
        Ok(record)
    }

    /// Exchanges the stored refresh token for a new token pair.
    ///
    /// If there is no usable record, this fails with [`AuthError::NoCredentials`] without contacting the provider.
    pub async fn refresh(&self) -> Result<TokenRecord, AuthError> {
        let _guard = self.lock.lock().await;
        self.refresh_locked().await
    }

    /// Refresh in response to the provider rejecting `rejected`.
    ///
    /// If the stored access token is no longer `rejected`, another caller has already refreshed it while we waited for
    /// the lock, and the current record is returned without a second exchange.
    pub async fn refresh_after_rejection(&self, rejected: &Secret<String>) -> Result<TokenRecord, AuthError> {
        let _guard = self.lock.lock().await;
        if let Some(current) = self.store.load()? {
            if !current.access_token.matches(rejected) {
                debug!("🔑️ Access token was already refreshed by another caller");
                return Ok(current);
            }
        }
        self.refresh_locked().await
    }

    async fn refresh_locked(&self) -> Result<TokenRecord, AuthError> {
        let current = self.store.load()?.ok_or(AuthError::NoCredentials)?;
        debug!("🔑️ Refreshing access token for merchant {}", current.merchant_id);
        let grant = self.exchange.refresh(&current.refresh_token).await.map_err(|e| {
            error!("🔑️ Failed to refresh token. {e}");
            AuthError::Exchange(e)
        })?;
        if grant.access_token.is_empty() {
            return Err(AuthError::IncompleteGrant("access_token"));
        }
        let record = current.refreshed(grant);
        self.store.save(&record)?;
        info!("🔑️ Access token refreshed");
        Ok(record)
    }
}
