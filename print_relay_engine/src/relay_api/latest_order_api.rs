use std::{fmt::Debug, sync::Arc};

use log::*;

use crate::{
    relay_api::{errors::LatestOrderError, token_manager::TokenManager},
    token_store::TokenStore,
    traits::{MerchantProvider, OrderSummary},
};

/// Serves synchronous "what is the latest order?" requests, independently of the poller.
pub struct LatestOrderApi<S, P> {
    tokens: Arc<TokenManager<S, P>>,
    provider: Arc<P>,
}

impl<S, P> Debug for LatestOrderApi<S, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LatestOrderApi")
    }
}

impl<S, P> LatestOrderApi<S, P>
where
    S: TokenStore + 'static,
    P: MerchantProvider,
{
    pub fn new(tokens: Arc<TokenManager<S, P>>, provider: Arc<P>) -> Self {
        Self { tokens, provider }
    }

    /// Fetches the single most recent order. `Ok(None)` means the merchant has no orders.
    ///
    /// If the provider rejects the access token, the token is refreshed and
    /// [`LatestOrderError::Unauthorized`] is returned. The fetch is not repeated; the caller should ask again.
    pub async fn fetch_latest_order(&self) -> Result<Option<OrderSummary>, LatestOrderError> {
        let credentials = self.tokens.credentials()?.ok_or(LatestOrderError::NoCredentials)?;
        match self.provider.fetch_recent_orders(&credentials, 1).await {
            Ok(orders) => Ok(orders.into_iter().next()),
            Err(e) if e.is_unauthorized() => {
                warn!("🛰️ 401 Unauthorized: attempting to refresh token...");
                let refreshed = match self.tokens.refresh_after_rejection(&credentials.access_token).await {
                    Ok(_) => true,
                    Err(e) => {
                        error!("🛰️ Token refresh failed. {e}");
                        false
                    },
                };
                Err(LatestOrderError::Unauthorized { refreshed })
            },
            Err(e) => {
                error!("🛰️ Error fetching latest order. {e}");
                Err(LatestOrderError::Provider(e))
            },
        }
    }
}
