use async_trait::async_trait;

use crate::traits::{MerchantCredentials, OrderSummary, ProviderError};

#[async_trait]
pub trait OrderFeed: Send + Sync {
    /// Fetch at most `limit` of the merchant's most recent orders, in the order the provider lists them.
    ///
    /// A rejected access token must be reported as [`ProviderError::Unauthorized`].
    async fn fetch_recent_orders(
        &self,
        credentials: &MerchantCredentials,
        limit: u32,
    ) -> Result<Vec<OrderSummary>, ProviderError>;
}
