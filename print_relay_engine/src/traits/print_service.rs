use async_trait::async_trait;

use crate::traits::{MerchantCredentials, ProviderError};

#[async_trait]
pub trait PrintService: Send + Sync {
    /// Ask the provider to print a receipt for `order_id`. One remote call, no retries.
    async fn print_order(&self, order_id: &str, credentials: &MerchantCredentials) -> Result<(), ProviderError>;
}
