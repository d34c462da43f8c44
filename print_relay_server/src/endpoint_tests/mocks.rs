use async_trait::async_trait;
use mockall::mock;
use print_relay_engine::traits::{
    MerchantCredentials,
    OrderFeed,
    OrderSummary,
    PrintService,
    ProviderError,
    TokenExchange,
    TokenGrant,
};
use relay_common::Secret;

mock! {
    pub Provider {}
    #[async_trait]
    impl TokenExchange for Provider {
        async fn exchange_code(&self, code: &str) -> Result<TokenGrant, ProviderError>;
        async fn refresh(&self, refresh_token: &Secret<String>) -> Result<TokenGrant, ProviderError>;
    }
    #[async_trait]
    impl OrderFeed for Provider {
        async fn fetch_recent_orders(&self, credentials: &MerchantCredentials, limit: u32) -> Result<Vec<OrderSummary>, ProviderError>;
    }
    #[async_trait]
    impl PrintService for Provider {
        async fn print_order(&self, order_id: &str, credentials: &MerchantCredentials) -> Result<(), ProviderError>;
    }
}
