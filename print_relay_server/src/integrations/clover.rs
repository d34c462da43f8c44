//! Adapts the Clover REST client to the provider traits the relay engine is written against.
use async_trait::async_trait;
use clover_tools::{CloverApi, CloverApiError, CloverOrder, TokenResponse};
use log::*;
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

#[derive(Clone)]
pub struct CloverGateway {
    api: CloverApi,
}

impl CloverGateway {
    pub fn new(api: CloverApi) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &CloverApi {
        &self.api
    }
}

#[async_trait]
impl TokenExchange for CloverGateway {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, ProviderError> {
        let response = self.api.exchange_code(code).await.map_err(provider_error)?;
        Ok(token_grant(response))
    }

    async fn refresh(&self, refresh_token: &Secret<String>) -> Result<TokenGrant, ProviderError> {
        let response = self.api.refresh_token(refresh_token).await.map_err(provider_error)?;
        Ok(token_grant(response))
    }
}

#[async_trait]
impl OrderFeed for CloverGateway {
    async fn fetch_recent_orders(
        &self,
        credentials: &MerchantCredentials,
        limit: u32,
    ) -> Result<Vec<OrderSummary>, ProviderError> {
        let orders = self
            .api
            .fetch_orders(&credentials.merchant_id, &credentials.access_token, limit)
            .await
            .map_err(provider_error)?;
        Ok(orders.into_iter().map(order_summary).collect())
    }
}

#[async_trait]
impl PrintService for CloverGateway {
    async fn print_order(&self, order_id: &str, credentials: &MerchantCredentials) -> Result<(), ProviderError> {
        let event = self
            .api
            .create_print_event(&credentials.merchant_id, &credentials.access_token, order_id)
            .await
            .map_err(provider_error)?;
        trace!("🖨️ Clover acknowledged print event {:?} for order {order_id}", event.id);
        Ok(())
    }
}

fn provider_error(e: CloverApiError) -> ProviderError {
    match e {
        CloverApiError::QueryError { status: 401, message } => ProviderError::Unauthorized(message),
        CloverApiError::QueryError { status, message } => ProviderError::Status { status, message },
        CloverApiError::JsonError(s) => ProviderError::InvalidResponse(s),
        CloverApiError::Timeout(s)
        | CloverApiError::RestResponseError(s)
        | CloverApiError::RestRequestError(s)
        | CloverApiError::Initialization(s) => ProviderError::Transport(s),
    }
}

fn token_grant(response: TokenResponse) -> TokenGrant {
    TokenGrant {
        access_token: response.access_token,
        refresh_token: response.refresh_token,
        merchant_id: response.merchant_id,
        expires_in: response.expires_in,
    }
}

fn order_summary(order: CloverOrder) -> OrderSummary {
    OrderSummary { id: order.id, order_type_id: order.order_type_id, raw: order.raw }
}
