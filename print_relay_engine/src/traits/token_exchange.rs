use async_trait::async_trait;
use relay_common::Secret;

use crate::traits::{ProviderError, TokenGrant};

/// The two OAuth grants the relay uses. Implementations make exactly one remote call per method and never retry.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Exchange an authorization code (from the OAuth redirect) for a token pair.
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, ProviderError>;
    /// Exchange a refresh token for a new token pair.
    async fn refresh(&self, refresh_token: &Secret<String>) -> Result<TokenGrant, ProviderError>;
}
