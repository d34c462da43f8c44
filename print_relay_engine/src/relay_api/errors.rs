use thiserror::Error;

use crate::{token_store::TokenStoreError, traits::ProviderError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No usable credentials are stored. Please authorize first.")]
    NoCredentials,
    #[error("The provider's token response is missing the {0} field.")]
    IncompleteGrant(&'static str),
    #[error("Token exchange failed. {0}")]
    Exchange(#[from] ProviderError),
    #[error("Token store error. {0}")]
    Store(#[from] TokenStoreError),
}

#[derive(Debug, Clone, Error)]
pub enum PollerError {
    #[error("Already running.")]
    AlreadyRunning,
    #[error("Not running.")]
    NotRunning,
    #[error("The polling interval must be greater than zero.")]
    InvalidInterval,
}

#[derive(Debug, Error)]
pub enum LatestOrderError {
    #[error("No access token or merchant ID found. Please authorize first.")]
    NoCredentials,
    #[error("Unable to read the token store. {0}")]
    TokenStore(#[from] TokenStoreError),
    /// The access token was rejected. A refresh was attempted, but the request itself is not retried.
    #[error("Access token expired. Refreshed. Please try again.")]
    Unauthorized { refreshed: bool },
    #[error("Error fetching latest order. {0}")]
    Provider(ProviderError),
}
