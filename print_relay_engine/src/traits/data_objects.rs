use std::fmt::Display;

use relay_common::Secret;
use serde_json::{json, Value};
use thiserror::Error;

/// What a data call needs to act on behalf of a merchant.
#[derive(Debug, Clone)]
pub struct MerchantCredentials {
    pub merchant_id: String,
    pub access_token: Secret<String>,
}

/// The result of a successful code or refresh-token exchange, as reported by the provider.
#[derive(Debug, Clone, Default)]
pub struct TokenGrant {
    pub access_token: Secret<String>,
    pub refresh_token: Option<Secret<String>>,
    /// Only the authorization-code exchange identifies the merchant.
    pub merchant_id: Option<String>,
    pub expires_in: Option<u64>,
}

/// A single element of the provider's recent-orders feed.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub id: String,
    pub order_type_id: Option<String>,
    /// The full order payload exactly as the provider sent it.
    pub raw: Value,
}

impl OrderSummary {
    /// Builds a summary with a minimal payload. Handy for fixtures and replays.
    pub fn new<S: Into<String>>(id: S, order_type_id: Option<&str>) -> Self {
        let id = id.into();
        let raw = match order_type_id {
            Some(t) => json!({ "id": id, "orderType": { "id": t } }),
            None => json!({ "id": id }),
        };
        Self { id, order_type_id: order_type_id.map(String::from), raw }
    }

    pub fn is_of_type(&self, order_type_id: &str) -> bool {
        self.order_type_id.as_deref() == Some(order_type_id)
    }
}

impl Display for OrderSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Order {} (type: {})", self.id, self.order_type_id.as_deref().unwrap_or("none"))
    }
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("The provider rejected the access token. {0}")]
    Unauthorized(String),
    #[error("The provider responded with status {status}. {message}")]
    Status { status: u16, message: String },
    /// Connection failures and timeouts.
    #[error("Could not reach the provider. {0}")]
    Transport(String),
    #[error("The provider response could not be understood. {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
