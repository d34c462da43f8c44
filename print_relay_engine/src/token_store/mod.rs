//! Durable storage for the merchant's OAuth tokens.
//!
//! The persisted document is a flat JSON object, `{access_token, refresh_token, merchant_id}`. It is validated once,
//! when it is read: a document with any field missing or empty is reported as "no tokens" rather than as a partially
//! usable record, so consumers never need to re-check individual fields.
mod json_file;

use relay_common::Secret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use json_file::JsonTokenStore;

use crate::traits::{MerchantCredentials, TokenGrant};

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("Could not access the token store. {0}")]
    Io(#[from] std::io::Error),
    #[error("The token store is corrupt. {0}")]
    Corrupt(String),
}

pub trait TokenStore: Send + Sync {
    /// Returns `Ok(None)` if there are no tokens yet, or if the stored record is incomplete.
    fn load(&self) -> Result<Option<TokenRecord>, TokenStoreError>;
    /// Replaces the stored record in its entirety.
    fn save(&self, record: &TokenRecord) -> Result<(), TokenStoreError>;
}

/// A complete, usable set of credentials for one merchant.
#[derive(Debug, Clone)]
pub struct TokenRecord {
    pub access_token: Secret<String>,
    pub refresh_token: Secret<String>,
    pub merchant_id: String,
}

impl TokenRecord {
    pub fn new<S: Into<String>>(access_token: S, refresh_token: S, merchant_id: S) -> Self {
        Self {
            access_token: Secret::new(access_token.into()),
            refresh_token: Secret::new(refresh_token.into()),
            merchant_id: merchant_id.into(),
        }
    }

    pub fn credentials(&self) -> MerchantCredentials {
        MerchantCredentials { merchant_id: self.merchant_id.clone(), access_token: self.access_token.clone() }
    }

    /// The record that results from a refresh grant. The merchant never changes, and if the provider did not rotate
    /// the refresh token, the current one is kept.
    pub fn refreshed(&self, grant: TokenGrant) -> Self {
        let refresh_token = grant.refresh_token.filter(|t| !t.is_empty()).unwrap_or_else(|| self.refresh_token.clone());
        Self { access_token: grant.access_token, refresh_token, merchant_id: self.merchant_id.clone() }
    }
}

/// The on-disk shape of the token document. Every field is optional here; [`StoredTokens::into_record`] applies the
/// validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,
}

impl StoredTokens {
    pub fn into_record(self) -> Option<TokenRecord> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let access_token = non_empty(self.access_token)?;
        let refresh_token = non_empty(self.refresh_token)?;
        let merchant_id = non_empty(self.merchant_id)?;
        Some(TokenRecord::new(access_token, refresh_token, merchant_id))
    }
}

impl From<&TokenRecord> for StoredTokens {
    fn from(record: &TokenRecord) -> Self {
        Self {
            access_token: Some(record.access_token.reveal().clone()),
            refresh_token: Some(record.refresh_token.reveal().clone()),
            merchant_id: Some(record.merchant_id.clone()),
        }
    }
}
