use relay_common::Secret;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::CloverApiError;

/// Response from `/oauth/v2/token`, for both the authorization-code and the refresh-token grants.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: Secret<String>,
    #[serde(default)]
    pub refresh_token: Option<Secret<String>>,
    /// Only present on the authorization-code grant.
    #[serde(default)]
    pub merchant_id: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Serialize)]
pub(crate) struct CodeExchangeRequest<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub code: &'a str,
}

#[derive(Serialize)]
pub(crate) struct RefreshTokenRequest<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub grant_type: &'static str,
    pub refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderList {
    #[serde(default)]
    pub elements: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OrderRef<'a> {
    pub id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct PrintEventRequest<'a> {
    #[serde(rename = "orderRef")]
    pub order_ref: OrderRef<'a>,
}

/// Clover's acknowledgement of a print event. Only the fields we log are typed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrintEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// An order as returned by the order listing endpoint. The full payload is kept in `raw`.
#[derive(Debug, Clone, PartialEq)]
pub struct CloverOrder {
    pub id: String,
    /// `orderType.id`, if the order has an order type attached.
    pub order_type_id: Option<String>,
    pub raw: Value,
}

impl TryFrom<Value> for CloverOrder {
    type Error = CloverApiError;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        let id = raw["id"]
            .as_str()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CloverApiError::JsonError(format!("Order element has no id: {raw}")))?
            .to_string();
        let order_type_id = raw["orderType"]["id"].as_str().map(String::from);
        Ok(Self { id, order_type_id, raw })
    }
}
