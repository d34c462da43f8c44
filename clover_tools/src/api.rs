use std::sync::Arc;

use log::*;
use relay_common::Secret;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::{
    config::CloverConfig,
    data_objects::{CodeExchangeRequest, OrderList, OrderRef, PrintEventRequest, RefreshTokenRequest},
    CloverApiError,
    CloverOrder,
    PrintEvent,
    TokenResponse,
};

#[derive(Clone)]
pub struct CloverApi {
    config: CloverConfig,
    client: Arc<Client>,
}

impl CloverApi {
    pub fn new(config: CloverConfig) -> Result<Self, CloverApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .user_agent("Clover Print Relay")
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CloverApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &CloverConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url.trim_end_matches('/'))
    }

    /// The page a merchant must visit to grant this app access. Clover redirects back to `redirect_uri` with a
    /// `code` query parameter.
    pub fn authorize_url(&self) -> Result<Url, CloverApiError> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];
        Url::parse_with_params(&self.url("/oauth/v2/authorize"), params)
            .map_err(|e| CloverApiError::RestRequestError(e.to_string()))
    }

    async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        access_token: Option<&Secret<String>>,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, CloverApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {method} {url}");
        let mut req = self.client.request(method, url);
        if let Some(token) = access_token {
            req = req.bearer_auth(token.reveal());
        }
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| CloverApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            // Keep the status even when the body is unreadable
            let message = response.text().await.unwrap_or_else(|e| {
                warn!("Could not read the body of a {status} response. {e}");
                String::default()
            });
            Err(CloverApiError::QueryError { status, message })
        }
    }

    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, CloverApiError> {
        let body = CodeExchangeRequest {
            client_id: &self.config.client_id,
            client_secret: self.config.client_secret.reveal(),
            code,
        };
        debug!("Exchanging authorization code for tokens");
        let result = self.rest_query::<TokenResponse, _>(Method::POST, "/oauth/v2/token", None, &[], Some(body)).await?;
        info!("Authorization code exchanged for merchant {}", result.merchant_id.as_deref().unwrap_or("(unknown)"));
        Ok(result)
    }

    pub async fn refresh_token(&self, refresh_token: &Secret<String>) -> Result<TokenResponse, CloverApiError> {
        let body = RefreshTokenRequest {
            client_id: &self.config.client_id,
            client_secret: self.config.client_secret.reveal(),
            grant_type: "refresh_token",
            refresh_token: refresh_token.reveal(),
        };
        debug!("Exchanging refresh token for a new access token");
        self.rest_query::<TokenResponse, _>(Method::POST, "/oauth/v2/token", None, &[], Some(body)).await
    }

    /// Fetch at most `limit` of the merchant's most recent orders, in the order Clover returns them.
    ///
    /// Elements that cannot be interpreted as an order (no `id`) are logged and dropped.
    pub async fn fetch_orders(
        &self,
        merchant_id: &str,
        access_token: &Secret<String>,
        limit: u32,
    ) -> Result<Vec<CloverOrder>, CloverApiError> {
        let path = format!("/v3/merchants/{merchant_id}/orders");
        let limit = limit.to_string();
        trace!("Fetching up to {limit} orders for merchant {merchant_id}");
        let result = self
            .rest_query::<OrderList, ()>(Method::GET, &path, Some(access_token), &[("limit", limit.as_str())], None)
            .await?;
        let orders = result
            .elements
            .into_iter()
            .filter_map(|v| CloverOrder::try_from(v).map_err(|e| warn!("Skipping order element. {e}")).ok())
            .collect::<Vec<_>>();
        debug!("Fetched {} orders for merchant {merchant_id}", orders.len());
        Ok(orders)
    }

    pub async fn create_print_event(
        &self,
        merchant_id: &str,
        access_token: &Secret<String>,
        order_id: &str,
    ) -> Result<PrintEvent, CloverApiError> {
        let path = format!("/v3/merchants/{merchant_id}/print_event");
        let body = PrintEventRequest { order_ref: OrderRef { id: order_id } };
        debug!("Requesting print event for order {order_id}");
        let result = self.rest_query::<PrintEvent, _>(Method::POST, &path, Some(access_token), &[], Some(body)).await?;
        info!(
            "Print event {} created for order {order_id}. State: {}",
            result.id.as_deref().unwrap_or("?"),
            result.state.as_deref().unwrap_or("?")
        );
        Ok(result)
    }
}
