use std::{env, time::Duration};

use log::*;
use relay_common::Secret;

pub const DEFAULT_CLOVER_API_URL: &str = "https://api.clover.com";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:3000/callback";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct CloverConfig {
    /// Base URL of the Clover environment, e.g. `https://api.clover.com` or `https://apisandbox.dev.clover.com`.
    pub api_url: String,
    pub client_id: String,
    pub client_secret: Secret<String>,
    /// Must match the redirect URI registered for the app in the Clover developer dashboard.
    pub redirect_uri: String,
    /// Upper bound on every request made against Clover.
    pub request_timeout: Duration,
}

impl Default for CloverConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_CLOVER_API_URL.to_string(),
            client_id: String::default(),
            client_secret: Secret::default(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl CloverConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = env::var("CPR_CLOVER_API_URL").unwrap_or_else(|_| {
            info!("🪛️ CPR_CLOVER_API_URL not set, using {DEFAULT_CLOVER_API_URL}");
            DEFAULT_CLOVER_API_URL.to_string()
        });
        let client_id = env::var("CPR_CLOVER_CLIENT_ID").unwrap_or_else(|_| {
            error!("🪛️ CPR_CLOVER_CLIENT_ID is not set. Please set it to the App ID of your Clover app.");
            String::default()
        });
        let client_secret = Secret::new(env::var("CPR_CLOVER_CLIENT_SECRET").unwrap_or_else(|_| {
            error!("🪛️ CPR_CLOVER_CLIENT_SECRET is not set. Please set it to the App Secret of your Clover app.");
            String::default()
        }));
        let redirect_uri = env::var("CPR_CLOVER_REDIRECT_URI").unwrap_or_else(|_| {
            warn!("🪛️ CPR_CLOVER_REDIRECT_URI not set, using {DEFAULT_REDIRECT_URI}");
            DEFAULT_REDIRECT_URI.to_string()
        });
        let request_timeout = env::var("CPR_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("🪛️ Invalid value for CPR_REQUEST_TIMEOUT_SECS ({s}). {e}"))
                    .ok()
            })
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        Self { api_url, client_id, client_secret, redirect_uri, request_timeout }
    }
}
