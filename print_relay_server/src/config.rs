use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use clover_tools::CloverConfig;
use log::*;
use print_relay_engine::{PollerConfig, DEFAULT_FETCH_LIMIT, DEFAULT_POLL_INTERVAL};
use relay_common::parse_flag;

const DEFAULT_CPR_HOST: &str = "127.0.0.1";
const DEFAULT_CPR_PORT: u16 = 3000;
const DEFAULT_TOKEN_FILE: &str = "tokens.json";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Where the OAuth token record is persisted.
    pub token_file: PathBuf,
    /// If true, polling starts with the default interval as soon as the server is up.
    pub autostart: bool,
    pub poller: PollerConfig,
    pub clover: CloverConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CPR_HOST.to_string(),
            port: DEFAULT_CPR_PORT,
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            autostart: false,
            poller: PollerConfig::default(),
            clover: CloverConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("CPR_HOST").ok().unwrap_or_else(|| DEFAULT_CPR_HOST.into());
        let port = parse_value("CPR_PORT", env::var("CPR_PORT").ok(), DEFAULT_CPR_PORT);
        let token_file = env::var("CPR_TOKEN_FILE").map(PathBuf::from).unwrap_or_else(|_| {
            info!("🪛️ CPR_TOKEN_FILE is not set. Tokens will be kept in {DEFAULT_TOKEN_FILE}.");
            PathBuf::from(DEFAULT_TOKEN_FILE)
        });
        let autostart = env::var("CPR_AUTOSTART")
            .ok()
            .map(|s| {
                parse_flag(&s).unwrap_or_else(|e| {
                    warn!("🪛️ Invalid configuration value for CPR_AUTOSTART. {e} Polling will not start automatically.");
                    false
                })
            })
            .unwrap_or(false);
        let poller = configure_poller();
        let clover = CloverConfig::new_from_env_or_default();
        Self { host, port, token_file, autostart, poller, clover }
    }
}

fn configure_poller() -> PollerConfig {
    let interval_ms = env::var("CPR_POLL_INTERVAL_MS").ok().or_else(|| {
        info!(
            "🪛️ CPR_POLL_INTERVAL_MS is not set. Using the default value of {} ms.",
            DEFAULT_POLL_INTERVAL.as_millis()
        );
        None
    });
    let default_ms = u64::try_from(DEFAULT_POLL_INTERVAL.as_millis()).unwrap_or(u64::MAX);
    let interval_ms = parse_value("CPR_POLL_INTERVAL_MS", interval_ms, default_ms);
    let interval = if interval_ms == 0 {
        warn!("🪛️ CPR_POLL_INTERVAL_MS must be greater than zero. Using the default instead.");
        DEFAULT_POLL_INTERVAL
    } else {
        Duration::from_millis(interval_ms)
    };
    let fetch_limit = parse_value("CPR_FETCH_LIMIT", env::var("CPR_FETCH_LIMIT").ok(), DEFAULT_FETCH_LIMIT);
    let target_order_type_id = env::var("CPR_TARGET_ORDER_TYPE_ID").ok().unwrap_or_else(|| {
        error!(
            "🪛️ CPR_TARGET_ORDER_TYPE_ID is not set. Please set it to the id of the order type whose receipts should \
             be printed."
        );
        String::default()
    });
    PollerConfig { interval, fetch_limit, target_order_type_id }
}

/// Parses an optional environment value, logging and falling back to `default` if it is absent or invalid.
fn parse_value<T>(name: &str, value: Option<String>, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match value {
        Some(s) => s.trim().parse::<T>().unwrap_or_else(|e| {
            error!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
            default
        }),
        None => default,
    }
}
