//! Typed REST client for the subset of the Clover platform API used by the print relay.
//!
//! * OAuth v2: authorization URL, code exchange and refresh-token exchange.
//! * Orders: list the most recent orders for a merchant.
//! * Print events: ask the merchant's default printer to print an order receipt.
mod api;
mod config;
mod error;

pub mod data_objects;

pub use api::CloverApi;
pub use config::CloverConfig;
pub use data_objects::{CloverOrder, PrintEvent, TokenResponse};
pub use error::CloverApiError;
