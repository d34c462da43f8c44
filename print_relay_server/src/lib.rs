//! # Clover print relay server
//! Hosts the HTTP front end of the print relay. It is responsible for:
//! * Walking the merchant through the Clover OAuth flow and persisting the resulting tokens.
//! * Starting and stopping the order poller, which prints a receipt for every new order of the configured type.
//! * Answering on-demand "latest order" queries.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/oauth/login`: Redirects to the Clover authorization page.
//! * `/callback`: The OAuth redirect target. Exchanges the authorization code for tokens.
//! * `/api/start`, `/api/stop`, `/api/status`: Poller control.
//! * `/api/latest-order`: The most recent order for the authorized merchant.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod integrations;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
