//! Clover print relay engine
//!
//! Keeps a merchant's OAuth tokens alive, polls the merchant's order feed on a timer, and sends a print request for
//! each new order of a configured type, once per polling session.
//!
//! The library is provider-agnostic. Remote calls go through the traits in [`traits`]; the server crate adapts the
//! Clover REST client to them.
//!
//! * [`mod@token_store`]: durable, validated storage of the token record.
//! * [`TokenManager`]: code exchange and refresh, serialised by one lock.
//! * [`reconcile_batch`]: de-duplication against the session's [`SeenOrderSet`] and print dispatch.
//! * [`PollerControl`]: start/stop of the timer-driven [`OrderPoller`].
//! * [`LatestOrderApi`]: the on-demand latest-order query.
pub mod token_store;
pub mod traits;

mod relay_api;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use relay_api::{
    dispatch::{reconcile_batch, SeenOrderSet},
    errors::{AuthError, LatestOrderError, PollerError},
    latest_order_api::LatestOrderApi,
    poller::{
        OrderPoller,
        PollerConfig,
        PollerControl,
        PollerStatus,
        SkipReason,
        TickOutcome,
        DEFAULT_FETCH_LIMIT,
        DEFAULT_POLL_INTERVAL,
    },
    token_manager::TokenManager,
};
