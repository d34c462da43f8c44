//! The seams between the engine and the point-of-sale provider.
//!
//! The engine never talks HTTP itself. A provider integration implements [`TokenExchange`], [`OrderFeed`] and
//! [`PrintService`], and thereby [`MerchantProvider`], which is what the APIs in this crate are generic over.
mod data_objects;
mod order_feed;
mod print_service;
mod token_exchange;

pub use data_objects::{MerchantCredentials, OrderSummary, ProviderError, TokenGrant};
pub use order_feed::OrderFeed;
pub use print_service::PrintService;
pub use token_exchange::TokenExchange;

/// Everything the relay needs from a provider.
pub trait MerchantProvider: TokenExchange + OrderFeed + PrintService + 'static {}

impl<T> MerchantProvider for T where T: TokenExchange + OrderFeed + PrintService + 'static {}
