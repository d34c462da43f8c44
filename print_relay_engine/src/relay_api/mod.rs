pub mod dispatch;
pub mod errors;
pub mod latest_order_api;
pub mod poller;
pub mod token_manager;
