use std::{sync::Arc, time::Duration};

use actix_web::{http::StatusCode, test, test::TestRequest, App};
use log::debug;
use print_relay_engine::{test_utils::MemoryTokenStore, token_store::TokenRecord, PollerConfig};

use super::mocks::MockProvider;
use crate::{routes::AuthorizeUrl, server::configure_relay, server::RelayState};

pub const AUTHORIZE_URL: &str =
    "https://sandbox.example/oauth/v2/authorize?client_id=APP1&response_type=code&redirect_uri=http%3A%2F%2Flocalhost";

pub type TestState = RelayState<MemoryTokenStore, MockProvider>;

pub fn stored_record() -> TokenRecord {
    TokenRecord::new("access-0", "refresh-0", "MERCH1")
}

pub fn poller_config() -> PollerConfig {
    // Long enough that no tick fires while a test is running
    PollerConfig {
        interval: Duration::from_secs(3600),
        fetch_limit: 2,
        target_order_type_id: "online".to_string(),
    }
}

pub fn state_with(store: MemoryTokenStore, provider: MockProvider) -> TestState {
    RelayState::new(store, Arc::new(provider), &poller_config(), AuthorizeUrl(AUTHORIZE_URL.to_string()))
}

/// A relay that has already been authorized for MERCH1.
pub fn authorized(provider: MockProvider) -> TestState {
    state_with(MemoryTokenStore::with_record(&stored_record()), provider)
}

pub fn unauthorized(provider: MockProvider) -> TestState {
    state_with(MemoryTokenStore::new(), provider)
}

pub async fn send(state: &TestState, req: TestRequest) -> (StatusCode, String) {
    let app = App::new().configure(|cfg| configure_relay(cfg, state));
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}

pub async fn get(state: &TestState, path: &str) -> (StatusCode, String) {
    send(state, TestRequest::get().uri(path)).await
}

pub async fn post(state: &TestState, path: &str) -> (StatusCode, String) {
    send(state, TestRequest::post().uri(path)).await
}
