use actix_web::{
    http::{header, StatusCode},
    test,
    test::TestRequest,
    App,
};
use print_relay_engine::traits::{ProviderError, TokenGrant};

use super::helpers::{get, unauthorized, AUTHORIZE_URL};
use crate::{endpoint_tests::mocks::MockProvider, server::configure_relay};

fn grant(merchant_id: Option<&str>) -> TokenGrant {
    TokenGrant {
        access_token: "access-new".into(),
        refresh_token: Some("refresh-new".into()),
        merchant_id: merchant_id.map(String::from),
        expires_in: Some(3600),
    }
}

#[actix_web::test]
async fn health_check() {
    let _ = env_logger::try_init().ok();
    let state = unauthorized(MockProvider::new());
    let (status, body) = get(&state, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn login_redirects_to_authorize_page() {
    let _ = env_logger::try_init().ok();
    let state = unauthorized(MockProvider::new());
    let app = test::init_service(App::new().configure(|cfg| configure_relay(cfg, &state))).await;
    let res = test::call_service(&app, TestRequest::get().uri("/oauth/login").to_request()).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    let location = res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok());
    assert_eq!(location, Some(AUTHORIZE_URL));
}

#[actix_web::test]
async fn callback_exchanges_code_and_persists_tokens() {
    let _ = env_logger::try_init().ok();
    let mut provider = MockProvider::new();
    provider.expect_exchange_code().withf(|code| code == "abc123").times(1).returning(|_| Ok(grant(Some("M9"))));
    let state = unauthorized(provider);
    let (status, body) = get(&state, "/callback?code=abc123").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("OAuth Successful"));
    let record = state.tokens.current().unwrap().expect("tokens should be stored");
    assert_eq!(record.access_token.reveal(), "access-new");
    assert_eq!(record.refresh_token.reveal(), "refresh-new");
    assert_eq!(record.merchant_id, "M9");
}

#[actix_web::test]
async fn callback_with_provider_error_does_not_exchange() {
    let _ = env_logger::try_init().ok();
    // No expectations: any call to the provider fails the test
    let state = unauthorized(MockProvider::new());
    let (status, body) = get(&state, "/callback?error=access_denied&error_description=%3Cb%3Enope%3C%2Fb%3E").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("OAuth Failed"));
    assert!(body.contains("access_denied: &lt;b&gt;nope&lt;/b&gt;"));
    assert!(state.tokens.current().unwrap().is_none());
}

#[actix_web::test]
async fn callback_without_code() {
    let _ = env_logger::try_init().ok();
    let state = unauthorized(MockProvider::new());
    let (status, body) = get(&state, "/callback").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Missing authorization code."}"#);
    let (status, _) = get(&state, "/callback?code=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn callback_exchange_failure() {
    let _ = env_logger::try_init().ok();
    let mut provider = MockProvider::new();
    provider
        .expect_exchange_code()
        .times(1)
        .returning(|_| Err(ProviderError::Status { status: 400, message: "bad code".into() }));
    let state = unauthorized(provider);
    let (status, body) = get(&state, "/callback?code=stale").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("OAuth failed."));
    assert!(state.tokens.current().unwrap().is_none());
}

#[actix_web::test]
async fn callback_grant_without_merchant_is_rejected() {
    let _ = env_logger::try_init().ok();
    let mut provider = MockProvider::new();
    provider.expect_exchange_code().times(1).returning(|_| Ok(grant(None)));
    let state = unauthorized(provider);
    let (status, body) = get(&state, "/callback?code=abc123").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("merchant_id"));
    assert!(state.tokens.current().unwrap().is_none());
}
