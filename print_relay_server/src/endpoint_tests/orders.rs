use actix_web::http::StatusCode;
use print_relay_engine::{
    test_utils::MemoryTokenStore,
    token_store::StoredTokens,
    traits::{OrderSummary, ProviderError, TokenGrant},
};
use serde_json::{json, Value};

use super::helpers::{authorized, get, state_with, unauthorized};
use crate::endpoint_tests::mocks::MockProvider;

#[actix_web::test]
async fn latest_order_requires_authorization() {
    let _ = env_logger::try_init().ok();
    let state = unauthorized(MockProvider::new());
    let (status, body) = get(&state, "/api/latest-order").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"No access token or merchant ID found. Please authorize first."}"#);
}

#[actix_web::test]
async fn latest_order_with_partial_tokens() {
    let _ = env_logger::try_init().ok();
    let doc = StoredTokens { access_token: Some("access-0".into()), ..Default::default() };
    let state = state_with(MemoryTokenStore::with_document(doc), MockProvider::new());
    let (status, _) = get(&state, "/api/latest-order").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn latest_order_returns_raw_payload() {
    let _ = env_logger::try_init().ok();
    let mut provider = MockProvider::new();
    provider
        .expect_fetch_recent_orders()
        .withf(|creds, limit| creds.merchant_id == "MERCH1" && creds.access_token.reveal() == "access-0" && *limit == 1)
        .times(1)
        .returning(|_, _| {
            let raw = json!({"id": "ORD1", "orderType": {"id": "online"}, "total": 1250, "note": "extra napkins"});
            Ok(vec![OrderSummary { id: "ORD1".into(), order_type_id: Some("online".into()), raw }])
        });
    let state = authorized(provider);
    let (status, body) = get(&state, "/api/latest-order").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json, json!({"id": "ORD1", "orderType": {"id": "online"}, "total": 1250, "note": "extra napkins"}));
}

#[actix_web::test]
async fn latest_order_ignores_order_type() {
    let _ = env_logger::try_init().ok();
    let mut provider = MockProvider::new();
    provider.expect_fetch_recent_orders().times(1).returning(|_, _| Ok(vec![OrderSummary::new("ORD2", Some("in-store"))]));
    let state = authorized(provider);
    let (status, body) = get(&state, "/api/latest-order").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["id"], "ORD2");
}

#[actix_web::test]
async fn latest_order_no_orders() {
    let _ = env_logger::try_init().ok();
    let mut provider = MockProvider::new();
    provider.expect_fetch_recent_orders().times(1).returning(|_, _| Ok(vec![]));
    let state = authorized(provider);
    let (status, body) = get(&state, "/api/latest-order").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"message":"No orders found."}"#);
}

#[actix_web::test]
async fn expired_token_is_refreshed_but_not_retried() {
    let _ = env_logger::try_init().ok();
    let mut provider = MockProvider::new();
    provider
        .expect_fetch_recent_orders()
        .times(1)
        .returning(|_, _| Err(ProviderError::Unauthorized("token expired".into())));
    provider.expect_refresh().withf(|t| t.reveal() == "refresh-0").times(1).returning(|_| {
        Ok(TokenGrant {
            access_token: "access-1".into(),
            refresh_token: Some("refresh-1".into()),
            merchant_id: None,
            expires_in: None,
        })
    });
    let state = authorized(provider);
    let (status, body) = get(&state, "/api/latest-order").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Access token expired. Refreshed. Please try again."}"#);
    let record = state.tokens.current().unwrap().unwrap();
    assert_eq!(record.access_token.reveal(), "access-1");
    assert_eq!(record.merchant_id, "MERCH1");
}

#[actix_web::test]
async fn expired_token_and_failed_refresh() {
    let _ = env_logger::try_init().ok();
    let mut provider = MockProvider::new();
    provider
        .expect_fetch_recent_orders()
        .times(1)
        .returning(|_, _| Err(ProviderError::Unauthorized("token expired".into())));
    provider
        .expect_refresh()
        .times(1)
        .returning(|_| Err(ProviderError::Status { status: 400, message: "invalid_grant".into() }));
    let state = authorized(provider);
    let (status, body) = get(&state, "/api/latest-order").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("could not be refreshed"));
    let record = state.tokens.current().unwrap().unwrap();
    assert_eq!(record.access_token.reveal(), "access-0");
}

#[actix_web::test]
async fn provider_failure() {
    let _ = env_logger::try_init().ok();
    let mut provider = MockProvider::new();
    provider
        .expect_fetch_recent_orders()
        .times(1)
        .returning(|_, _| Err(ProviderError::Status { status: 503, message: "maintenance".into() }));
    let state = authorized(provider);
    let (status, body) = get(&state, "/api/latest-order").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with(r#"{"error":"Error fetching latest order."#));
    assert!(body.contains("maintenance"));
}
