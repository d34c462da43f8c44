use actix_web::http::StatusCode;
use serde_json::Value;

use super::helpers::{authorized, get, post, unauthorized};
use crate::{endpoint_tests::mocks::MockProvider, server::shutdown_poller};

#[actix_web::test]
async fn start_and_stop() {
    let _ = env_logger::try_init().ok();
    let state = authorized(MockProvider::new());
    let (status, body) = post(&state, "/api/start").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Polling started."}"#);
    assert!(state.control.is_running().await);

    let (status, body) = post(&state, "/api/stop").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Polling stopped."}"#);
    assert!(!state.control.is_running().await);
}

#[actix_web::test]
async fn start_twice_is_rejected() {
    let _ = env_logger::try_init().ok();
    let state = authorized(MockProvider::new());
    let (status, _) = post(&state, "/api/start").await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = post(&state, "/api/start").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Already running."}"#);
    assert!(state.control.is_running().await);
    state.control.stop().await.unwrap();
}

#[actix_web::test]
async fn stop_when_not_running() {
    let _ = env_logger::try_init().ok();
    let state = authorized(MockProvider::new());
    let (status, body) = post(&state, "/api/stop").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Not running."}"#);
}

#[actix_web::test]
async fn start_does_not_require_authorization() {
    let _ = env_logger::try_init().ok();
    // Ticks skip until tokens exist; starting is always allowed
    let state = unauthorized(MockProvider::new());
    let (status, _) = post(&state, "/api/start").await;
    assert_eq!(status, StatusCode::OK);
    state.control.stop().await.unwrap();
}

#[actix_web::test]
async fn start_with_interval_override() {
    let _ = env_logger::try_init().ok();
    let state = authorized(MockProvider::new());
    let (status, _) = post(&state, "/api/start?interval_ms=90000").await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = get(&state, "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["running"], true);
    assert_eq!(json["interval_ms"], 90000);
    assert_eq!(json["seen_orders"], 0);
    assert!(json["started_at"].is_string());
    state.control.stop().await.unwrap();
}

#[actix_web::test]
async fn zero_interval_is_rejected() {
    let _ = env_logger::try_init().ok();
    let state = authorized(MockProvider::new());
    let (status, body) = post(&state, "/api/start?interval_ms=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("greater than zero"));
    assert!(!state.control.is_running().await);
}

#[actix_web::test]
async fn status_when_stopped() {
    let _ = env_logger::try_init().ok();
    let state = authorized(MockProvider::new());
    let (status, body) = get(&state, "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["running"], false);
    assert!(json["interval_ms"].is_null());
    assert!(json["started_at"].is_null());
}

#[actix_web::test]
async fn start_is_post_only() {
    let _ = env_logger::try_init().ok();
    let state = authorized(MockProvider::new());
    let (status, _) = get(&state, "/api/start").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!state.control.is_running().await);
}

#[actix_web::test]
async fn shutdown_stops_a_running_poller() {
    let _ = env_logger::try_init().ok();
    let state = authorized(MockProvider::new());
    let (status, _) = post(&state, "/api/start").await;
    assert_eq!(status, StatusCode::OK);
    shutdown_poller(&state.control).await;
    assert!(!state.control.is_running().await);
    // Nothing left to stop; must not error or panic
    shutdown_poller(&state.control).await;
    assert!(!state.control.is_running().await);
}
