use std::{sync::Arc, time::Duration};

use axum::{Extension, response::Json};
use tokio::sync::Mutex;

use lastsong::api;
use lastsong::management::{CacheState, TokenManager};
use lastsong::server::{ServerState, TokenStatus};
use lastsong::types::Token;
use lastsong::utils;

fn create_test_state(expires_at: Option<u64>) -> Arc<ServerState> {
    Arc::new(ServerState {
        cache: Arc::new(Mutex::new(CacheState::new())),
        token_status: Arc::new(Mutex::new(TokenStatus { expires_at })),
        interval_secs: 30,
    })
}

fn create_test_token(created_at: u64, expires_in: u64) -> Token {
    Token {
        access_token: "access-token".to_string(),
        refresh_token: "refresh-token".to_string(),
        expires_in,
        created_at,
        scope: "user-read-recently-played".to_string(),
    }
}

#[tokio::test]
async fn test_status_reports_static_mode_without_credentials() {
    let state = create_test_state(None);

    let Json(body) = api::status(Extension(state)).await;

    assert_eq!(body["mode"], "static");
    assert_eq!(body["real_time_connected"], false);
    assert_eq!(body["has_data"], false);
    assert!(body["token_expires_at"].is_null());
    assert!(body["last_update"].is_null());
    assert_eq!(body["update_interval"], "30 seconds");
}

#[tokio::test]
async fn test_status_reports_real_time_mode_with_valid_token() {
    let expires_at = utils::now_epoch() + 3600;
    let state = create_test_state(Some(expires_at));

    let Json(body) = api::status(Extension(state)).await;

    assert_eq!(body["mode"], "real-time");
    assert_eq!(body["real_time_connected"], true);
    assert_eq!(body["token_expires_at"], expires_at);
}

#[tokio::test]
async fn test_status_falls_back_to_static_after_token_expiry() {
    let state = create_test_state(Some(utils::now_epoch() - 10));

    let Json(body) = api::status(Extension(state)).await;

    assert_eq!(body["mode"], "static");
    assert_eq!(body["real_time_connected"], false);
    assert!(body["token_expires_at"].is_null());
}

#[tokio::test]
async fn test_status_responds_while_update_tick_is_in_flight() {
    let now = utils::now_epoch();
    let state = create_test_state(Some(now + 3600));

    // The updater owns its TokenManager outright; while a tick is stuck in
    // slow network calls, status requests must still complete immediately.
    let manager = TokenManager::new(create_test_token(now, 3600));
    let tick = tokio::spawn(async move {
        let _manager = manager;
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let response = tokio::time::timeout(
        Duration::from_secs(1),
        api::status(Extension(Arc::clone(&state))),
    )
    .await;

    let Json(body) = response.expect("status endpoint stalled behind the update tick");
    assert_eq!(body["mode"], "real-time");

    tick.abort();
}
