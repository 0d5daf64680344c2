use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{api, config, error, info, management::CacheState, types::AuthAttempt};

/// Token metadata published for the status endpoint.
///
/// The background poll task owns the `TokenManager` outright; only this
/// small copy of the expiry instant is shared with request handlers, so a
/// slow tick (network calls, refresh exchange) never holds a lock the
/// handlers wait on. `None` means no user credential is loaded and the
/// server is in static mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenStatus {
    pub expires_at: Option<u64>,
}

impl TokenStatus {
    /// Real-time mode is available iff a credential exists and has not
    /// passed its expiry instant.
    pub fn connected(&self, now: u64) -> bool {
        self.expires_at.map(|at| now < at).unwrap_or(false)
    }
}

/// Shared state of the long-running web server.
///
/// The cache is written by the single background poll task and read by the
/// request handlers; both locks are only ever held for in-memory work,
/// never across network calls.
pub struct ServerState {
    pub cache: Arc<Mutex<CacheState>>,
    pub token_status: Arc<Mutex<TokenStatus>>,
    pub interval_secs: u64,
}

/// Runs the web server for the polling cache until the process exits.
pub async fn start_web_server(state: Arc<ServerState>) {
    let app = Router::new()
        .route("/health", get(api::health))
        .route("/api/last-song", get(api::last_song))
        .route("/api/status", get(api::status))
        .layer(Extension(state));

    let addr = match SocketAddr::from_str(&config::server_addr()) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => error!("Failed to bind {}: {}", addr, e),
    };
    info!("Serving at http://{}", addr);
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
    }
}

/// Runs the temporary OAuth callback server used by the interactive
/// authorization flow.
pub async fn start_callback_server(state: Arc<Mutex<Option<AuthAttempt>>>) {
    let app = Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)));

    let addr = match SocketAddr::from_str(&config::server_addr()) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => error!("Failed to bind {}: {}", addr, e),
    };
    if let Err(e) = axum::serve(listener, app).await {
        error!("Callback server error: {}", e);
    }
}
