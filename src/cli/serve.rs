use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    config, info,
    management::{CacheState, TokenManager, run_poll_loop},
    server::{ServerState, TokenStatus, start_web_server},
    success, utils, warning,
};

/// Runs the long-lived web server with the background polling cache.
///
/// With a saved, usable credential the server operates in real-time mode:
/// a background task refreshes the cached track every `interval` seconds
/// (an expired token is refreshed on the first tick). Without one the
/// server stays in static mode, serving only the previously exported
/// snapshot file, and `/api/status` reports the mode accordingly.
pub async fn serve(interval: Option<u64>) {
    let interval_secs = interval.unwrap_or_else(config::update_interval);

    let cache = Arc::new(Mutex::new(CacheState::new()));
    let token_status = Arc::new(Mutex::new(TokenStatus::default()));

    match TokenManager::load().await {
        Ok(manager) => {
            if manager.token().is_valid(utils::now_epoch()) {
                success!("Saved credentials found - enabling real-time updates");
            } else {
                info!("Saved token expired - will refresh on first update");
            }
            token_status.lock().await.expires_at = Some(manager.token().expires_at());

            info!("Updating every {} seconds", interval_secs);
            tokio::spawn(run_poll_loop(
                Arc::clone(&cache),
                manager,
                Arc::clone(&token_status),
                interval_secs,
            ));
        }
        Err(_) => {
            warning!("No saved credentials - running in static mode");
            warning!("Run `lastsong auth` to enable real-time updates");
        }
    }

    let state = Arc::new(ServerState {
        cache,
        token_status,
        interval_secs,
    });
    start_web_server(state).await;
}
