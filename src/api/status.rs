use std::sync::Arc;

use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::{server::ServerState, utils};

pub async fn status(Extension(state): Extension<Arc<ServerState>>) -> Json<Value> {
    let now = utils::now_epoch();

    let (connected, expires_at) = {
        let token = state.token_status.lock().await;
        if token.connected(now) {
            (true, token.expires_at)
        } else {
            (false, None)
        }
    };

    let (has_data, last_update) = {
        let cache = state.cache.lock().await;
        (cache.has_data(), cache.last_updated.clone())
    };

    let mode = if connected { "real-time" } else { "static" };

    Json(json!({
        "real_time_connected": connected,
        "has_data": has_data,
        "token_expires_at": expires_at,
        "last_update": last_update,
        "update_interval": format!("{} seconds", state.interval_secs),
        "mode": mode,
    }))
}
