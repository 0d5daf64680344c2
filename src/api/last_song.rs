use std::sync::Arc;

use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::{management, server::ServerState, types::TrackSnapshot, utils, warning};

pub async fn last_song(Extension(state): Extension<Arc<ServerState>>) -> Json<Value> {
    {
        let cache = state.cache.lock().await;
        if let Some(snapshot) = &cache.snapshot {
            return Json(snapshot_json(snapshot));
        }
    }

    // Cache is empty (static mode or first request before the first tick):
    // rebuild a snapshot from the persisted static file. Refresh stays
    // confined to the background task, so this only uses the app token.
    match management::fallback_snapshot().await {
        Ok(snapshot) => {
            let mut cache = state.cache.lock().await;
            cache.publish(snapshot.clone(), &utils::now_iso());
            Json(snapshot_json(&snapshot))
        }
        Err(e) => {
            warning!("Fallback fetch failed: {}", e);
            Json(json!({
                "error": "No song data available. Please run authentication and play some music."
            }))
        }
    }
}

fn snapshot_json(snapshot: &TrackSnapshot) -> Value {
    serde_json::to_value(snapshot)
        .unwrap_or_else(|_| json!({ "error": "Failed to serialize song data" }))
}
