use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{config, spotify, types::AuthAttempt, warning};

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<AuthAttempt>>>>,
) -> Html<&'static str> {
    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    let mut state = shared_state.lock().await;
    // Only complete an authorization we started ourselves
    let Some(ref mut attempt) = state.as_mut() else {
        return Html("<h4>No authorization in progress.</h4>");
    };

    if params.get("state") != Some(&attempt.state_token) {
        warning!("Callback state mismatch, ignoring redirect.");
        return Html("<h4>State mismatch. Please restart the authorization.</h4>");
    }

    match spotify::auth::exchange_code(code, &config::redirect_uri()).await {
        Ok(token) => {
            attempt.token = Some(token);
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            Html("<h4>Login failed.</h4>")
        }
    }
}
