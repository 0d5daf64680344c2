use std::{fmt, sync::Arc, time::Duration};

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::StatusCode;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    config, error,
    management::TokenManager,
    server::start_callback_server,
    spotify::http_client,
    success,
    types::{AuthAttempt, Token},
    utils, warning,
};

/// Failure of a token endpoint exchange.
///
/// `Rejected` carries the HTTP status and response body for diagnostics;
/// it is never retried automatically since it indicates bad client
/// credentials or an invalid/expired code or refresh token.
#[derive(Debug)]
pub enum AuthError {
    Rejected { status: StatusCode, body: String },
    Network(reqwest::Error),
    Malformed(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Rejected { status, body } => {
                write!(f, "token endpoint rejected request ({}): {}", status, body)
            }
            AuthError::Network(e) => write!(f, "token endpoint unreachable: {}", e),
            AuthError::Malformed(msg) => write!(f, "malformed token response: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

/// Completes the interactive OAuth 2.0 authorization-code flow with Spotify.
///
/// This function orchestrates the entire authentication process:
/// 1. Generating a random `state` nonce
/// 2. Starting a local callback server
/// 3. Opening the authorization URL in the user's browser
/// 4. Waiting for the OAuth callback to exchange the code
/// 5. Persisting the obtained token for future use
///
/// The code exchange itself happens in the callback handler; this function
/// polls the shared state until a token appears or the wait times out.
///
/// # Arguments
///
/// * `shared_state` - Thread-safe shared state holding the `state` nonce
///   and, once the callback has completed, the resulting token
///
/// # Error Handling
///
/// - Browser launch failures result in a warning with manual URL instructions
/// - Token persistence failures terminate the program with an error
/// - Authentication timeouts or failures terminate with an error message
pub async fn authorize(shared_state: Arc<Mutex<Option<AuthAttempt>>>) {
    let state_token = utils::oauth_state_token();

    // start callback server
    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        start_callback_server(server_state).await;
    });

    // Construct the authorization URL
    let auth_url = format!(
        "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&state={state}&scope={scope}",
        auth_url = config::SPOTIFY_AUTH_URL,
        client_id = &config::client_id(),
        redirect_uri = &config::redirect_uri(),
        state = state_token,
        scope = config::SPOTIFY_SCOPE
    );

    // Store the nonce in shared state before redirect
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(AuthAttempt {
            state_token,
            token: None,
        });
    }

    // Open the authorization URL in the default browser
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    // wait for callback to be hit
    let token = wait_for_token(shared_state).await;

    match token {
        Some(t) => {
            let token_manager = TokenManager::new(t);
            if let Err(e) = token_manager.persist().await {
                error!("Failed to save token to cache: {}", e);
            }

            success!("Authentication successful!");
        }
        None => {
            error!("Authentication failed or timed out.");
        }
    }
}

/// Waits for the OAuth callback to complete and return a token.
///
/// Polls the shared state for a completed token with a 120-second timeout,
/// running concurrently with the callback handler that populates it after
/// the code exchange. Returns `None` when the timeout is reached.
async fn wait_for_token(shared_state: Arc<Mutex<Option<AuthAttempt>>>) -> Option<Token> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(120);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(attempt) = lock.as_ref() {
            if let Some(token) = &attempt.token {
                return Some(token.clone());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges an authorization code for an access token.
///
/// Completes the authorization-code flow by POSTing the code together with
/// the redirect URI to the token endpoint, authenticated with the Basic
/// client credentials header. The caller persists the resulting record.
///
/// # Arguments
///
/// * `code` - Authorization code received from the OAuth callback
/// * `redirect_uri` - The redirect URI used in the authorization request;
///   must match exactly or the provider rejects the exchange
pub async fn exchange_code(code: &str, redirect_uri: &str) -> Result<Token, AuthError> {
    let json = token_request(&[
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", redirect_uri),
    ])
    .await?;

    parse_token_response(&json, None, utils::now_epoch())
}

/// Refreshes an expired access token using the stored refresh token.
///
/// Exchanges the refresh token for a new access token so authenticated
/// access continues without user interaction. Providers may rotate the
/// refresh token or omit it from the response; when omitted, the old
/// refresh token is carried forward into the new record.
pub async fn refresh(old: &Token) -> Result<Token, AuthError> {
    let json = token_request(&[
        ("grant_type", "refresh_token"),
        ("refresh_token", &old.refresh_token),
    ])
    .await?;

    parse_token_response(&json, Some(old), utils::now_epoch())
}

/// Obtains an app-only access token via the client-credentials flow.
///
/// This token has no user scope and is used for public catalog lookups
/// (track and artist metadata). It is independent of the user's personal
/// token, so catalog reads keep working even when the user token has
/// expired or was never obtained.
pub async fn client_credentials_token() -> Result<String, AuthError> {
    let json = token_request(&[("grant_type", "client_credentials")]).await?;

    json["access_token"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AuthError::Malformed("response missing access_token".to_string()))
}

/// Parses a token endpoint response into a credential record.
///
/// `fallback` supplies the previous record during a refresh: its refresh
/// token (and scope) are retained when the response omits them. A missing
/// `access_token` is always an error; a missing `expires_in` defaults to
/// one hour, matching provider behavior.
pub fn parse_token_response(
    json: &Value,
    fallback: Option<&Token>,
    now: u64,
) -> Result<Token, AuthError> {
    let access_token = json["access_token"]
        .as_str()
        .ok_or_else(|| AuthError::Malformed("response missing access_token".to_string()))?
        .to_string();

    let refresh_token = json["refresh_token"]
        .as_str()
        .map(str::to_string)
        .or_else(|| fallback.map(|t| t.refresh_token.clone()))
        .ok_or_else(|| AuthError::Malformed("response missing refresh_token".to_string()))?;

    let scope = json["scope"]
        .as_str()
        .map(str::to_string)
        .or_else(|| fallback.map(|t| t.scope.clone()))
        .unwrap_or_default();

    Ok(Token {
        access_token,
        refresh_token,
        scope,
        expires_in: json["expires_in"].as_u64().unwrap_or(3600),
        created_at: now,
    })
}

fn basic_auth_header() -> String {
    let credentials = format!("{}:{}", config::client_id(), config::client_secret());
    format!("Basic {}", STANDARD.encode(credentials.as_bytes()))
}

async fn token_request(form: &[(&str, &str)]) -> Result<Value, AuthError> {
    let client = http_client().map_err(AuthError::Network)?;
    let res = client
        .post(config::SPOTIFY_TOKEN_URL)
        .header("Authorization", basic_auth_header())
        .form(form)
        .send()
        .await
        .map_err(AuthError::Network)?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(AuthError::Rejected { status, body });
    }

    res.json().await.map_err(AuthError::Network)
}
