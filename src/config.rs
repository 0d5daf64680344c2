//! Configuration management for the Spotify Last Song tracker.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and a `.env` file in the working directory. The
//! recognized options are the Spotify application credentials (client id,
//! client secret, redirect URI) plus the server bind address and the
//! polling interval, both of which carry defaults.
//!
//! Spotify endpoint URLs and file locations are fixed and exposed as
//! constants; the token cache and the snapshot files live in the process's
//! working directory.

use dotenv;
use std::env;

/// Spotify OAuth authorization endpoint.
pub const SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";

/// Spotify OAuth token exchange endpoint.
pub const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Spotify Web API base URL.
pub const SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";

/// OAuth scope required to read the user's play history.
pub const SPOTIFY_SCOPE: &str = "user-read-recently-played";

/// Token cache file, relative to the working directory.
pub const TOKEN_CACHE_FILE: &str = ".spotify_cache";

/// Snapshot of the last fetched track, written by `fetch` and read back as
/// the static-mode fallback of the web server.
pub const SNAPSHOT_FILE: &str = "last_song.json";

/// Default target of the `export` command, suitable for static hosting.
pub const EXPORT_FILE: &str = "docs/last_song.json";

/// Loads environment variables from a `.env` file in the working directory.
///
/// A missing `.env` file is not an error: all configuration can also come
/// from the process environment directly.
///
/// # Example
///
/// ```
/// use lastsong::config;
///
/// config::load_env();
/// ```
pub fn load_env() {
    dotenv::dotenv().ok();
}

/// Returns the Spotify API client ID for authentication.
///
/// Retrieves the `SPOTIFY_CLIENT_ID` environment variable which contains
/// the client ID obtained when registering the application with Spotify's
/// developer platform.
///
/// # Panics
///
/// Panics if the `SPOTIFY_CLIENT_ID` environment variable is not set.
pub fn client_id() -> String {
    env::var("SPOTIFY_CLIENT_ID").expect("SPOTIFY_CLIENT_ID must be set")
}

/// Returns the Spotify API client secret for authentication.
///
/// Retrieves the `SPOTIFY_CLIENT_SECRET` environment variable. The secret
/// is used for the HTTP Basic authentication of all token endpoint calls
/// (code exchange, refresh and client credentials).
///
/// # Panics
///
/// Panics if the `SPOTIFY_CLIENT_SECRET` environment variable is not set.
///
/// # Security Note
///
/// The client secret should be kept confidential and never exposed in logs
/// or version control.
pub fn client_secret() -> String {
    env::var("SPOTIFY_CLIENT_SECRET").expect("SPOTIFY_CLIENT_SECRET must be set")
}

/// Returns the Spotify OAuth redirect URI.
///
/// Retrieves the `SPOTIFY_REDIRECT_URI` environment variable which specifies
/// the callback URL that Spotify should redirect to after user authorization.
/// This must match the redirect URI registered in the Spotify application
/// settings and point at the local callback server started by `auth`.
///
/// # Panics
///
/// Panics if the `SPOTIFY_REDIRECT_URI` environment variable is not set.
pub fn redirect_uri() -> String {
    env::var("SPOTIFY_REDIRECT_URI").expect("SPOTIFY_REDIRECT_URI must be set")
}

/// Returns the bind address for the local HTTP servers.
///
/// Used both by the long-running web server and by the temporary OAuth
/// callback server. Defaults to `127.0.0.1:5000` when `SERVER_ADDRESS`
/// is not set.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1:5000".to_string())
}

/// Returns the polling interval of the background updater in seconds.
///
/// Read from `UPDATE_INTERVAL_SECONDS`; defaults to 30 seconds. The
/// `serve --interval` flag takes precedence over this value.
pub fn update_interval() -> u64 {
    env::var("UPDATE_INTERVAL_SECONDS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(30)
}
