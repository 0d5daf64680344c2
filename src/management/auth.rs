use std::{fmt, path::PathBuf};

use crate::{
    config,
    spotify::auth::{self, AuthError},
    types::Token,
    utils,
};

/// Seconds before the absolute expiry at which the background refresh
/// kicks in, so a token never expires mid-request.
const REFRESH_MARGIN_SECS: u64 = 60;

#[derive(Debug)]
pub enum TokenError {
    /// The cache file is absent or malformed; both force a fresh
    /// interactive authorization.
    NotFound,
    /// The refresh exchange itself failed (e.g. revoked grant). Automated
    /// recovery is over; a human must re-run the interactive flow.
    RequiresReauth(AuthError),
    Io(std::io::Error),
    Serde(serde_json::Error),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::NotFound => write!(f, "no saved token found"),
            TokenError::RequiresReauth(e) => {
                write!(f, "token refresh failed, re-authorization required: {}", e)
            }
            TokenError::Io(e) => write!(f, "token cache I/O error: {}", e),
            TokenError::Serde(e) => write!(f, "token cache serialization error: {}", e),
        }
    }
}

impl std::error::Error for TokenError {}

/// Owns the persisted credential record and drives its lifecycle.
///
/// Loading treats a missing or malformed cache file identically as
/// [`TokenError::NotFound`]; persisting overwrites the record wholesale
/// via a temp-file rename so a concurrent reader never observes a partial
/// write.
pub struct TokenManager {
    token: Token,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager { token }
    }

    pub async fn load() -> Result<Self, TokenError> {
        let path = Self::cache_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|_| TokenError::NotFound)?;
        let token: Token = serde_json::from_str(&content).map_err(|_| TokenError::NotFound)?;
        Ok(Self { token })
    }

    pub async fn persist(&self) -> Result<(), TokenError> {
        let path = Self::cache_path();
        let tmp = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(&self.token).map_err(TokenError::Serde)?;
        async_fs::write(&tmp, json).await.map_err(TokenError::Io)?;
        async_fs::rename(&tmp, &path).await.map_err(TokenError::Io)
    }

    /// Returns an access token that is good for at least the refresh
    /// margin, refreshing and re-persisting the record first if needed.
    pub async fn valid_access_token(&mut self) -> Result<String, TokenError> {
        let now = utils::now_epoch();
        if now + REFRESH_MARGIN_SECS >= self.token.expires_at() {
            self.force_refresh().await?;
        }

        Ok(self.token.access_token.clone())
    }

    /// Refreshes unconditionally, used after the provider returned a 401
    /// for a token that still looked valid locally.
    ///
    /// When the refresh response omits a new refresh token the old one is
    /// carried forward; a failed exchange surfaces as
    /// [`TokenError::RequiresReauth`].
    pub async fn force_refresh(&mut self) -> Result<(), TokenError> {
        let refreshed = auth::refresh(&self.token)
            .await
            .map_err(TokenError::RequiresReauth)?;
        self.token = refreshed;
        self.persist().await
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    fn cache_path() -> PathBuf {
        PathBuf::from(config::TOKEN_CACHE_FILE)
    }
}
