use std::fmt;

use reqwest::StatusCode;

use crate::{
    config,
    spotify::http_client,
    types::{ArtistDetail, RecentlyPlayedResponse, TrackDetail, TrackSnapshot},
    utils,
};

/// Failure of a Spotify resource call.
///
/// `AuthExpired` maps exactly to an HTTP 401 on the user token so the
/// caller can trigger one refresh attempt and retry; everything else is
/// either a provider error (`Api`, with status and body) or a transport
/// problem (`Network`, which includes timeouts).
#[derive(Debug)]
pub enum FetchError {
    AuthExpired,
    Api { status: StatusCode, body: String },
    Network(reqwest::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::AuthExpired => write!(f, "access token expired (401)"),
            FetchError::Api { status, body } => {
                write!(f, "Spotify API error ({}): {}", status, body)
            }
            FetchError::Network(e) => write!(f, "Spotify API unreachable: {}", e),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err)
    }
}

/// The last play-history entry: the track id and when it finished playing.
#[derive(Debug, Clone)]
pub struct RecentPlay {
    pub track_id: String,
    pub played_at: String,
}

/// Fetches the user's most recently played track.
///
/// Calls the recently-played listing with `limit=1` using the user's
/// personal access token. Returns `Ok(None)` when the user has no play
/// history, which is an explicit empty state rather than an error.
///
/// A 401 is reported as [`FetchError::AuthExpired`] so the caller can
/// refresh the token exactly once and retry; this function never retries
/// by itself, avoiding refresh loops on a permanently invalid token.
pub async fn recently_played(access_token: &str) -> Result<Option<RecentPlay>, FetchError> {
    let client = http_client()?;
    let res = client
        .get(format!(
            "{}/me/player/recently-played?limit=1",
            config::SPOTIFY_API_URL
        ))
        .bearer_auth(access_token)
        .send()
        .await?;

    let status = res.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(FetchError::AuthExpired);
    }
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(FetchError::Api { status, body });
    }

    let body: RecentlyPlayedResponse = res.json().await?;
    Ok(body.items.into_iter().next().map(|item| RecentPlay {
        track_id: item.track.id,
        played_at: item.played_at,
    }))
}

/// Fetches full track metadata plus the primary artist's genres.
///
/// Uses the app-only client-credentials token, so this lookup succeeds
/// even when the user's personal token has expired: track and artist
/// metadata are public catalog data. A failed artist lookup degrades to
/// an empty genre list, which [`TrackSnapshot::from_parts`] replaces with
/// the `"Unknown"` placeholder.
pub async fn enhanced_details(
    track_id: &str,
    played_at: &str,
    app_token: &str,
) -> Result<TrackSnapshot, FetchError> {
    let client = http_client()?;
    let res = client
        .get(format!("{}/tracks/{}", config::SPOTIFY_API_URL, track_id))
        .bearer_auth(app_token)
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(FetchError::Api { status, body });
    }

    let track: TrackDetail = res.json().await?;

    let genres = match track.artists.first() {
        Some(primary) => artist_genres(&primary.id, app_token).await,
        None => Vec::new(),
    };

    Ok(TrackSnapshot::from_parts(
        track,
        genres,
        played_at,
        &utils::now_iso(),
    ))
}

async fn artist_genres(artist_id: &str, app_token: &str) -> Vec<String> {
    let Ok(client) = http_client() else {
        return Vec::new();
    };
    let res = client
        .get(format!("{}/artists/{}", config::SPOTIFY_API_URL, artist_id))
        .bearer_auth(app_token)
        .send()
        .await;

    match res {
        Ok(res) if res.status().is_success() => res
            .json::<ArtistDetail>()
            .await
            .map(|a| a.genres)
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}
