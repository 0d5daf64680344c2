use serde::{Deserialize, Serialize};

/// A persisted OAuth credential record.
///
/// Serialized wholesale to the token cache file; `created_at` is the unix
/// timestamp at which the token was obtained, so `created_at + expires_in`
/// is the absolute expiry instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub created_at: u64,
    pub scope: String,
}

impl Token {
    /// Absolute expiry instant as unix seconds.
    pub fn expires_at(&self) -> u64 {
        self.created_at + self.expires_in
    }

    /// A record is valid iff the current time is strictly before its expiry.
    pub fn is_valid(&self, now: u64) -> bool {
        now < self.expires_at()
    }
}

/// Shared state of an in-flight interactive authorization.
///
/// Populated before the browser redirect and completed by the callback
/// handler once the authorization code has been exchanged.
#[derive(Debug, Clone)]
pub struct AuthAttempt {
    /// Random nonce sent as the OAuth `state` parameter and verified on
    /// the callback.
    pub state_token: String,
    pub token: Option<Token>,
}

/// Immutable point-in-time record of the most recently played track.
///
/// Field names match the JSON artifact consumed by the static page; a new
/// fetch always produces a wholly new snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSnapshot {
    pub song_name: String,
    pub artist: String,
    pub album: String,
    pub cover_image: Option<String>,
    pub genres: Vec<String>,
    pub duration_ms: u64,
    pub popularity: u32,
    pub release_date: String,
    pub external_url: String,
    pub preview_url: Option<String>,
    pub played_at: String,
    pub fetched_at: String,
}

impl TrackSnapshot {
    /// Builds a snapshot from a track detail response and the primary
    /// artist's genre list.
    ///
    /// Artist names are comma-joined, the cover image is the first entry of
    /// the album image list (Spotify orders it highest resolution first),
    /// and genres are truncated to at most three entries with a single
    /// `"Unknown"` placeholder when the provider returns none.
    pub fn from_parts(
        track: TrackDetail,
        genres: Vec<String>,
        played_at: &str,
        fetched_at: &str,
    ) -> Self {
        let artist = track
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let cover_image = track.album.images.first().map(|i| i.url.clone());
        let genres = if genres.is_empty() {
            vec!["Unknown".to_string()]
        } else {
            genres.into_iter().take(3).collect()
        };

        TrackSnapshot {
            song_name: track.name,
            artist,
            album: track.album.name,
            cover_image,
            genres,
            duration_ms: track.duration_ms,
            popularity: track.popularity,
            release_date: track.album.release_date,
            external_url: track.external_urls.spotify,
            preview_url: track.preview_url,
            played_at: played_at.to_string(),
            fetched_at: fetched_at.to_string(),
        }
    }

    /// Identity comparison for "is this a new song".
    ///
    /// Two snapshots with equal `(song_name, played_at)` describe the same
    /// play, regardless of other field differences such as an updated
    /// popularity score.
    pub fn same_song(&self, other: &TrackSnapshot) -> bool {
        self.song_name == other.song_name && self.played_at == other.played_at
    }

    /// Track duration as `minutes:seconds` with zero-padded seconds.
    pub fn duration_display(&self) -> String {
        crate::utils::format_duration(self.duration_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentlyPlayedResponse {
    pub items: Vec<PlayHistoryItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayHistoryItem {
    pub track: PlayedTrack,
    pub played_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayedTrack {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackDetail {
    pub name: String,
    pub duration_ms: u64,
    pub popularity: u32,
    pub preview_url: Option<String>,
    pub external_urls: ExternalUrls,
    pub artists: Vec<ArtistRef>,
    pub album: AlbumDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalUrls {
    pub spotify: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumDetail {
    pub name: String,
    pub release_date: String,
    pub images: Vec<AlbumImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumImage {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistDetail {
    pub genres: Vec<String>,
}
