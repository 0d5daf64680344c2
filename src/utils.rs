use chrono::{SecondsFormat, Utc};
use rand::{Rng, distr::Alphanumeric};

/// Formats a millisecond duration as `minutes:seconds`.
///
/// Seconds are zero-padded to two digits, matching how players display
/// track lengths (`213_000` becomes `"3:33"`).
pub fn format_duration(duration_ms: u64) -> String {
    let total_secs = duration_ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Re-derives a Spotify track id from an `open.spotify.com` track URL.
///
/// Used by the static fallback path: a previously exported snapshot only
/// carries the external URL, from which the id is recovered to fetch fresh
/// catalog details. Returns `None` when the URL does not point at a track.
///
/// # Example
///
/// ```
/// use lastsong::utils::track_id_from_url;
///
/// let id = track_id_from_url("https://open.spotify.com/track/3n3Ppam7vgaVa1iaRUc9Lp?si=abc");
/// assert_eq!(id.as_deref(), Some("3n3Ppam7vgaVa1iaRUc9Lp"));
/// ```
pub fn track_id_from_url(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("/track/")?;
    let id: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    if id.is_empty() { None } else { Some(id) }
}

/// Generates a random nonce for the OAuth `state` parameter.
///
/// The callback handler rejects redirects whose `state` does not match the
/// value generated here, preventing injected authorization codes.
pub fn oauth_state_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Current time as an ISO-8601 UTC string with second precision.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current time as unix seconds.
pub fn now_epoch() -> u64 {
    Utc::now().timestamp() as u64
}
