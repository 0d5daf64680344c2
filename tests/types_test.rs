use lastsong::spotify::auth::{AuthError, parse_token_response};
use lastsong::types::{
    AlbumDetail, AlbumImage, ArtistRef, ExternalUrls, Token, TrackDetail, TrackSnapshot,
};
use lastsong::utils::track_id_from_url;
use serde_json::json;

// Helper function to create a test token
fn create_test_token(created_at: u64, expires_in: u64) -> Token {
    Token {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        expires_in,
        created_at,
        scope: "user-read-recently-played".to_string(),
    }
}

// Helper function to create a test track detail response
fn create_test_track(artists: Vec<&str>, images: Vec<&str>) -> TrackDetail {
    TrackDetail {
        name: "Test Song".to_string(),
        duration_ms: 213_000,
        popularity: 64,
        preview_url: None,
        external_urls: ExternalUrls {
            spotify: "https://open.spotify.com/track/3n3Ppam7vgaVa1iaRUc9Lp".to_string(),
        },
        artists: artists
            .into_iter()
            .enumerate()
            .map(|(i, name)| ArtistRef {
                id: format!("artist{}", i),
                name: name.to_string(),
            })
            .collect(),
        album: AlbumDetail {
            name: "Test Album".to_string(),
            release_date: "2021-06-04".to_string(),
            images: images
                .into_iter()
                .map(|url| AlbumImage {
                    url: url.to_string(),
                })
                .collect(),
        },
    }
}

#[test]
fn test_token_validity() {
    let token = create_test_token(1_000, 3_600);

    // Valid strictly before the expiry instant
    assert!(token.is_valid(1_000));
    assert!(token.is_valid(4_599));

    // Invalid at and after the expiry instant
    assert!(!token.is_valid(4_600));
    assert!(!token.is_valid(10_000));

    assert_eq!(token.expires_at(), 4_600);
}

#[test]
fn test_parse_token_response_full() {
    let json = json!({
        "access_token": "new-access",
        "refresh_token": "new-refresh",
        "scope": "user-read-recently-played",
        "expires_in": 3600,
        "token_type": "Bearer"
    });

    let token = parse_token_response(&json, None, 5_000).unwrap();
    assert_eq!(token.access_token, "new-access");
    assert_eq!(token.refresh_token, "new-refresh");
    assert_eq!(token.expires_in, 3_600);
    assert_eq!(token.created_at, 5_000);
}

#[test]
fn test_parse_token_response_keeps_old_refresh_token() {
    let old = create_test_token(1_000, 3_600);

    // Provider omitted the refresh token: carry the old one forward
    let json = json!({
        "access_token": "new-access",
        "expires_in": 3600
    });
    let token = parse_token_response(&json, Some(&old), 5_000).unwrap();
    assert_eq!(token.refresh_token, "refresh");
    assert_eq!(token.scope, "user-read-recently-played");

    // Provider rotated the refresh token: replace it
    let json = json!({
        "access_token": "new-access",
        "refresh_token": "rotated",
        "expires_in": 3600
    });
    let token = parse_token_response(&json, Some(&old), 5_000).unwrap();
    assert_eq!(token.refresh_token, "rotated");
}

#[test]
fn test_parse_token_response_missing_access_token() {
    let json = json!({ "error": "invalid_grant" });
    let result = parse_token_response(&json, None, 5_000);
    assert!(matches!(result, Err(AuthError::Malformed(_))));
}

#[test]
fn test_parse_token_response_defaults_expiry() {
    let json = json!({
        "access_token": "a",
        "refresh_token": "r"
    });
    let token = parse_token_response(&json, None, 0).unwrap();
    assert_eq!(token.expires_in, 3_600);
}

#[test]
fn test_snapshot_joins_artists_and_handles_missing_cover() {
    let track = create_test_track(vec!["A", "B"], vec![]);
    let snapshot = TrackSnapshot::from_parts(track, vec![], "2023-10-17T12:00:00Z", "now");

    assert_eq!(snapshot.artist, "A, B");
    assert_eq!(snapshot.cover_image, None);
}

#[test]
fn test_snapshot_takes_first_cover_image() {
    let track = create_test_track(vec!["A"], vec!["https://img/640", "https://img/300"]);
    let snapshot = TrackSnapshot::from_parts(track, vec![], "2023-10-17T12:00:00Z", "now");

    // Spotify orders images highest resolution first
    assert_eq!(snapshot.cover_image.as_deref(), Some("https://img/640"));
}

#[test]
fn test_snapshot_truncates_genres() {
    let genres = vec![
        "indie".to_string(),
        "rock".to_string(),
        "shoegaze".to_string(),
        "dream pop".to_string(),
        "lo-fi".to_string(),
    ];
    let track = create_test_track(vec!["A"], vec![]);
    let snapshot = TrackSnapshot::from_parts(track, genres, "2023-10-17T12:00:00Z", "now");

    // At most three, provider order preserved
    assert_eq!(snapshot.genres, vec!["indie", "rock", "shoegaze"]);
}

#[test]
fn test_snapshot_genre_placeholder() {
    let track = create_test_track(vec!["A"], vec![]);
    let snapshot = TrackSnapshot::from_parts(track, vec![], "2023-10-17T12:00:00Z", "now");

    assert_eq!(snapshot.genres, vec!["Unknown"]);
}

#[test]
fn test_snapshot_identity() {
    let track = create_test_track(vec!["A"], vec![]);
    let a = TrackSnapshot::from_parts(track.clone(), vec![], "2023-10-17T12:00:00Z", "t1");
    let mut b = TrackSnapshot::from_parts(track, vec![], "2023-10-17T12:00:00Z", "t2");

    // Same (song_name, played_at) is the same song, other fields may differ
    b.popularity = 99;
    assert!(a.same_song(&b));

    // A different play of the same song is a new song
    b.played_at = "2023-10-17T13:00:00Z".to_string();
    assert!(!a.same_song(&b));
}

#[test]
fn test_snapshot_duration_display() {
    let track = create_test_track(vec!["A"], vec![]);
    let snapshot = TrackSnapshot::from_parts(track, vec![], "2023-10-17T12:00:00Z", "now");

    assert_eq!(snapshot.duration_display(), "3:33");
}

#[test]
fn test_snapshot_export_round_trip() {
    let track = create_test_track(vec!["A"], vec!["https://img/640"]);
    let snapshot = TrackSnapshot::from_parts(track, vec![], "2023-10-17T12:00:00Z", "now");

    // Written to the export file and reloaded by the fallback path
    let json = serde_json::to_string_pretty(&snapshot).unwrap();
    let reloaded: TrackSnapshot = serde_json::from_str(&json).unwrap();

    assert_eq!(reloaded.external_url, snapshot.external_url);
    assert_eq!(reloaded.played_at, snapshot.played_at);

    // The track id can be re-derived to fetch enhanced details again
    let id = track_id_from_url(&reloaded.external_url);
    assert_eq!(id.as_deref(), Some("3n3Ppam7vgaVa1iaRUc9Lp"));
}

#[test]
fn test_token_cache_round_trip() {
    let token = create_test_token(1_000, 3_600);

    let json = serde_json::to_string_pretty(&token).unwrap();

    // Field names of the persisted record
    assert!(json.contains("\"access_token\""));
    assert!(json.contains("\"refresh_token\""));
    assert!(json.contains("\"expires_in\""));
    assert!(json.contains("\"created_at\""));
    assert!(json.contains("\"scope\""));

    let reloaded: Token = serde_json::from_str(&json).unwrap();
    assert_eq!(reloaded.expires_at(), token.expires_at());
}
