use lastsong::management::CacheState;
use lastsong::types::TrackSnapshot;

// Helper function to create a test snapshot
fn create_test_snapshot(song_name: &str, played_at: &str, popularity: u32) -> TrackSnapshot {
    TrackSnapshot {
        song_name: song_name.to_string(),
        artist: "Artist".to_string(),
        album: "Album".to_string(),
        cover_image: None,
        genres: vec!["Unknown".to_string()],
        duration_ms: 200_000,
        popularity,
        release_date: "2021-06-04".to_string(),
        external_url: "https://open.spotify.com/track/3n3Ppam7vgaVa1iaRUc9Lp".to_string(),
        preview_url: None,
        played_at: played_at.to_string(),
        fetched_at: "2023-10-17T12:00:00Z".to_string(),
    }
}

#[test]
fn test_cache_starts_empty() {
    let cache = CacheState::new();
    assert!(!cache.has_data());
    assert!(cache.snapshot.is_none());
    assert!(cache.last_updated.is_none());
}

#[test]
fn test_publish_new_song_replaces_snapshot() {
    let mut cache = CacheState::new();

    let first = create_test_snapshot("Song A", "2023-10-17T12:00:00Z", 50);
    assert!(cache.publish(first, "t1"));
    assert!(cache.has_data());
    assert_eq!(cache.last_updated.as_deref(), Some("t1"));

    let second = create_test_snapshot("Song B", "2023-10-17T13:00:00Z", 50);
    assert!(cache.publish(second, "t2"));
    assert_eq!(cache.snapshot.as_ref().unwrap().song_name, "Song B");
    assert_eq!(cache.last_updated.as_deref(), Some("t2"));
}

#[test]
fn test_publish_same_song_only_bumps_timestamp() {
    let mut cache = CacheState::new();

    let first = create_test_snapshot("Song A", "2023-10-17T12:00:00Z", 50);
    cache.publish(first, "t1");

    // Same (song_name, played_at) with a different popularity score
    let repeat = create_test_snapshot("Song A", "2023-10-17T12:00:00Z", 99);
    assert!(!cache.publish(repeat, "t2"));

    // Cached snapshot is kept, only the timestamp moves
    assert_eq!(cache.snapshot.as_ref().unwrap().popularity, 50);
    assert_eq!(cache.last_updated.as_deref(), Some("t2"));
}

#[test]
fn test_failed_tick_leaves_state_untouched() {
    let mut cache = CacheState::new();

    let first = create_test_snapshot("Song A", "2023-10-17T12:00:00Z", 50);
    cache.publish(first, "t1");

    // A failed fetch produces no result, so nothing is published; the
    // previous snapshot stays available and the timestamp is not bumped.
    assert_eq!(cache.snapshot.as_ref().unwrap().song_name, "Song A");
    assert_eq!(cache.last_updated.as_deref(), Some("t1"));
}

#[test]
fn test_new_play_of_same_title_is_a_new_song() {
    let mut cache = CacheState::new();

    let first = create_test_snapshot("Song A", "2023-10-17T12:00:00Z", 50);
    cache.publish(first, "t1");

    // Listening to the track again yields a new played_at
    let replay = create_test_snapshot("Song A", "2023-10-17T14:00:00Z", 50);
    assert!(cache.publish(replay, "t2"));
    assert_eq!(
        cache.snapshot.as_ref().unwrap().played_at,
        "2023-10-17T14:00:00Z"
    );
}
