use std::{path::Path, sync::Arc, time::Duration};

use tokio::sync::Mutex;

use crate::{
    Res, config, info,
    management::TokenManager,
    server::TokenStatus,
    spotify::{
        self,
        tracks::{FetchError, RecentPlay},
    },
    types::TrackSnapshot,
    utils, warning,
};

/// The single "latest track" slot shared between the background updater
/// and the request handlers.
///
/// Owned exclusively behind a mutex; readers receive clones and never
/// mutate it directly. `last_updated` tracks the most recent successful
/// fetch, not the most recent tick.
#[derive(Debug, Default)]
pub struct CacheState {
    pub snapshot: Option<TrackSnapshot>,
    pub last_updated: Option<String>,
}

impl CacheState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a fetch result into the cache.
    ///
    /// If the snapshot describes the same play as the cached one (equal
    /// `(song_name, played_at)`), only `last_updated` is bumped and the
    /// cached snapshot is kept. Otherwise the snapshot is replaced
    /// wholesale. Returns `true` when a new song was published.
    ///
    /// Failed ticks must not call this at all, which leaves both the
    /// snapshot and `last_updated` untouched (stale but available).
    pub fn publish(&mut self, snapshot: TrackSnapshot, now: &str) -> bool {
        let is_new = match &self.snapshot {
            Some(current) => !current.same_song(&snapshot),
            None => true,
        };
        if is_new {
            self.snapshot = Some(snapshot);
        }
        self.last_updated = Some(now.to_string());
        is_new
    }

    pub fn has_data(&self) -> bool {
        self.snapshot.is_some()
    }
}

/// Loads a previously persisted snapshot from a JSON file.
pub async fn load_snapshot_file(path: &Path) -> Res<TrackSnapshot> {
    let content = async_fs::read_to_string(path).await?;
    let snapshot: TrackSnapshot = serde_json::from_str(&content)?;
    Ok(snapshot)
}

/// Writes a snapshot to a JSON file, creating parent directories as needed.
pub async fn save_snapshot_file(path: &Path, snapshot: &TrackSnapshot) -> Res<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            async_fs::create_dir_all(parent).await?;
        }
    }

    let json = serde_json::to_string_pretty(snapshot)?;
    async_fs::write(path, json).await?;
    Ok(())
}

/// Rebuilds a fresh snapshot from the persisted static file.
///
/// The saved artifact only carries the external track URL; the track id is
/// re-derived from it and enhanced details are fetched with an app-only
/// token, so this works without any user credential.
pub async fn fallback_snapshot() -> Res<TrackSnapshot> {
    let saved = load_snapshot_file(Path::new(config::SNAPSHOT_FILE)).await?;
    let track_id = utils::track_id_from_url(&saved.external_url)
        .ok_or("saved snapshot has no track id in its external_url")?;

    let app_token = spotify::auth::client_credentials_token().await?;
    let snapshot = spotify::tracks::enhanced_details(&track_id, &saved.played_at, &app_token).await?;
    Ok(snapshot)
}

/// Background polling loop keeping the cache fresh.
///
/// Runs for process lifetime and owns the `TokenManager` outright, so
/// token refresh is confined to this single task and request handlers
/// never wait on its network calls. After every tick the current expiry
/// instant is copied into `token_status` for the status endpoint; that
/// lock is only held for the copy itself.
///
/// Each tick obtains a valid access token (refreshing it if expired),
/// fetches the most recent play, enhances it and publishes the result.
/// Any failure is logged and leaves the previous snapshot in place; the
/// loop itself never exits.
pub async fn run_poll_loop(
    cache: Arc<Mutex<CacheState>>,
    mut manager: TokenManager,
    token_status: Arc<Mutex<TokenStatus>>,
    interval_secs: u64,
) {
    loop {
        if let Err(e) = poll_once(&cache, &mut manager).await {
            warning!("Update failed, keeping previous track: {}", e);
        }
        token_status.lock().await.expires_at = Some(manager.token().expires_at());
        tokio::time::sleep(Duration::from_secs(interval_secs)).await;
    }
}

async fn poll_once(cache: &Arc<Mutex<CacheState>>, manager: &mut TokenManager) -> Res<()> {
    let play = fetch_recent_play(manager).await?;

    let Some(play) = play else {
        // no play history yet; keep whatever is cached
        return Ok(());
    };

    let app_token = spotify::auth::client_credentials_token().await?;
    let snapshot = spotify::tracks::enhanced_details(&play.track_id, &play.played_at, &app_token).await?;

    let mut cache = cache.lock().await;
    if cache.publish(snapshot.clone(), &utils::now_iso()) {
        info!("New song: {} by {}", snapshot.song_name, snapshot.artist);
    }
    Ok(())
}

/// Fetches the last play, recovering from a stale token exactly once.
///
/// A 401 on a token that still looked valid locally triggers one forced
/// refresh followed by a single retry; a second 401 propagates, so a
/// permanently invalid token cannot cause a refresh loop.
pub async fn fetch_recent_play(manager: &mut TokenManager) -> Res<Option<RecentPlay>> {
    let access = manager.valid_access_token().await?;
    match spotify::tracks::recently_played(&access).await {
        Ok(play) => Ok(play),
        Err(FetchError::AuthExpired) => {
            manager.force_refresh().await?;
            let access = manager.token().access_token.clone();
            Ok(spotify::tracks::recently_played(&access).await?)
        }
        Err(e) => Err(e.into()),
    }
}
