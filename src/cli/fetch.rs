use std::path::Path;

use crate::{
    config, error, info,
    management::{self, TokenManager},
    spotify, success,
    types::TrackSnapshot,
    warning,
};

/// Fetches the last played track once, prints it and saves the snapshot.
///
/// Requires a saved credential; an expired access token is refreshed
/// transparently, but a failed refresh means the grant is gone and the
/// user has to re-run `lastsong auth`.
pub async fn fetch() {
    let mut manager = match TokenManager::load().await {
        Ok(manager) => manager,
        Err(_) => error!("No saved credentials found. Run `lastsong auth` first."),
    };

    info!("Fetching last played song...");
    let play = match management::fetch_recent_play(&mut manager).await {
        Ok(Some(play)) => play,
        Ok(None) => {
            warning!("No recently played tracks found.");
            return;
        }
        Err(e) => error!("Failed to fetch last played song: {}", e),
    };

    let app_token = match spotify::auth::client_credentials_token().await {
        Ok(token) => token,
        Err(e) => error!("Failed to get catalog token: {}", e),
    };

    let snapshot =
        match spotify::tracks::enhanced_details(&play.track_id, &play.played_at, &app_token).await
        {
            Ok(snapshot) => snapshot,
            Err(e) => error!("Failed to fetch track details: {}", e),
        };

    print_snapshot(&snapshot);

    let path = Path::new(config::SNAPSHOT_FILE);
    match management::save_snapshot_file(path, &snapshot).await {
        Ok(()) => success!("Song info saved to {}", path.display()),
        Err(e) => warning!("Could not save song info: {}", e),
    }
}

fn print_snapshot(snapshot: &TrackSnapshot) {
    info!("Song: {}", snapshot.song_name);
    info!("Artist: {}", snapshot.artist);
    info!("Album: {}", snapshot.album);
    info!("Played at: {}", snapshot.played_at);
    info!("Duration: {}", snapshot.duration_display());
    info!("Popularity: {}/100", snapshot.popularity);
    info!("Genres: {}", snapshot.genres.join(", "));
    info!("Release date: {}", snapshot.release_date);
    info!("Spotify URL: {}", snapshot.external_url);
    if let Some(preview) = &snapshot.preview_url {
        info!("Preview: {}", preview);
    }
}
