use std::path::PathBuf;

use crate::{
    config, error, info,
    management::{self, TokenManager},
    spotify::{self, tracks::FetchError},
    success, warning,
};

/// Exports the last played track as a static JSON artifact.
///
/// Fetches a fresh snapshot and writes it to `output` (default
/// `docs/last_song.json`) for consumption by static hosting, e.g. a
/// GitHub Pages site.
pub async fn export(output: Option<PathBuf>) {
    let output = output.unwrap_or_else(|| PathBuf::from(config::EXPORT_FILE));

    let mut manager = match TokenManager::load().await {
        Ok(manager) => manager,
        Err(_) => error!("No saved credentials found. Run `lastsong auth` first."),
    };

    let access = match manager.valid_access_token().await {
        Ok(access) => access,
        Err(e) => error!("No valid access token: {}", e),
    };

    info!("Fetching last played song...");
    let play = match spotify::tracks::recently_played(&access).await {
        Ok(Some(play)) => play,
        Ok(None) => {
            warning!("No recently played tracks found.");
            return;
        }
        Err(FetchError::AuthExpired) => {
            error!("Access token rejected. Run `lastsong auth` to re-authorize.")
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

    match management::save_snapshot_file(&output, &snapshot).await {
        Ok(()) => success!("Last played song exported to {}", output.display()),
        Err(e) => error!("Failed to write {}: {}", output.display(), e),
    }
}
