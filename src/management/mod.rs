mod auth;
mod track;

pub use auth::TokenError;
pub use auth::TokenManager;
pub use track::CacheState;
pub use track::fallback_snapshot;
pub use track::fetch_recent_play;
pub use track::run_poll_loop;
pub use track::save_snapshot_file;
