//! # API Module
//!
//! This module provides the HTTP endpoints served by the Lastsong web
//! server and by the temporary OAuth callback server.
//!
//! ## Endpoints
//!
//! ### Track data
//!
//! - [`last_song`] - Returns the currently cached track snapshot, falling
//!   back to a one-shot rebuild from the persisted static snapshot file
//!   when the cache is empty. Reports `{"error": ...}` instead of failing.
//! - [`status`] - Reports the operating mode (`real-time` vs `static`),
//!   token expiry, data availability and the update interval. This
//!   endpoint never errors.
//!
//! ### Authentication
//!
//! - [`callback`] - Handles the OAuth redirect from Spotify's authorization
//!   server: validates the `state` nonce and exchanges the authorization
//!   code for a token, completing the interactive flow.
//!
//! ### Monitoring
//!
//! - [`health`] - Health check returning application status and version.
//!
//! ## Architecture
//!
//! Built on the [Axum](https://docs.rs/axum) web framework. Handlers read
//! shared state via `Extension`; the track cache is only ever written by
//! the background updater task, so handlers observe complete snapshots and
//! never block on network calls in the common path.

mod callback;
mod health;
mod last_song;
mod status;

pub use callback::callback;
pub use health::health;
pub use last_song::last_song;
pub use status::status;
