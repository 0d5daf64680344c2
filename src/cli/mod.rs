//! # CLI Module
//!
//! This module provides the command-line interface layer for Lastsong. It
//! implements all user-facing commands and coordinates between the Spotify
//! client, token management and the web server.
//!
//! ## Command Categories
//!
//! ### Authentication
//!
//! - [`auth`] - Completes the interactive Spotify OAuth authorization-code
//!   flow and persists the resulting credential
//!
//! ### Track Operations
//!
//! - [`fetch`] - One-shot fetch of the last played track: prints a
//!   formatted summary and saves the snapshot file
//! - [`export`] - Writes the snapshot as a static JSON artifact for
//!   external hosting
//!
//! ### Serving
//!
//! - [`serve`] - Runs the long-lived web server with the background
//!   polling cache; degrades to static mode without a saved credential
//!
//! ## Error Handling Philosophy
//!
//! Commands present errors with the crate's output macros: recoverable
//! conditions warn and continue, unrecoverable ones (missing credentials,
//! failed refresh requiring re-authorization) terminate with a clear
//! message telling the user what to run next.

mod auth;
mod export;
mod fetch;
mod serve;

pub use auth::auth;
pub use export::export;
pub use fetch::fetch;
pub use serve::serve;
