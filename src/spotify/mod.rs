//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API and the Spotify
//! accounts service, handling all HTTP communication, OAuth exchanges and
//! error classification for the rest of the application.
//!
//! ## Core Modules
//!
//! ### Authentication Module
//!
//! [`auth`] - Implements the OAuth 2.0 authorization-code flow with a
//! confidential client:
//! - **Complete Auth Flow**: Local callback server, browser launch, code
//!   exchange and token persistence in one operation
//! - **Token Refresh**: Exchanges refresh tokens for fresh access tokens,
//!   carrying the old refresh token forward when the provider omits one
//! - **Client Credentials**: App-only tokens for public catalog reads that
//!   must work even when the user token has expired
//! - **Basic Authentication**: All token endpoint calls authenticate with
//!   `base64(client_id:client_secret)`
//!
//! ### Track Module
//!
//! [`tracks`] - Reads the user's play history and the public catalog:
//! - **Recently Played**: The `limit=1` listing that drives the cache; a
//!   401 is surfaced distinctly so the caller can refresh exactly once
//! - **Enhanced Details**: Full track metadata plus the primary artist's
//!   genres, merged into a [`TrackSnapshot`](crate::types::TrackSnapshot)
//!
//! ## Error Types
//!
//! - [`auth::AuthError`] - Token endpoint rejections (with HTTP status and
//!   body for diagnostics), network failures and malformed responses
//! - [`tracks::FetchError`] - Resource call failures, with `AuthExpired`
//!   reserved for HTTP 401 on the user token
//!
//! ## Timeouts
//!
//! Every request runs on a client with a bounded timeout so a hung request
//! cannot stall the polling loop indefinitely; timed-out calls surface as
//! network errors and the caller retains stale data.

pub mod auth;
pub mod tracks;

use std::time::Duration;

use reqwest::Client;

/// Per-request timeout for all Spotify calls.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn http_client() -> Result<Client, reqwest::Error> {
    Client::builder().timeout(HTTP_TIMEOUT).build()
}
