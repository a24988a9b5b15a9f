//! # API Module
//!
//! HTTP endpoints served by the short-lived local server during
//! `yt2spot auth`.
//!
//! - [`callback`] - Spotify redirects here after the user grants access. The
//!   handler exchanges the authorization code for a token using the PKCE
//!   verifier held in shared state.
//! - [`health`] - liveness probe returning the crate name and version.
//!
//! Both are plain axum handlers; [`crate::server::router`] wires them up.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
