//! # CLI Module
//!
//! User-facing commands. Each command builds the clients it needs from
//! configuration, delegates to the library, and renders the outcome with the
//! console macros (`info!`, `success!`, `warning!`, `error!`).
//!
//! - [`auth`] - Spotify PKCE authorization through the local callback server
//! - [`transfer`] - convert a YouTube playlist into a Spotify playlist
//! - [`inspect`] - show how a title is normalized, split and scored
//! - [`status`] - report configuration and token state
//!
//! ```bash
//! yt2spot auth
//! yt2spot transfer "https://www.youtube.com/playlist?list=PL..." --dry-run
//! yt2spot inspect "Artist - Song (Official Video) [HD]"
//! ```
//!
//! Fatal problems (bad input, missing credentials, listing or write
//! failures) end the process through `error!`. Titles that could not be
//! matched are not errors; they are listed in the final report.

mod auth;
mod inspect;
mod status;
mod transfer;

pub use auth::auth;
pub use inspect::inspect;
pub use status::status;
pub use transfer::{TransferRequest, transfer};
