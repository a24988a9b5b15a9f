//! YouTube to Spotify playlist transfer.
//!
//! Lists the videos of a YouTube playlist, turns each noisy video title into
//! a clean track query, looks the query up in the Spotify catalog and writes
//! the matches into a new Spotify playlist in ordered batches.
//!
//! # Modules
//!
//! - `matching` - title normalization, artist/song splitting, similarity score
//! - `transfer` - the orchestrator and its collaborator traits
//! - `youtube` - playlist lister backed by the YouTube Data API
//! - `spotify` - catalog search, playlist writer and PKCE authorization
//! - `http` - retry policy shared by both API clients
//! - `management` - token cache
//! - `server`, `api` - local OAuth callback server
//! - `cli` - command implementations
//! - `config`, `error`, `types`, `utils`
//!
//! # Example
//!
//! ```
//! use yt2spot::matching;
//!
//! let (song, artist) = matching::split("Artist Name - Song Title (Official Video)");
//! assert_eq!(song, "Song Title");
//! assert_eq!(artist.as_deref(), Some("Artist Name"));
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod management;
pub mod matching;
pub mod server;
pub mod spotify;
pub mod transfer;
pub mod types;
pub mod utils;
pub mod youtube;

/// Result alias for the outer layers (clients, CLI) where several error
/// kinds meet. The transfer core uses the typed errors in [`error`].
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Console line prefixed with a blue `o`. Takes `println!` arguments.
///
/// ```ignore
/// info!("Found {} videos", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Console line prefixed with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line and exits with status 1.
///
/// Only for fatal errors at the command level; library code returns typed
/// errors instead. Evaluates to `!`, so it can end a `match` arm:
///
/// ```ignore
/// let id = match youtube::extract_playlist_id(&input) {
///     Ok(id) => id,
///     Err(e) => error!("{}", e),
/// };
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Console line prefixed with a yellow `!` for recoverable problems, such as
/// titles that found no match.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
