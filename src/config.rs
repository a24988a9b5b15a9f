//! Configuration management for yt2spot.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Process environment always wins over the
//! file. Required values return [`ConfigError::Missing`] instead of panicking
//! so that commands which don't need them (like `inspect`) keep working.

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::{error::ConfigError, http::RetryPolicy};

const DEFAULT_YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";
const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_SPOTIFY_SCOPE: &str =
    "playlist-modify-public playlist-modify-private playlist-read-private";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";

/// Returns the directory holding `.env`, the token cache and the template.
///
/// - Linux: `~/.local/share/yt2spot`
/// - macOS: `~/Library/Application Support/yt2spot`
/// - Windows: `%LOCALAPPDATA%/yt2spot`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("yt2spot");
    path
}

/// Loads `.env` from the data directory if it exists.
///
/// The directory is created on first run so users know where to put the
/// file. A missing `.env` is not an error; a malformed one is.
pub async fn load_env() -> Result<(), String> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(|e| e.to_string())?;

    let path = dir.join(".env");
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn or_default(name: &'static str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parsed<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            value
                .trim()
                .parse::<T>()
                .map_err(|_| ConfigError::Invalid { name, value })
        }
        _ => Ok(default),
    }
}

pub fn youtube_api_key() -> Result<String, ConfigError> {
    required("YOUTUBE_API_KEY")
}

pub fn youtube_api_url() -> String {
    or_default("YOUTUBE_API_URL", DEFAULT_YOUTUBE_API_URL)
}

pub fn spotify_client_id() -> Result<String, ConfigError> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Optional; when unset the owner of the token is looked up via `/me`.
pub fn spotify_user() -> Option<String> {
    env::var("SPOTIFY_USER_ID")
        .ok()
        .filter(|v| !v.trim().is_empty())
}

pub fn spotify_redirect_uri() -> String {
    or_default("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI)
}

pub fn spotify_scope() -> String {
    or_default("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SPOTIFY_SCOPE)
}

pub fn spotify_apiauth_url() -> String {
    or_default("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL)
}

pub fn spotify_apiurl() -> String {
    or_default("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)
}

pub fn spotify_apitoken_url() -> String {
    or_default("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL)
}

pub fn server_addr() -> String {
    or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Per-request timeout for both API clients (`HTTP_TIMEOUT`, seconds).
pub fn http_timeout() -> Result<Duration, ConfigError> {
    parsed("HTTP_TIMEOUT", 30u64).map(Duration::from_secs)
}

/// `SSL_VERIFY=false` disables certificate verification. Only meant for
/// networks with intercepting proxies.
pub fn ssl_verify() -> Result<bool, ConfigError> {
    parsed("SSL_VERIFY", true)
}

/// Retry policy injected into the API clients.
pub fn retry_policy() -> Result<RetryPolicy, ConfigError> {
    let defaults = RetryPolicy::default();
    Ok(RetryPolicy {
        max_attempts: parsed("RETRY_MAX_ATTEMPTS", defaults.max_attempts)?.max(1),
        base_delay: Duration::from_millis(parsed(
            "RETRY_BASE_DELAY_MS",
            defaults.base_delay.as_millis() as u64,
        )?),
        max_delay: Duration::from_secs(parsed(
            "RETRY_MAX_DELAY_SECS",
            defaults.max_delay.as_secs(),
        )?),
    })
}

/// Builds the reqwest client shared by a collaborator, applying the timeout
/// and TLS settings.
pub fn http_client() -> crate::Res<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(http_timeout()?)
        .danger_accept_invalid_certs(!ssl_verify()?)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
