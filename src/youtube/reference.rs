use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::InputError;

static LIST_PARAM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[?&]list=([A-Za-z0-9_-]+)").unwrap());

static BARE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{10,}$").unwrap());

static PLAYLIST_URL: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)(?:^|//|\.)youtube\.com/playlist\?list=").unwrap(),
        Regex::new(r"(?i)(?:^|//|\.)youtube\.com/watch\?.*list=").unwrap(),
        Regex::new(r"(?i)(?:^|//)youtu\.be/.*list=").unwrap(),
    ]
});

/// Whether `url` looks like a YouTube URL that carries a playlist.
/// Covers `www.`, `m.` and `music.` hosts.
pub fn is_playlist_url(url: &str) -> bool {
    PLAYLIST_URL.iter().any(|p| p.is_match(url))
}

/// Extracts the playlist id from a URL, or accepts a bare id.
pub fn extract_playlist_id(input: &str) -> Result<String, InputError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(InputError::Empty);
    }

    if BARE_ID.is_match(input) {
        return Ok(input.to_string());
    }

    if is_playlist_url(input) {
        if let Some(caps) = LIST_PARAM.captures(input) {
            return Ok(caps[1].to_string());
        }
    }

    Err(InputError::Unrecognized(input.to_string()))
}
