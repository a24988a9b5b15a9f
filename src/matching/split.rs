//! Separates a combined video title into song and artist.
//!
//! The separator patterns run against the raw title, before normalization,
//! because the promo text that normalization strips usually sits on the song
//! side. Which side is the artist is a length guess: the shorter part. That
//! guess is wrong for titles like "Song Title - Live", and stays that way.

use once_cell::sync::Lazy;
use regex::Regex;

use super::normalize::normalize;

/// Separator patterns in priority order. The first that matches wins.
pub static SEPARATORS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        // "Artist - Song", also with en/em dashes
        ("dash", Regex::new(r"(?s)^(.+?)\s+[-–—]\s+(.+)$").unwrap()),
        // "Artist : Song", "Artist: Song"
        ("colon", Regex::new(r"(?s)^(.+?)\s*:\s+(.+)$").unwrap()),
        // "Song by Artist"
        ("by", Regex::new(r"(?is)^(.+?)\s+by\s+(.+)$").unwrap()),
    ]
});

/// Splits `raw` into `(song, artist)`, both normalized.
///
/// Without a separator the whole normalized title is the song and the
/// artist is `None`. An artist side that normalizes to nothing is also
/// reported as `None`.
pub fn split(raw: &str) -> (String, Option<String>) {
    let Some((first, second)) = separate(raw) else {
        return (normalize(raw), None);
    };

    let (song, artist) = if first.chars().count() < second.chars().count() {
        (second, first)
    } else {
        (first, second)
    };

    let artist = normalize(artist);
    (normalize(song), (!artist.is_empty()).then_some(artist))
}

/// Returns the two trimmed parts captured by the first matching separator.
pub fn separate(raw: &str) -> Option<(&str, &str)> {
    SEPARATORS.iter().find_map(|(_, pattern)| {
        let caps = pattern.captures(raw)?;
        let first = caps.get(1)?.as_str().trim();
        let second = caps.get(2)?.as_str().trim();
        Some((first, second))
    })
}
