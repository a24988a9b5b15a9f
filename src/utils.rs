use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use once_cell::sync::Lazy;
use rand::{Rng, distr::Alphanumeric};
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::types::{FailedTableRow, TransferReport};

pub const DEFAULT_PLAYLIST_NAME: &str = "Converted from YouTube";
pub const PLAYLIST_NAME_SUFFIX: &str = " (from YouTube)";
const MAX_NAME_CHARS: usize = 100;

static NAME_DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Destination playlist name derived from the source playlist title.
///
/// Punctuation is dropped, whitespace collapsed, and titles over 100
/// characters are cut to 97 plus "...".
pub fn playlist_name(source_title: Option<&str>) -> String {
    let Some(title) = source_title else {
        return DEFAULT_PLAYLIST_NAME.to_string();
    };

    let cleaned = NAME_DISALLOWED.replace_all(title, "");
    let cleaned = WHITESPACE.replace_all(&cleaned, " ").trim().to_string();
    if cleaned.is_empty() {
        return DEFAULT_PLAYLIST_NAME.to_string();
    }

    let cleaned = if cleaned.chars().count() > MAX_NAME_CHARS {
        let cut: String = cleaned.chars().take(MAX_NAME_CHARS - 3).collect();
        format!("{}...", cut)
    } else {
        cleaned
    };

    format!("{}{}", cleaned, PLAYLIST_NAME_SUFFIX)
}

pub fn playlist_description(source_title: &str) -> String {
    format!("Converted from YouTube playlist: {}", source_title)
}

/// Success rate as a percentage with one decimal, e.g. `"66.7%"`.
pub fn format_success_rate(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Numbered rows for the failed titles table, 1-based.
pub fn failed_rows(report: &TransferReport) -> Vec<FailedTableRow> {
    report
        .failed_titles
        .iter()
        .enumerate()
        .map(|(i, title)| FailedTableRow {
            position: i + 1,
            title: title.clone(),
        })
        .collect()
}
