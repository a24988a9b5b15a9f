//! Title-to-track matching heuristics.
//!
//! Three pure functions over strings:
//!
//! - [`normalize`] strips promo noise from a video title.
//! - [`split`] guesses `(song, artist)` from a combined title.
//! - [`score`] rates a catalog candidate against a source title.
//!
//! They are cheap and explainable rather than accurate; ambiguous titles
//! will be mismatched.

pub mod normalize;
pub mod score;
pub mod split;

pub use normalize::normalize;
pub use score::{ScoreBreakdown, score, score_breakdown};
pub use split::split;

use crate::types::{NormalizedQuery, SourceItem};

/// Builds the catalog query for an item. The artist hint falls back to the
/// uploader when the title carries no artist.
pub fn query_for(item: &SourceItem) -> NormalizedQuery {
    let (search_title, artist) = split(&item.raw_title);
    let fallback = item.channel_or_uploader.trim();
    NormalizedQuery {
        search_title,
        candidate_artist: artist.or_else(|| (!fallback.is_empty()).then(|| fallback.to_string())),
    }
}
