//! Similarity between a source title and a catalog candidate.

use std::collections::HashSet;

use serde::Serialize;

use super::normalize::normalize;
use crate::types::CandidateTrack;

/// Added when the candidate's artist appears in the source title.
pub const ARTIST_BONUS: f64 = 0.2;

/// Subtracted when one title is less than half as long as the other.
pub const LENGTH_PENALTY: f64 = 0.1;

pub const LENGTH_RATIO_FLOOR: f64 = 0.5;

/// The parts a score is made of, for `inspect` output and tests.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScoreBreakdown {
    pub jaccard: f64,
    pub artist_bonus: f64,
    pub length_penalty: f64,
    pub total: f64,
}

/// Scores `candidate` against `source_title`, in `[0.0, 1.0]`.
pub fn score(source_title: &str, candidate: &CandidateTrack) -> f64 {
    score_breakdown(source_title, candidate).total
}

/// Token-set Jaccard similarity plus artist bonus minus length penalty,
/// clamped to `[0.0, 1.0]`. Exactly 0.0 when either title has no tokens.
pub fn score_breakdown(source_title: &str, candidate: &CandidateTrack) -> ScoreBreakdown {
    let source = normalize(source_title).to_lowercase();
    let target = candidate.title.to_lowercase();

    let source_tokens: HashSet<&str> = source.split_whitespace().collect();
    let target_tokens: HashSet<&str> = target.split_whitespace().collect();
    if source_tokens.is_empty() || target_tokens.is_empty() {
        return ScoreBreakdown::default();
    }

    let intersection = source_tokens.intersection(&target_tokens).count();
    let union = source_tokens.union(&target_tokens).count();
    let jaccard = intersection as f64 / union as f64;

    let artist = candidate.artist.to_lowercase();
    let artist_bonus = if !artist.is_empty() && source.contains(&artist) {
        ARTIST_BONUS
    } else {
        0.0
    };

    let (a, b) = (source.chars().count(), target.chars().count());
    let ratio = a.min(b) as f64 / a.max(b) as f64;
    let length_penalty = if ratio < LENGTH_RATIO_FLOOR {
        LENGTH_PENALTY
    } else {
        0.0
    };

    ScoreBreakdown {
        jaccard,
        artist_bonus,
        length_penalty,
        total: (jaccard + artist_bonus - length_penalty).clamp(0.0, 1.0),
    }
}
