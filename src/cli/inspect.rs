use tabled::Table;

use crate::{
    matching::{self, normalize::applied_rules},
    types::{CandidateTrack, InspectTableRow},
};

/// Shows what the matching heuristics make of a single title, and
/// optionally how a given candidate would score against it.
pub fn inspect(title: &str, candidate_title: Option<String>, candidate_artist: Option<String>) {
    let (song, artist) = matching::split(title);
    let fired = applied_rules(title);

    let mut rows = vec![
        row("raw", title),
        row("rules", &fired.join(", ")),
        row("normalized", &matching::normalize(title)),
        row("song", &song),
        row("artist", artist.as_deref().unwrap_or("-")),
    ];

    if let Some(candidate_title) = candidate_title {
        let candidate = CandidateTrack {
            external_id: String::new(),
            title: candidate_title,
            artist: candidate_artist.unwrap_or_default(),
        };
        let breakdown = matching::score_breakdown(title, &candidate);
        rows.push(row("candidate", &format!("{} / {}", candidate.title, candidate.artist)));
        rows.push(row("jaccard", &format!("{:.3}", breakdown.jaccard)));
        rows.push(row("artist bonus", &format!("{:.1}", breakdown.artist_bonus)));
        rows.push(row("length penalty", &format!("{:.1}", breakdown.length_penalty)));
        rows.push(row("score", &format!("{:.3}", breakdown.total)));
    }

    println!("{}", Table::new(rows));
}

fn row(field: &str, value: &str) -> InspectTableRow {
    InspectTableRow {
        field: field.to_string(),
        value: value.to_string(),
    }
}
