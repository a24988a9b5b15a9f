//! Title normalization: turns a noisy video title into a search query.
//!
//! The cleanup is an ordered list of [`Rule`]s followed by stop-word removal.
//! One pass over the list is not always stable (dropping a stop-word can leave
//! a quality marker at the end of the title, removing a year can do the same),
//! so [`normalize`] repeats the pass until the title stops changing. Every
//! rule only deletes text or shrinks whitespace, which bounds the loop.

use once_cell::sync::Lazy;
use regex::Regex;

/// Words dropped from titles longer than [`STOP_WORD_MIN_WORDS`] words.
pub const STOP_WORDS: [&str; 14] = [
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

/// Titles with this many words or fewer keep their stop-words.
pub const STOP_WORD_MIN_WORDS: usize = 3;

/// A single named substitution of the cleanup pipeline.
#[derive(Debug)]
pub struct Rule {
    pub name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
            replacement,
        }
    }

    pub fn apply(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, self.replacement)
            .into_owned()
    }
}

/// Cleanup rules, applied in order.
pub static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        // "(Official Music Video)", "(Lyrics)", "(Audio)"
        Rule::new(
            "promo_parenthetical",
            r"(?i)\([^()]*(?:official|music\s+video|audio|lyric)[^()]*\)",
            "",
        ),
        // any "[...]"
        Rule::new("square_brackets", r"\[[^\[\]]*\]", ""),
        // "Song | Channel Name | 4K"
        Rule::new("pipe_suffix", r"(?s)\|.*$", ""),
        // trailing "HD" / "HQ"
        Rule::new("quality_marker", r"(?i)(?:^|\s)(?:hd|hq)\s*$", ""),
        Rule::new("year", r"\b\d{4}\b", ""),
        // "feat. X", "ft. X", "featuring X" through the end
        Rule::new(
            "featuring",
            r"(?is)\b(?:feat\.|ft\.|featuring\b).*$",
            "",
        ),
        Rule::new("collapse_whitespace", r"\s+", " "),
        Rule::new("trim", r"^ | $", ""),
    ]
});

/// Normalizes a raw title. Idempotent, and never longer than the input.
pub fn normalize(raw: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let next = normalize_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

/// One pass of the rule list followed by stop-word removal.
pub fn normalize_once(raw: &str) -> String {
    let cleaned = RULES
        .iter()
        .fold(raw.to_string(), |acc, rule| rule.apply(&acc));
    drop_stop_words(&cleaned)
}

/// Names of the steps that changed the title on its way through
/// [`normalize`], in the order they first did so. Stop-word removal is
/// reported as `stop_words`.
pub fn applied_rules(raw: &str) -> Vec<&'static str> {
    fn record(applied: &mut Vec<&'static str>, name: &'static str) {
        if !applied.contains(&name) {
            applied.push(name);
        }
    }

    let mut applied = Vec::new();
    let mut current = raw.to_string();
    loop {
        let start = current.clone();
        for rule in RULES.iter() {
            let next = rule.apply(&current);
            if next != current {
                record(&mut applied, rule.name);
                current = next;
            }
        }

        let next = drop_stop_words(&current);
        if next != current {
            record(&mut applied, "stop_words");
            current = next;
        }

        if current == start {
            return applied;
        }
    }
}

/// Removes stop-words when the title has more than
/// [`STOP_WORD_MIN_WORDS`] words. Expects whitespace already collapsed.
pub fn drop_stop_words(title: &str) -> String {
    let words: Vec<&str> = title.split(' ').filter(|w| !w.is_empty()).collect();
    if words.len() <= STOP_WORD_MIN_WORDS {
        return title.to_string();
    }

    words
        .into_iter()
        .filter(|w| !is_stop_word(w))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn is_stop_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    STOP_WORDS.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str) -> &'static Rule {
        RULES.iter().find(|r| r.name == name).unwrap()
    }

    #[test]
    fn promo_parenthetical_only_removes_promo_text() {
        let r = rule("promo_parenthetical");
        assert_eq!(r.apply("Song (Official Music Video)"), "Song ");
        assert_eq!(r.apply("Song (lyrics)"), "Song ");
        assert_eq!(r.apply("Song (Audio)"), "Song ");
        assert_eq!(r.apply("Song (Remix)"), "Song (Remix)");
        assert_eq!(r.apply("Song (Live) (Official Video)"), "Song (Live) ");
    }

    #[test]
    fn square_brackets_removed_regardless_of_contents() {
        let r = rule("square_brackets");
        assert_eq!(r.apply("Song [NCS Release]"), "Song ");
        assert_eq!(r.apply("[MV] Song [4K]"), " Song ");
        assert_eq!(r.apply("Song [unclosed"), "Song [unclosed");
    }

    #[test]
    fn pipe_suffix_cuts_at_first_pipe() {
        let r = rule("pipe_suffix");
        assert_eq!(r.apply("Song | Channel | 4K"), "Song ");
        assert_eq!(r.apply("No pipe"), "No pipe");
    }

    #[test]
    fn quality_marker_must_be_standalone_and_trailing() {
        let r = rule("quality_marker");
        assert_eq!(r.apply("Song HD"), "Song");
        assert_eq!(r.apply("Song hq "), "Song");
        assert_eq!(r.apply("Song SHD"), "Song SHD");
        assert_eq!(r.apply("HD Song"), "HD Song");
    }

    #[test]
    fn year_only_matches_four_digit_tokens() {
        let r = rule("year");
        assert_eq!(r.apply("Song 1999"), "Song ");
        assert_eq!(r.apply("Song 12345"), "Song 12345");
        assert_eq!(r.apply("Song 99"), "Song 99");
    }

    #[test]
    fn featuring_clause_runs_to_end() {
        let r = rule("featuring");
        assert_eq!(r.apply("Song feat. Someone (Remix)"), "Song ");
        assert_eq!(r.apply("Song ft. Someone"), "Song ");
        assert_eq!(r.apply("Song FEATURING Someone"), "Song ");
        assert_eq!(r.apply("Loft. Song"), "Loft. Song");
    }

    #[test]
    fn whitespace_rules_collapse_and_trim() {
        let collapsed = rule("collapse_whitespace").apply("  a \t b  ");
        assert_eq!(collapsed, " a b ");
        assert_eq!(rule("trim").apply(&collapsed), "a b");
    }

    #[test]
    fn stop_words_kept_for_short_titles() {
        assert_eq!(drop_stop_words("Out of Time"), "Out of Time");
        assert_eq!(drop_stop_words("The Sound of Silence Now"), "Sound Silence Now");
    }

    #[test]
    fn one_pass_can_be_unstable() {
        // removing "of" exposes a trailing "HD"
        let once = normalize_once("My Song HD of");
        assert_eq!(once, "My Song HD");
        assert_eq!(normalize("My Song HD of"), "My Song");
    }
}
