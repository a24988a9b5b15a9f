use yt2spot::matching::{normalize, split, split::separate};

#[test]
fn test_split_shorter_side_is_artist() {
    let (song, artist) = split("Artist Name - Song Title (Official Music Video)");
    assert_eq!(song, "Song Title");
    assert_eq!(artist.as_deref(), Some("Artist Name"));

    let (song, artist) = split("Long Song Title Here - Artist");
    assert_eq!(song, "Long Song Title Here");
    assert_eq!(artist.as_deref(), Some("Artist"));
}

#[test]
fn test_split_parts_are_normalized() {
    let raw = "Adele - Hello [Official Video] 2015";
    let (song, artist) = split(raw);
    assert_eq!(song, normalize("Hello [Official Video] 2015"));
    assert_eq!(artist, Some(normalize("Adele")));
}

#[test]
fn test_split_tie_keeps_order() {
    let (song, artist) = split("abcd - wxyz");
    assert_eq!(song, "abcd");
    assert_eq!(artist.as_deref(), Some("wxyz"));
}

#[test]
fn test_split_other_separators() {
    let (song, artist) = split("Queen: Bohemian Rhapsody");
    assert_eq!(song, "Bohemian Rhapsody");
    assert_eq!(artist.as_deref(), Some("Queen"));

    let (song, artist) = split("Bohemian Rhapsody BY Queen");
    assert_eq!(song, "Bohemian Rhapsody");
    assert_eq!(artist.as_deref(), Some("Queen"));

    let (song, artist) = split("Kraftwerk – Computer Love");
    assert_eq!(song, "Computer Love");
    assert_eq!(artist.as_deref(), Some("Kraftwerk"));
}

#[test]
fn test_split_first_matching_pattern_wins() {
    assert_eq!(separate("Intro: Part One - Band"), Some(("Intro: Part One", "Band")));
}

#[test]
fn test_split_without_separator() {
    assert_eq!(split("Just A Song"), ("Just A Song".to_string(), None));
    assert_eq!(split("Jay-Z Song"), ("Jay-Z Song".to_string(), None));
    assert_eq!(split(""), (String::new(), None));
}

#[test]
fn test_split_empty_artist_is_absent() {
    let (song, artist) = split("[MV] - Some Long Song");
    assert_eq!(song, "Some Long Song");
    assert_eq!(artist, None);
}

#[test]
fn test_split_misreads_live_suffix() {
    // neither side is an artist here; the length guess picks "Live"
    let (song, artist) = split("Song Title - Live");
    assert_eq!(song, "Song Title");
    assert_eq!(artist.as_deref(), Some("Live"));
}

#[test]
fn test_split_is_deterministic() {
    let raw = "Massive Attack - Teardrop (Official Video)";
    assert_eq!(split(raw), split(raw));
}
