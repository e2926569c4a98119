use spsync::config::SyncConfig;
use spsync::normalize::{Normalizer, clean_title};

fn normalizer() -> Normalizer {
    Normalizer::new(SyncConfig::default_aliases())
}

#[test]
fn test_clean_title_strips_remaster_parenthetical() {
    assert_eq!(
        clean_title("Bohemian Rhapsody (Remastered 2011)"),
        clean_title("Bohemian Rhapsody")
    );
    assert_eq!(clean_title("Bohemian Rhapsody"), "bohemian rhapsody");
    assert_eq!(clean_title("Song (Remaster)"), "song");
}

#[test]
fn test_clean_title_strips_live_and_feat() {
    assert_eq!(clean_title("Creep (Live)"), "creep");
    assert_eq!(clean_title("Airbag (feat. Someone)"), "airbag");
    assert_eq!(clean_title("Airbag (Feat Someone)"), "airbag");
}

#[test]
fn test_clean_title_strips_version_markers() {
    assert_eq!(clean_title("Song (Ver 2)"), "song");
    assert_eq!(clean_title("Song (Version 3)"), "song");
    assert_eq!(clean_title("Song (Acoustic Version)"), "song");
}

#[test]
fn test_clean_title_strips_mix_and_edit() {
    assert_eq!(clean_title("Song (Radio Edit)"), "song");
    assert_eq!(clean_title("Song (Extended Mix)"), "song");
}

#[test]
fn test_clean_title_strips_trailing_suffixes() {
    assert_eq!(clean_title("Song - Remastered 2009"), "song");
    assert_eq!(clean_title("Song - Remaster"), "song");
    assert_eq!(clean_title("Song - Single Version"), "song");
}

#[test]
fn test_clean_title_applies_repeated_passes() {
    // Stacked annotations collapse only through repeated substitution.
    assert_eq!(clean_title("Song (Live) - Remastered"), "song");
    assert_eq!(clean_title("Song (Radio Edit) (Live)"), "song");
}

#[test]
fn test_clean_title_leaves_plain_titles_alone() {
    assert_eq!(clean_title("Paranoid Android"), "paranoid android");
    // A dash inside the title is not a remaster suffix.
    assert_eq!(clean_title("S-Bahn"), "s-bahn");
}

#[test]
fn test_normalize_artist_alias_table() {
    let n = normalizer();
    assert_eq!(n.normalize_artist("blink 182"), "blink-182");
    assert_eq!(n.normalize_artist("blink182"), "blink-182");
    assert_eq!(n.normalize_artist("Blink-182"), "blink-182");
    assert_eq!(
        n.normalize_artist("blink 182"),
        n.normalize_artist("blink-182")
    );
}

#[test]
fn test_normalize_artist_fallback_strips_punctuation() {
    let n = normalizer();
    assert_eq!(
        n.normalize_artist("Florence + The Machine"),
        "florence the machine"
    );
    assert_eq!(n.normalize_artist("  Queen  "), "queen");
    // Unknown artists with differing punctuation still converge.
    assert_eq!(
        n.normalize_artist("Sigur Ros"),
        n.normalize_artist("Sigur-Ros")
    );
}

#[test]
fn test_make_key_matches_across_editions() {
    let n = normalizer();
    assert_eq!(
        n.make_key("Queen", "Bohemian Rhapsody"),
        n.make_key("queen", "Bohemian Rhapsody (Remastered 2011)")
    );
    assert_eq!(
        n.make_key("The Beatles", "Let It Be"),
        n.make_key("beatles", "Let It Be - Single Version")
    );
}

#[test]
fn test_make_key_distinguishes_different_songs() {
    let n = normalizer();
    assert_ne!(
        n.make_key("Queen", "Bohemian Rhapsody"),
        n.make_key("Queen", "Somebody to Love")
    );
    assert_ne!(
        n.make_key("Queen", "Bohemian Rhapsody"),
        n.make_key("ABBA", "Bohemian Rhapsody")
    );
}
