//! Title cleaning and artist canonicalization.
//!
//! Matching between the desired list and the remote playlist runs entirely on
//! normalized keys: a remastered edition, a live tag or a `feat.` credit must
//! not stop a song from being recognized as the one the list asked for. Both
//! sides of the comparison are keyed through the same [`Normalizer::make_key`]
//! so the two code paths can never normalize divergently.

use std::sync::LazyLock;

use regex::Regex;

static TITLE_NOISE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\(ver\.?\s*\d+\)",
        r"\([^)]*version[^)]*\)",
        r"\(live\)",
        r"\(feat\.?[^)]*\)",
        r"\(remaster(ed)?(\s*\d+)?\)",
        r"\([^)]*mix[^)]*\)",
        r"\([^)]*edit[^)]*\)",
        r"\s*-\s*remaster(ed)?(\s*\d+)?\s*$",
        r"\s*-\s*single version\s*$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static title pattern"))
    .collect()
});

/// Strips version, live, remaster, feat, mix and edit annotations from a
/// title and lowercases it.
///
/// The noise patterns are applied as repeated substitution passes until the
/// string stops changing, so nested or stacked annotations collapse too.
/// Total function: any input yields a (possibly empty) cleaned string.
pub fn clean_title(title: &str) -> String {
    let mut cleaned = title.to_lowercase();
    loop {
        let before = cleaned.clone();
        for pattern in TITLE_NOISE.iter() {
            cleaned = pattern.replace_all(&cleaned, "").into_owned();
        }
        if cleaned == before {
            break;
        }
    }
    cleaned.trim().to_string()
}

/// Builds normalized identity keys for songs and remote tracks.
///
/// Holds the artist alias table from [`crate::config::SyncConfig`]; there is
/// no other state and no I/O, keys are pure functions of the input text.
#[derive(Debug, Clone)]
pub struct Normalizer {
    aliases: Vec<(String, Vec<String>)>,
}

impl Normalizer {
    pub fn new(aliases: Vec<(String, Vec<String>)>) -> Self {
        Normalizer { aliases }
    }

    /// Canonicalizes an artist name.
    ///
    /// Lowercases and trims, then consults the alias table for an exact
    /// canonical or variant match. Without a match the name is reduced to a
    /// best-effort canonical form: punctuation becomes whitespace and runs of
    /// whitespace collapse. Never fails; a miss only reduces matching power.
    pub fn normalize_artist(&self, name: &str) -> String {
        let lowered = name.trim().to_lowercase();

        for (canonical, variants) in &self.aliases {
            if lowered == *canonical || variants.iter().any(|v| *v == lowered) {
                return canonical.clone();
            }
        }

        let stripped: String = lowered
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();
        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// The identity key a song or track is matched under.
    ///
    /// Two entries with the same key are indistinguishable to the engine;
    /// when desired-list entries collide, the later one wins during map
    /// construction. That is a documented limitation of key-based identity,
    /// not something the engine tries to detect.
    pub fn make_key(&self, artist: &str, title: &str) -> String {
        format!("{}-{}", self.normalize_artist(artist), clean_title(title))
    }
}
