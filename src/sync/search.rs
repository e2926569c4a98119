//! Search fallback ladder for songs the playlist does not contain.
//!
//! Queries run from most to least specific; the first rung that returns
//! candidates decides. Within those candidates an exact normalized match is
//! preferred, otherwise the service's top result is taken as best effort.
//! Transient search failures are retried per the policy; a rung that still
//! fails after retries is treated as empty and the ladder moves on.

use crate::{
    normalize::{Normalizer, clean_title},
    retry::RetryPolicy,
    sync::PlaylistService,
    types::TrackCandidate,
    warning,
};

/// Reduces a raw title to its searchable core: parenthetical suffixes and
/// anything after a literal dash are stripped.
pub fn search_title(title: &str) -> String {
    let mut core = title;
    if let Some(i) = core.find('(') {
        core = &core[..i];
    }
    if let Some(i) = core.find('-') {
        core = &core[..i];
    }
    core.trim().to_string()
}

/// The query ladder for one song, most specific first.
fn query_ladder(artist: &str, title: &str) -> Vec<String> {
    let core = search_title(title);
    vec![
        format!("\"{}\" \"{}\"", core, artist),
        format!("{} {}", core, artist),
        format!("track:\"{}\"", core),
        core,
    ]
}

/// Resolves `(artist, title)` to a concrete track candidate, or `None` when
/// every rung of the ladder comes up empty.
pub async fn resolve_track<S: PlaylistService>(
    service: &S,
    retry: &RetryPolicy,
    normalizer: &Normalizer,
    artist: &str,
    title: &str,
) -> Option<TrackCandidate> {
    let wanted_title = clean_title(title);
    let wanted_artist = normalizer.normalize_artist(artist);

    for query in query_ladder(artist, title) {
        let candidates = match retry.run(|| service.search_track(&query)).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warning!("Search failed for '{}': {}", query, e);
                continue;
            }
        };

        if candidates.is_empty() {
            continue;
        }

        let exact = candidates.iter().find(|c| {
            clean_title(&c.title) == wanted_title
                && normalizer.normalize_artist(&c.artist) == wanted_artist
        });

        // An exact normalized match beats service ranking; otherwise trust
        // the top result of the first rung that returned anything.
        return Some(exact.unwrap_or(&candidates[0]).clone());
    }

    None
}
