use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;

use spsync::config::SyncConfig;
use spsync::error::SyncError;
use spsync::normalize::Normalizer;
use spsync::retry::RetryPolicy;
use spsync::sync::{PlaylistService, Sequencer, search, verify};
use spsync::types::{RemoteTrack, SongSpec, TrackCandidate};

/// In-memory stand-in for the remote playlist plus its search catalog.
///
/// Mutation semantics mirror the remote service: append lands at the end,
/// remove drops every occurrence, and move-range evaluates `insert_before`
/// against the order prior to removing the range.
struct FakePlaylist {
    tracks: Mutex<Vec<TrackCandidate>>,
    catalog: Vec<TrackCandidate>,
    mutations: AtomicUsize,
    fail_moves: bool,
    fail_removes: bool,
}

fn entry(id: &str, title: &str, artist: &str) -> TrackCandidate {
    TrackCandidate {
        id: id.to_string(),
        title: title.to_string(),
        artist: artist.to_string(),
    }
}

impl FakePlaylist {
    fn new(tracks: Vec<TrackCandidate>, catalog: Vec<TrackCandidate>) -> Self {
        FakePlaylist {
            tracks: Mutex::new(tracks),
            catalog,
            mutations: AtomicUsize::new(0),
            fail_moves: false,
            fail_removes: false,
        }
    }

    fn with_failing_moves(mut self) -> Self {
        self.fail_moves = true;
        self
    }

    fn with_failing_removes(mut self) -> Self {
        self.fail_removes = true;
        self
    }

    fn order(&self) -> Vec<String> {
        self.tracks
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.id.clone())
            .collect()
    }

    fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlaylistService for FakePlaylist {
    async fn read_collection(&self) -> Result<Vec<RemoteTrack>, SyncError> {
        Ok(self
            .tracks
            .lock()
            .unwrap()
            .iter()
            .enumerate()
            .map(|(position, t)| RemoteTrack {
                id: t.id.clone(),
                name: t.title.clone(),
                artist_name: t.artist.clone(),
                position,
            })
            .collect())
    }

    async fn append(&self, ids: &[String]) -> Result<(), SyncError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        let mut tracks = self.tracks.lock().unwrap();
        for id in ids {
            let found = self
                .catalog
                .iter()
                .find(|c| &c.id == id)
                .ok_or_else(|| SyncError::Remote(format!("unknown track id {}", id)))?;
            tracks.push(found.clone());
        }
        Ok(())
    }

    async fn remove_all_occurrences(&self, ids: &[String]) -> Result<(), SyncError> {
        if self.fail_removes {
            return Err(SyncError::Remote("remove rejected".to_string()));
        }
        self.mutations.fetch_add(1, Ordering::SeqCst);
        let mut tracks = self.tracks.lock().unwrap();
        tracks.retain(|t| !ids.contains(&t.id));
        Ok(())
    }

    async fn move_range(
        &self,
        from_index: usize,
        count: usize,
        insert_before: usize,
    ) -> Result<(), SyncError> {
        if self.fail_moves {
            return Err(SyncError::Remote("reorder rejected".to_string()));
        }
        self.mutations.fetch_add(1, Ordering::SeqCst);
        let mut tracks = self.tracks.lock().unwrap();
        if from_index + count > tracks.len() || insert_before > tracks.len() {
            return Err(SyncError::Remote("move out of range".to_string()));
        }

        let moved: Vec<TrackCandidate> = tracks.drain(from_index..from_index + count).collect();
        let insert_at = if insert_before > from_index {
            insert_before - count
        } else {
            insert_before
        };
        for (offset, track) in moved.into_iter().enumerate() {
            tracks.insert(insert_at + offset, track);
        }
        Ok(())
    }

    async fn search_track(&self, query: &str) -> Result<Vec<TrackCandidate>, SyncError> {
        let query = query.to_lowercase();
        Ok(self
            .catalog
            .iter()
            .filter(|c| {
                let core = c.title.split('(').next().unwrap_or("").trim().to_lowercase();
                !core.is_empty() && query.contains(&core)
            })
            .cloned()
            .collect())
    }
}

fn song(position: usize, artist: &str, title: &str) -> SongSpec {
    SongSpec {
        position,
        artist: artist.to_string(),
        raw_title: title.to_string(),
        original_line: format!("{} - {}", artist, title),
    }
}

fn test_config() -> SyncConfig {
    SyncConfig {
        settle_delay: Duration::ZERO,
        retry_delay: Duration::ZERO,
        ..SyncConfig::default()
    }
}

fn normalizer() -> Normalizer {
    Normalizer::new(SyncConfig::default_aliases())
}

#[tokio::test]
async fn test_end_to_end_insert_place_cleanup() {
    // Desired: Beatles then Queen. Remote: a remastered Queen and an ABBA
    // extra. Expect the Beatles track inserted at 0, Queen kept, ABBA gone.
    let fake = FakePlaylist::new(
        vec![
            entry("q1", "Bohemian Rhapsody (Remastered 2011)", "Queen"),
            entry("a1", "Dancing Queen", "ABBA"),
        ],
        vec![entry("b1", "Let It Be", "The Beatles")],
    );
    let config = test_config();
    let n = normalizer();
    let desired = vec![
        song(0, "The Beatles", "Let It Be"),
        song(1, "Queen", "Bohemian Rhapsody"),
    ];

    let outcome = Sequencer::new(&fake, &n, &config).run(&desired).await.unwrap();

    assert_eq!(fake.order(), vec!["b1", "q1"]);
    assert_eq!(outcome.placed, 1);
    assert_eq!(outcome.inserted, 1);
    assert_eq!(outcome.removed, 1);
    assert_eq!(outcome.skipped, 0);
    assert!(outcome.not_found.is_empty());
}

#[tokio::test]
async fn test_reorder_only() {
    let fake = FakePlaylist::new(
        vec![
            entry("c", "Gamma", "Z"),
            entry("a", "Alpha", "X"),
            entry("b", "Beta", "Y"),
        ],
        Vec::new(),
    );
    let config = test_config();
    let n = normalizer();
    let desired = vec![
        song(0, "X", "Alpha"),
        song(1, "Y", "Beta"),
        song(2, "Z", "Gamma"),
    ];

    let outcome = Sequencer::new(&fake, &n, &config).run(&desired).await.unwrap();

    assert_eq!(fake.order(), vec!["a", "b", "c"]);
    assert_eq!(outcome.placed, 3);
    assert_eq!(outcome.inserted, 0);
    assert_eq!(outcome.removed, 0);
}

#[tokio::test]
async fn test_converged_rerun_is_mutation_free() {
    let fake = FakePlaylist::new(
        vec![
            entry("q1", "Bohemian Rhapsody", "Queen"),
            entry("a1", "Dancing Queen", "ABBA"),
        ],
        vec![entry("b1", "Let It Be", "The Beatles")],
    );
    let config = test_config();
    let n = normalizer();
    let desired = vec![
        song(0, "The Beatles", "Let It Be"),
        song(1, "Queen", "Bohemian Rhapsody"),
        song(2, "ABBA", "Dancing Queen"),
    ];

    let sequencer = Sequencer::new(&fake, &n, &config);
    sequencer.run(&desired).await.unwrap();
    let converged = fake.order();
    let mutations_after_first = fake.mutation_count();

    let outcome = sequencer.run(&desired).await.unwrap();

    // Second run reads, recognizes every prefix position and mutates nothing.
    assert_eq!(fake.order(), converged);
    assert_eq!(fake.mutation_count(), mutations_after_first);
    assert_eq!(outcome.placed, desired.len());
    assert_eq!(outcome.inserted, 0);
    assert_eq!(outcome.removed, 0);
}

#[tokio::test]
async fn test_unresolvable_song_is_reported_not_placed() {
    let fake = FakePlaylist::new(
        vec![entry("q1", "Bohemian Rhapsody", "Queen")],
        Vec::new(), // empty catalog: search finds nothing
    );
    let config = test_config();
    let n = normalizer();
    let desired = vec![
        song(0, "Nobody", "No Such Song"),
        song(1, "Queen", "Bohemian Rhapsody"),
    ];

    let outcome = Sequencer::new(&fake, &n, &config).run(&desired).await.unwrap();

    // The missing slot is not consumed: Queen holds the playlist prefix.
    assert_eq!(fake.order(), vec!["q1"]);
    assert_eq!(outcome.placed, 1);
    assert_eq!(outcome.not_found.len(), 1);
    assert_eq!(outcome.not_found[0].artist, "Nobody");
}

#[tokio::test]
async fn test_cleanup_removes_all_extras() {
    let fake = FakePlaylist::new(
        vec![
            entry("x", "Noise", "Unwanted"),
            entry("a", "Alpha", "X"),
            entry("y", "More Noise", "Unwanted"),
        ],
        Vec::new(),
    );
    let config = test_config();
    let n = normalizer();
    let desired = vec![song(0, "X", "Alpha")];

    let outcome = Sequencer::new(&fake, &n, &config).run(&desired).await.unwrap();

    assert_eq!(fake.order(), vec!["a"]);
    assert_eq!(outcome.removed, 2);
}

#[tokio::test]
async fn test_failed_move_is_skipped_and_does_not_consume_slot() {
    // Every reorder is rejected by the service. The failed placement must be
    // counted as skipped without advancing the cursor, so the next desired
    // song that is already in place still lands in slot 0.
    let fake = FakePlaylist::new(
        vec![entry("b", "Beta", "Y"), entry("a", "Alpha", "X")],
        Vec::new(),
    )
    .with_failing_moves();
    let config = test_config();
    let n = normalizer();
    let desired = vec![song(0, "X", "Alpha"), song(1, "Y", "Beta")];

    let outcome = Sequencer::new(&fake, &n, &config).run(&desired).await.unwrap();

    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.placed, 1);
    // Beta occupied the slot Alpha failed to take; Alpha then sits past the
    // placed prefix and is cleaned up as an extra.
    assert_eq!(outcome.removed, 1);
    assert_eq!(fake.order(), vec!["b"]);
}

#[tokio::test]
async fn test_failed_remove_leaves_extras_and_counts_skipped() {
    let fake = FakePlaylist::new(
        vec![entry("a", "Alpha", "X"), entry("x", "Noise", "Unwanted")],
        Vec::new(),
    )
    .with_failing_removes();
    let config = test_config();
    let n = normalizer();
    let desired = vec![song(0, "X", "Alpha")];

    let outcome = Sequencer::new(&fake, &n, &config).run(&desired).await.unwrap();

    // The run still completes; the extra stays in place and is reported.
    assert_eq!(outcome.placed, 1);
    assert_eq!(outcome.removed, 0);
    assert_eq!(outcome.skipped, 1);
    assert_eq!(fake.order(), vec!["a", "x"]);
}

#[tokio::test]
async fn test_search_ladder_prefers_exact_normalized_match() {
    let fake = FakePlaylist::new(
        Vec::new(),
        vec![
            entry("t1", "Bohemian Rhapsody (Live)", "Tribute Band"),
            entry("t2", "Bohemian Rhapsody", "Queen"),
        ],
    );
    let n = normalizer();
    let retry = RetryPolicy::new(0, Duration::ZERO);

    let candidate = search::resolve_track(&fake, &retry, &n, "Queen", "Bohemian Rhapsody").await;

    assert_eq!(candidate.unwrap().id, "t2");
}

#[tokio::test]
async fn test_search_ladder_falls_back_to_top_candidate() {
    let fake = FakePlaylist::new(
        Vec::new(),
        vec![entry("t1", "Bohemian Rhapsody (Live)", "Tribute Band")],
    );
    let n = normalizer();
    let retry = RetryPolicy::new(0, Duration::ZERO);

    let candidate = search::resolve_track(&fake, &retry, &n, "Queen", "Bohemian Rhapsody").await;

    // No exact match anywhere: best effort takes the service's top result.
    assert_eq!(candidate.unwrap().id, "t1");
}

#[tokio::test]
async fn test_verify_passes_on_matching_state() {
    let fake = FakePlaylist::new(
        vec![
            entry("b1", "Let It Be", "The Beatles"),
            entry("q1", "Bohemian Rhapsody (Remastered 2011)", "Queen"),
        ],
        Vec::new(),
    );
    let n = normalizer();
    let desired = vec![
        song(0, "The Beatles", "Let It Be"),
        song(1, "Queen", "Bohemian Rhapsody"),
    ];

    let report = verify(&fake, &n, &desired).await.unwrap();

    assert!(report.passed);
    assert!(report.length.is_none());
    assert!(report.mismatches.is_empty());
}

#[tokio::test]
async fn test_verify_fails_fast_on_length_mismatch() {
    let fake = FakePlaylist::new(vec![entry("q1", "Bohemian Rhapsody", "Queen")], Vec::new());
    let n = normalizer();
    let desired = vec![
        song(0, "The Beatles", "Let It Be"),
        song(1, "Queen", "Bohemian Rhapsody"),
    ];

    let report = verify(&fake, &n, &desired).await.unwrap();

    assert!(!report.passed);
    assert_eq!(report.length, Some((2, 1)));
    // No positional comparison is attempted on a length mismatch.
    assert!(report.mismatches.is_empty());
}

#[tokio::test]
async fn test_verify_collects_positional_mismatches() {
    let fake = FakePlaylist::new(
        vec![
            entry("q1", "Bohemian Rhapsody", "Queen"),
            entry("b1", "Let It Be", "The Beatles"),
        ],
        Vec::new(),
    );
    let n = normalizer();
    let desired = vec![
        song(0, "The Beatles", "Let It Be"),
        song(1, "Queen", "Bohemian Rhapsody"),
    ];

    let report = verify(&fake, &n, &desired).await.unwrap();

    assert!(!report.passed);
    assert_eq!(report.mismatches.len(), 2);
    assert_eq!(report.mismatches[0].position, 0);
    assert_eq!(report.mismatches[1].position, 1);
}

#[tokio::test]
async fn test_sequencer_then_verify_round() {
    let fake = FakePlaylist::new(
        vec![
            entry("a1", "Dancing Queen", "ABBA"),
            entry("q1", "Bohemian Rhapsody (Remastered 2011)", "Queen"),
        ],
        vec![entry("b1", "Let It Be", "The Beatles")],
    );
    let config = test_config();
    let n = normalizer();
    let desired = vec![
        song(0, "The Beatles", "Let It Be"),
        song(1, "Queen", "Bohemian Rhapsody"),
    ];

    Sequencer::new(&fake, &n, &config).run(&desired).await.unwrap();
    let report = verify(&fake, &n, &desired).await.unwrap();

    assert!(report.passed, "mismatches: {:?}", report.mismatches);
}
