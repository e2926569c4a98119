//! The execution algorithm: turns the divergence into an ordered stream of
//! remote mutations that converges despite index shifting.
//!
//! The only reordering primitive the service offers is "move a contiguous
//! range to before index X", and every mutation invalidates all positions at
//! or after the affected range. Applying a precomputed move list in arbitrary
//! order would therefore act on stale indices. Instead the sequencer runs a
//! two-phase, single-cursor pass:
//!
//! **Placement pass.** A cursor `sorted` starts at 0. For each desired
//! position in order, re-read the playlist, locate the wanted track by
//! normalized key and move it to `sorted` unless it is already there; then
//! advance the cursor. Songs absent from the playlist are recorded as missing
//! and do not consume a placed position. After this pass the prefix
//! `[0, sorted)` holds every desired song that existed in the playlist, in
//! desired order, each touched at most once.
//!
//! **Insertion pass.** Missing songs are resolved through the search ladder,
//! appended at the end, located in a fresh snapshot and moved up to their
//! target position. Appends always land at the current end, never inside the
//! placement window, which is why insertion must not interleave with
//! placement: interleaving would break the monotonic cursor invariant.
//!
//! **Cleanup.** Whatever sits at or beyond the count of placed plus inserted
//! tracks is not part of the desired list and is removed in one batched call.
//!
//! Every mutation is retried per the configured policy and followed by a
//! settling delay before the next read.

use std::time::Duration;

use tokio::time::sleep;

use crate::{
    config::SyncConfig,
    error::SyncError,
    normalize::Normalizer,
    retry::RetryPolicy,
    sync::{PlaylistService, search},
    types::{RemoteTrack, SongSpec, SyncOutcome},
    warning,
};

pub struct Sequencer<'a, S: PlaylistService> {
    service: &'a S,
    normalizer: &'a Normalizer,
    retry: RetryPolicy,
    settle_delay: Duration,
}

impl<'a, S: PlaylistService> Sequencer<'a, S> {
    pub fn new(service: &'a S, normalizer: &'a Normalizer, config: &SyncConfig) -> Self {
        Sequencer {
            service,
            normalizer,
            retry: RetryPolicy::from_config(config),
            settle_delay: config.settle_delay,
        }
    }

    /// Drives the playlist to match `desired`. Only an unreadable playlist is
    /// fatal; failed single mutations are logged, counted and skipped.
    pub async fn run(&self, desired: &[SongSpec]) -> Result<SyncOutcome, SyncError> {
        let mut outcome = SyncOutcome::default();
        let mut missing: Vec<&SongSpec> = Vec::new();

        // Placement pass: left-to-right cursor over the desired order.
        let mut sorted = 0usize;
        for song in desired {
            let snapshot = self.read_snapshot().await?;
            let key = self.normalizer.make_key(&song.artist, &song.raw_title);

            let found = snapshot
                .iter()
                .find(|t| self.normalizer.make_key(&t.artist_name, &t.name) == key);

            match found {
                Some(track) if track.position == sorted => {
                    outcome.placed += 1;
                    sorted += 1;
                }
                Some(track) => {
                    let from = track.position;
                    let result = self
                        .retry
                        .run(|| self.service.move_range(from, 1, sorted))
                        .await;
                    self.settle().await;

                    match result {
                        Ok(()) => {
                            outcome.placed += 1;
                            sorted += 1;
                        }
                        Err(e) => {
                            // The slot stays unconsumed; a re-run picks the
                            // track up again from a fresh snapshot.
                            warning!("Failed to place '{}', skipping: {}", song, e);
                            outcome.skipped += 1;
                        }
                    }
                }
                None => missing.push(song),
            }
        }

        // Insertion pass, in ascending target-position order.
        for song in missing {
            let candidate = search::resolve_track(
                self.service,
                &self.retry,
                self.normalizer,
                &song.artist,
                &song.raw_title,
            )
            .await;

            let Some(candidate) = candidate else {
                warning!("Could not find: {}", song);
                outcome.not_found.push(song.clone());
                continue;
            };

            let id = candidate.id.clone();
            let append_ids = vec![id.clone()];
            let appended = self.retry.run(|| self.service.append(&append_ids)).await;
            self.settle().await;
            if let Err(e) = appended {
                warning!("Failed to add '{}', skipping: {}", song, e);
                outcome.skipped += 1;
                continue;
            }

            let snapshot = self.read_snapshot().await?;
            let Some(appended_index) = snapshot.iter().rposition(|t| t.id == id) else {
                warning!("Appended track '{}' not visible yet, skipping", song);
                outcome.skipped += 1;
                continue;
            };

            // Earlier not-found slots can leave the target beyond the
            // appended index; clamping makes the move a no-op then.
            let insert_before = song.position.min(appended_index);
            let moved = self
                .retry
                .run(|| self.service.move_range(appended_index, 1, insert_before))
                .await;
            self.settle().await;

            match moved {
                Ok(()) => outcome.inserted += 1,
                Err(e) => {
                    warning!("Failed to position '{}', skipping: {}", song, e);
                    outcome.skipped += 1;
                }
            }
        }

        // Cleanup: everything past the placed prefix is not in the desired
        // list (or a stray duplicate of it) and goes in one batched call.
        let expected_len = sorted + outcome.inserted;
        let snapshot = self.read_snapshot().await?;
        if snapshot.len() > expected_len {
            let extras: Vec<String> = snapshot[expected_len..]
                .iter()
                .map(|t| t.id.clone())
                .collect();
            let count = extras.len();
            let removed = self
                .retry
                .run(|| self.service.remove_all_occurrences(&extras))
                .await;
            self.settle().await;

            match removed {
                Ok(()) => outcome.removed = count,
                Err(e) => {
                    warning!("Failed to remove {} extra tracks: {}", count, e);
                    outcome.skipped += count;
                }
            }
        }

        Ok(outcome)
    }

    /// Fresh authoritative snapshot; retried, then fatal.
    async fn read_snapshot(&self) -> Result<Vec<RemoteTrack>, SyncError> {
        self.retry
            .run(|| self.service.read_collection())
            .await
            .map_err(|e| SyncError::CollectionRead(e.to_string()))
    }

    async fn settle(&self) {
        sleep(self.settle_delay).await;
    }
}
