//! # Sync Engine Module
//!
//! This module holds the reconciliation core: given the desired song list and
//! access to the remote playlist, it computes what diverges and drives the
//! remote mutation primitives until the playlist matches the list.
//!
//! ## Components
//!
//! - [`reconcile`] - Builds key-indexed maps of both sides and computes the
//!   add/remove/move [`crate::types::ActionSet`] for one snapshot.
//! - [`sequencer`] - The execution algorithm. Converts the divergence into an
//!   ordered stream of move/append/remove calls that stays correct even
//!   though every mutation invalidates all later positions.
//! - [`search`] - The fallback ladder that resolves a song the playlist does
//!   not contain to a concrete track id via the remote search endpoint.
//! - [`verify`] - Read-only position-by-position comparison of the final
//!   playlist against the desired list.
//!
//! ## The collaborator seam
//!
//! The engine never talks HTTP itself. Everything it needs from the remote
//! service is expressed as the [`PlaylistService`] trait: one paginated
//! snapshot read, three mutation primitives and a track search. The
//! production implementation is [`crate::spotify::playlist::PlaylistClient`];
//! tests drive the engine against an in-memory playlist.
//!
//! ## Execution model
//!
//! Strictly sequential, single authoritative snapshot at a time. The engine
//! re-reads the playlist before every positional decision instead of
//! simulating remote state locally, and pauses for a settling delay after
//! every mutation to absorb the service's asynchronous propagation. A run
//! that is interrupted is simply resumable: re-running re-derives everything
//! from a fresh read, and a converged playlist yields an empty action set.

use async_trait::async_trait;

use crate::{
    error::SyncError,
    types::{RemoteTrack, TrackCandidate},
};

pub mod reconcile;
pub mod search;
pub mod sequencer;
pub mod verify;

pub use reconcile::{build_actual_map, build_desired_map, diff};
pub use sequencer::Sequencer;
pub use verify::verify;

/// The remote collection as the engine sees it.
///
/// `read_collection` must follow the service's pagination to exhaustion and
/// return a fully materialized, order-preserving snapshot; a partial page is
/// never an acceptable snapshot. The three mutation primitives are the only
/// way playlist order changes - the engine never edits order locally.
#[async_trait]
pub trait PlaylistService {
    /// One complete ordered snapshot of the playlist.
    async fn read_collection(&self) -> Result<Vec<RemoteTrack>, SyncError>;

    /// Appends tracks at the end of the playlist, in the given order.
    async fn append(&self, ids: &[String]) -> Result<(), SyncError>;

    /// Removes every occurrence of each given track from the playlist.
    async fn remove_all_occurrences(&self, ids: &[String]) -> Result<(), SyncError>;

    /// Moves `count` contiguous tracks starting at `from_index` to sit before
    /// `insert_before`, with `insert_before` evaluated against the order
    /// prior to the removal of the range.
    async fn move_range(
        &self,
        from_index: usize,
        count: usize,
        insert_before: usize,
    ) -> Result<(), SyncError>;

    /// Track search; candidates in service ranking order, possibly empty.
    async fn search_track(&self, query: &str) -> Result<Vec<TrackCandidate>, SyncError>;
}
