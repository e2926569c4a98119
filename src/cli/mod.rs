//! # CLI Module
//!
//! This module provides the command-line interface layer for spsync. It
//! implements the user-facing commands and coordinates between the song-list
//! loader, the Spotify client and the sync engine.
//!
//! ## Commands
//!
//! - [`auth`] - Initiates the Spotify OAuth authentication flow with PKCE
//! - [`sync`] - Reconciles a playlist against a song list and applies the
//!   resulting actions; supports dry-run, post-sync verification and a
//!   written report
//! - [`diff`] - Computes and prints the action plan without mutating anything
//! - [`verify`] - Read-only position-by-position comparison of a playlist
//!   against a song list
//!
//! ## Data Flow
//!
//! ```text
//! song list file ──> songlist parser ──> Normalizer/keys
//!                                             │
//! playlist snapshot <── PlaylistClient <──────┤
//!                                             ▼
//!                          diff ──> Sequencer ──> Verifier ──> report
//! ```
//!
//! ## Error Handling Philosophy
//!
//! Partial failures never abort a whole run: invalid song lines are skipped
//! with a warning, unresolvable songs land in the not-found report, and a
//! single failed mutation is retried then skipped. Only an unreadable
//! playlist (or missing authentication) terminates the command.

mod auth;
mod diff;
mod sync;
mod verify;

pub use auth::auth;
pub use diff::diff;
pub use sync::sync;
pub use verify::verify;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::SyncConfig,
    error,
    retry::RetryPolicy,
    spotify::playlist::PlaylistClient,
    sync::PlaylistService,
    types::{ActionSet, ActionTableRow, RemoteTrack},
};

/// Reads a full snapshot with a spinner and the configured retry policy.
/// An unreadable playlist is fatal for every command.
pub(crate) async fn read_snapshot(client: &PlaylistClient, config: &SyncConfig) -> Vec<RemoteTrack> {
    let pb = ProgressBar::new_spinner();
    pb.set_message("Reading playlist snapshot...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let result = RetryPolicy::from_config(config)
        .run(|| client.read_collection())
        .await;
    pb.finish_and_clear();

    match result {
        Ok(snapshot) => snapshot,
        Err(e) => error!("Cannot read playlist: {}", e),
    }
}

pub(crate) fn action_rows(actions: &ActionSet) -> Vec<ActionTableRow> {
    let mut rows = Vec::new();

    for track in &actions.remove {
        rows.push(ActionTableRow {
            action: "remove".to_string(),
            track: track.to_string(),
            from: track.position.to_string(),
            to: "-".to_string(),
        });
    }
    for song in &actions.add {
        rows.push(ActionTableRow {
            action: "add".to_string(),
            track: song.to_string(),
            from: "-".to_string(),
            to: song.position.to_string(),
        });
    }
    for mv in &actions.moves {
        rows.push(ActionTableRow {
            action: "move".to_string(),
            track: mv.name.clone(),
            from: mv.from_pos.to_string(),
            to: mv.to_pos.to_string(),
        });
    }

    rows
}
