//! # Spotify Integration Module
//!
//! This module is the HTTP boundary of spsync. It implements the OAuth 2.0
//! PKCE authentication flow and the playlist primitives the sync engine is
//! built on, abstracting away requests, pagination and API quirks behind a
//! small Rust interface.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI)
//!          ↓
//! Sync Engine (diff, sequencer, verifier)
//!          ↓  PlaylistService trait
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 PKCE)
//!     └── Playlist Operations (read, append, remove, reorder, search)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! [`auth`] implements the complete PKCE flow: verifier/challenge generation,
//! a temporary local callback server, browser launch, code-for-token exchange
//! and token persistence. No client secret is stored anywhere.
//!
//! [`playlist`] implements [`crate::sync::PlaylistService`] for a concrete
//! playlist: full-pagination snapshot reads, chunked appends, batched
//! removal, range reordering and track search. It also provides playlist
//! lookup and creation by name.
//!
//! ## API Coverage
//!
//! - `GET /playlists/{id}/tracks` - ordered snapshot, paginated
//! - `POST /playlists/{id}/tracks` - append tracks (max 100 per call)
//! - `DELETE /playlists/{id}/tracks` - remove all occurrences
//! - `PUT /playlists/{id}/tracks` - move a contiguous range
//! - `GET /search` - track search for the fallback ladder
//! - `GET /me/playlists`, `POST /users/{user}/playlists` - lookup/create
//! - `POST /api/token` - token exchange and refresh
//!
//! ## Error Handling
//!
//! Methods are single-shot: they classify failures as transient (HTTP 429,
//! 5xx, network) or permanent via [`crate::error::SyncError`] and leave the
//! retrying to the centralized [`crate::retry::RetryPolicy`] the engine
//! wraps every call in.

pub mod auth;
pub mod playlist;
