use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One entry of the desired list, parsed from an `Artist - Title` line.
///
/// `position` is the zero-based index in the desired list, assigned once at
/// load time over the valid lines and never renumbered afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongSpec {
    pub position: usize,
    pub artist: String,
    pub raw_title: String,
    pub original_line: String,
}

impl fmt::Display for SongSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artist, self.raw_title)
    }
}

/// A track as held by the remote playlist in one snapshot.
///
/// `position` is only valid for the snapshot it was read in; every mutating
/// call invalidates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTrack {
    pub id: String,
    pub name: String,
    pub artist_name: String,
    pub position: usize,
}

impl fmt::Display for RemoteTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artist_name, self.name)
    }
}

/// A single reposition within one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveAction {
    pub id: String,
    pub name: String,
    pub from_pos: usize,
    pub to_pos: usize,
}

/// The divergence between a desired list and one playlist snapshot.
///
/// Snapshot-relative plan: the three sets are mutually exclusive and together
/// describe every difference under normalized-key identity. An `ActionSet` is
/// recomputed from a fresh snapshot whenever remote state changes, never
/// patched in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSet {
    pub remove: Vec<RemoteTrack>,
    pub add: Vec<SongSpec>,
    pub moves: Vec<MoveAction>,
}

impl ActionSet {
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.add.is_empty() && self.moves.is_empty()
    }
}

/// A search result candidate returned by the remote search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackCandidate {
    pub id: String,
    pub title: String,
    pub artist: String,
}

/// One positional divergence found by the verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub position: usize,
    pub expected: String,
    pub actual: String,
}

/// Outcome of a full position-by-position verification.
///
/// A length mismatch fails fast: `length` carries `(expected, actual)` and no
/// per-position comparison is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    pub passed: bool,
    pub length: Option<(usize, usize)>,
    pub mismatches: Vec<Mismatch>,
}

/// Summary of one sequencer run.
#[derive(Debug, Clone, Default)]
pub struct SyncOutcome {
    /// Tracks confirmed or moved into place during the placement pass.
    pub placed: usize,
    /// Tracks appended and positioned during the insertion pass.
    pub inserted: usize,
    /// Extra tracks removed during cleanup.
    pub removed: usize,
    /// Actions dropped after exhausting retries.
    pub skipped: usize,
    /// Desired songs the search ladder could not resolve.
    pub not_found: Vec<SongSpec>,
}

#[derive(Tabled)]
pub struct ActionTableRow {
    pub action: String,
    pub track: String,
    pub from: String,
    pub to: String,
}

#[derive(Tabled)]
pub struct ReportTableRow {
    pub position: usize,
    pub expected: String,
    pub actual: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl Token {
    /// Decodes a token-endpoint response body, stamping the obtained-at time.
    ///
    /// Refresh responses may omit the refresh token; `fallback_refresh` keeps
    /// the previous one alive in that case so later refreshes still work.
    pub fn from_response(json: &serde_json::Value, fallback_refresh: Option<&str>) -> Self {
        Token {
            access_token: json["access_token"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
            refresh_token: json["refresh_token"]
                .as_str()
                .or(fallback_refresh)
                .unwrap_or_default()
                .to_string(),
            scope: json["scope"].as_str().unwrap_or_default().to_string(),
            expires_in: json["expires_in"].as_i64().unwrap_or(3600) as u64,
            obtained_at: chrono::Utc::now().timestamp() as u64,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

// Spotify Web API wire types.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksResponse {
    pub items: Vec<PlaylistItem>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<PlaylistItemTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItemTrack {
    pub id: Option<String>,
    pub name: String,
    pub artists: Vec<TrackArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: SearchTracks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTracks {
    pub items: Vec<SearchTrackItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTrackItem {
    pub id: String,
    pub name: String,
    pub artists: Vec<TrackArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveTracksRequest {
    pub tracks: Vec<RemoveTrackUri>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveTrackUri {
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub range_start: usize,
    pub range_length: usize,
    pub insert_before: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserPlaylistsResponse {
    pub items: Vec<Playlist>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}
