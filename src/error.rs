use thiserror::Error;

/// Error kinds surfaced by the sync engine.
///
/// Only `CollectionRead` aborts a whole run: if the remote playlist cannot be
/// read there is no authoritative snapshot to reconcile against. Everything
/// else degrades according to the calling operation's own policy — an invalid
/// song line is excluded and reported, a song the search ladder cannot resolve
/// lands in the not-found report, and a single failed mutation is logged and
/// skipped after retries are exhausted.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A desired-list line without an `Artist - Title` separator.
    #[error("invalid song line (missing '-' separator): {line}")]
    InvalidFormat { line: String },

    /// The search fallback ladder yielded no candidate.
    #[error("no track found for: {query}")]
    NotFound { query: String },

    /// A remote call failed in a way that is worth retrying (rate limit,
    /// server error, network failure).
    #[error("transient remote error: {0}")]
    TransientRemote(String),

    /// A remote call failed permanently (client error, malformed request).
    #[error("remote call failed: {0}")]
    Remote(String),

    /// The remote collection could not be read at all. Fatal for the run.
    #[error("failed to read remote playlist: {0}")]
    CollectionRead(String),
}

impl SyncError {
    /// Whether the retry policy should attempt this operation again.
    pub fn is_transient(&self) -> bool {
        matches!(self, SyncError::TransientRemote(_))
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if status.as_u16() == 429 || status.is_server_error() => {
                SyncError::TransientRemote(err.to_string())
            }
            Some(_) => SyncError::Remote(err.to_string()),
            // No status means the request never got an HTTP response
            // (connection reset, DNS failure) - worth retrying.
            None => SyncError::TransientRemote(err.to_string()),
        }
    }
}
