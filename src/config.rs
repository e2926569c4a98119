//! Configuration management for the Spotify Playlist Sync CLI.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files, and builds the [`SyncConfig`]
//! value the sync engine is constructed with. API endpoints and credentials
//! come from required environment variables; the engine tuning knobs have
//! defaults and are only overridden when the corresponding variable is set.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (tuning knobs and artist aliases)

use std::{env, path::PathBuf, time::Duration};

use dotenv;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `spsync/.env`. This allows users to store
/// configuration securely without hardcoding sensitive values.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/spsync/.env`
/// - macOS: `~/Library/Application Support/spsync/.env`
/// - Windows: `%LOCALAPPDATA%/spsync/.env`
///
/// # Errors
///
/// This function will return an error if:
/// - The parent directory cannot be created
/// - The `.env` file cannot be read or parsed
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spsync/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    dotenv::from_path(path).map_err(|e| e.to_string())?;
    Ok(())
}

/// Returns the server address for the local OAuth callback server.
///
/// # Panics
///
/// Panics if the `SERVER_ADDRESS` environment variable is not set.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").expect("SERVER_ADDRESS must be set")
}

/// Returns the Spotify user ID for playlist creation.
///
/// # Panics
///
/// Panics if the `SPOTIFY_USER_ID` environment variable is not set.
pub fn spotify_user() -> String {
    env::var("SPOTIFY_USER_ID").expect("SPOTIFY_USER_ID must be set")
}

/// Returns the Spotify API client ID for authentication.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_CLIENT_ID` environment variable is not set.
pub fn spotify_client_id() -> String {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID").expect("SPOTIFY_API_AUTH_CLIENT_ID must be set")
}

/// Returns the Spotify OAuth redirect URI.
///
/// This must match the redirect URI registered in the Spotify application
/// settings.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_REDIRECT_URI` environment variable is not set.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_API_REDIRECT_URI").expect("SPOTIFY_API_REDIRECT_URI must be set")
}

/// Returns the Spotify API scope permissions requested during OAuth.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_SCOPE` environment variable is not set.
pub fn spotify_scope() -> String {
    env::var("SPOTIFY_API_AUTH_SCOPE").expect("SPOTIFY_API_AUTH_SCOPE must be set")
}

/// Returns the Spotify OAuth authorization URL.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_URL` environment variable is not set.
pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_API_AUTH_URL").expect("SPOTIFY_API_AUTH_URL must be set")
}

/// Returns the Spotify Web API base URL.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_URL` environment variable is not set.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").expect("SPOTIFY_API_URL must be set")
}

/// Returns the Spotify OAuth token exchange URL.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_TOKEN_URL` environment variable is not set.
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").expect("SPOTIFY_API_TOKEN_URL must be set")
}

/// Tuning values and the artist alias table for one sync run.
///
/// Constructed once (from the environment or, in tests, literally) and passed
/// into the engine components at initialization. Nothing in the engine reads
/// ambient process state for these.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Pause after every mutating remote call, before the next read. The
    /// remote service propagates mutations asynchronously; reading too early
    /// risks acting on stale positions.
    pub settle_delay: Duration,
    /// Retry attempts for a transient remote failure, on top of the first try.
    pub max_retries: u32,
    /// Fixed delay between retry attempts.
    pub retry_delay: Duration,
    /// Maximum track ids per append call, enforced by the remote service.
    pub append_chunk_size: usize,
    /// Canonical artist name mapped to known textual variants.
    pub artist_aliases: Vec<(String, Vec<String>)>,
}

impl SyncConfig {
    /// Builds a config from `SPSYNC_*` environment variables, falling back to
    /// the defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        SyncConfig {
            settle_delay: env_millis("SPSYNC_SETTLE_MS").unwrap_or(defaults.settle_delay),
            max_retries: env::var("SPSYNC_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_retries),
            retry_delay: env_millis("SPSYNC_RETRY_DELAY_MS").unwrap_or(defaults.retry_delay),
            ..defaults
        }
    }

    /// The built-in alias table. Small on purpose: it only covers artists
    /// whose spelling commonly diverges between song lists and the catalog.
    pub fn default_aliases() -> Vec<(String, Vec<String>)> {
        vec![
            (
                "blink-182".to_string(),
                vec![
                    "blink 182".to_string(),
                    "blink182".to_string(),
                    "blink".to_string(),
                ],
            ),
            (
                "guns n' roses".to_string(),
                vec![
                    "guns n roses".to_string(),
                    "guns and roses".to_string(),
                    "gnr".to_string(),
                ],
            ),
            (
                "the beatles".to_string(),
                vec!["beatles".to_string()],
            ),
            (
                "ac/dc".to_string(),
                vec!["acdc".to_string(), "ac dc".to_string()],
            ),
        ]
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            settle_delay: Duration::from_millis(400),
            max_retries: 3,
            retry_delay: Duration::from_millis(2000),
            append_chunk_size: 100,
            artist_aliases: Self::default_aliases(),
        }
    }
}

fn env_millis(key: &str) -> Option<Duration> {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
}
