use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    config, error,
    error::SyncError,
    management::TokenManager,
    sync::PlaylistService,
    types::{
        AddTracksRequest, CreatePlaylistRequest, CreatePlaylistResponse, GetUserPlaylistsResponse,
        Playlist, PlaylistTracksResponse, RemoteTrack, RemoveTrackUri, RemoveTracksRequest,
        ReorderRequest, SearchResponse, TrackCandidate,
    },
    utils,
};

/// Spotify Web API implementation of [`PlaylistService`] for one playlist.
///
/// Methods are single-shot HTTP calls; transient/permanent classification
/// happens via [`SyncError`]'s `From<reqwest::Error>` and retrying is the
/// caller's concern. The token manager is shared behind a mutex so a refresh
/// triggered by one call is visible to the next.
pub struct PlaylistClient {
    client: Client,
    playlist_id: String,
    token: Mutex<TokenManager>,
    append_chunk_size: usize,
}

impl PlaylistClient {
    /// Opens a client for `playlist_id` using the persisted token.
    ///
    /// Fails when no token has been stored yet; run `spsync auth` first.
    pub async fn open(playlist_id: String, append_chunk_size: usize) -> Result<Self, String> {
        let token = TokenManager::load().await?;
        Ok(PlaylistClient {
            client: Client::new(),
            playlist_id,
            token: Mutex::new(token),
            append_chunk_size,
        })
    }

    async fn bearer(&self) -> String {
        self.token.lock().await.get_valid_token().await
    }

    fn tracks_url(&self) -> String {
        format!(
            "{uri}/playlists/{id}/tracks",
            uri = config::spotify_apiurl(),
            id = self.playlist_id
        )
    }
}

#[async_trait]
impl PlaylistService for PlaylistClient {
    /// Reads the full playlist, following the pagination cursor to
    /// exhaustion. Items whose track payload is missing (removed or
    /// unavailable catalog entries) are skipped; positions are assigned over
    /// the returned tracks in playlist order.
    async fn read_collection(&self) -> Result<Vec<RemoteTrack>, SyncError> {
        let mut tracks: Vec<RemoteTrack> = Vec::new();
        let mut url = Some(format!(
            "{base}?limit=100&fields=items(track(id,name,artists(name))),next,total",
            base = self.tracks_url()
        ));

        while let Some(page_url) = url {
            let token = self.bearer().await;
            let response = self
                .client
                .get(&page_url)
                .bearer_auth(token)
                .send()
                .await?
                .error_for_status()?;

            let page = response.json::<PlaylistTracksResponse>().await?;
            for item in page.items {
                let Some(track) = item.track else { continue };
                let Some(id) = track.id else { continue };
                tracks.push(RemoteTrack {
                    id,
                    name: track.name,
                    artist_name: track
                        .artists
                        .first()
                        .map(|a| a.name.clone())
                        .unwrap_or_default(),
                    position: tracks.len(),
                });
            }
            url = page.next;
        }

        Ok(tracks)
    }

    /// Appends tracks at the playlist end, chunked to the service's per-call
    /// maximum.
    async fn append(&self, ids: &[String]) -> Result<(), SyncError> {
        for chunk in ids.chunks(self.append_chunk_size) {
            let body = AddTracksRequest {
                uris: chunk.iter().map(|id| utils::track_uri(id)).collect(),
            };

            let token = self.bearer().await;
            self.client
                .post(self.tracks_url())
                .bearer_auth(token)
                .json(&body)
                .send()
                .await?
                .error_for_status()?;
        }

        Ok(())
    }

    /// Removes every occurrence of each given track, chunked like `append`.
    async fn remove_all_occurrences(&self, ids: &[String]) -> Result<(), SyncError> {
        for chunk in ids.chunks(self.append_chunk_size) {
            let body = RemoveTracksRequest {
                tracks: chunk
                    .iter()
                    .map(|id| RemoveTrackUri {
                        uri: utils::track_uri(id),
                    })
                    .collect(),
            };

            let token = self.bearer().await;
            self.client
                .delete(self.tracks_url())
                .bearer_auth(token)
                .json(&body)
                .send()
                .await?
                .error_for_status()?;
        }

        Ok(())
    }

    /// Moves `count` tracks starting at `from_index` to sit before
    /// `insert_before`, via the reorder endpoint.
    async fn move_range(
        &self,
        from_index: usize,
        count: usize,
        insert_before: usize,
    ) -> Result<(), SyncError> {
        let body = ReorderRequest {
            range_start: from_index,
            range_length: count,
            insert_before,
        };

        let token = self.bearer().await;
        self.client
            .put(self.tracks_url())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    /// Track search for the fallback ladder. Candidates come back in the
    /// service's ranking order; only the first listed artist is kept.
    async fn search_track(&self, query: &str) -> Result<Vec<TrackCandidate>, SyncError> {
        let api_url = format!("{uri}/search", uri = config::spotify_apiurl());

        let token = self.bearer().await;
        let response = self
            .client
            .get(&api_url)
            .query(&[("q", query), ("type", "track"), ("limit", "10")])
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?;

        let json = response.json::<SearchResponse>().await?;
        Ok(json
            .tracks
            .items
            .into_iter()
            .map(|item| TrackCandidate {
                id: item.id,
                title: item.name,
                artist: item
                    .artists
                    .first()
                    .map(|a| a.name.clone())
                    .unwrap_or_default(),
            })
            .collect())
    }
}

/// Looks up a playlist by exact name among the user's playlists.
///
/// Follows pagination until the name is found or the listing is exhausted.
/// Uses the stored token; terminates with a pointer to `spsync auth` when no
/// token is available.
pub async fn find_by_name(name: &str) -> Result<Option<Playlist>, SyncError> {
    let mut token_mgr = match TokenManager::load().await {
        Ok(manager) => manager,
        Err(e) => {
            error!("Failed to load token. Please run spsync auth\n Error: {}", e);
        }
    };

    let client = Client::new();
    let mut url = Some(format!(
        "{uri}/me/playlists?limit=50",
        uri = config::spotify_apiurl()
    ));

    while let Some(page_url) = url {
        let token = token_mgr.get_valid_token().await;
        let response = client
            .get(&page_url)
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?;

        let page = response.json::<GetUserPlaylistsResponse>().await?;
        if let Some(playlist) = page.items.into_iter().find(|p| p.name == name) {
            return Ok(Some(playlist));
        }
        url = page.next;
    }

    Ok(None)
}

/// Creates a new public playlist with the given name for the configured user.
pub async fn create(name: &str) -> Result<Playlist, SyncError> {
    let mut token_mgr = match TokenManager::load().await {
        Ok(manager) => manager,
        Err(e) => {
            error!("Failed to load token. Please run spsync auth\n Error: {}", e);
        }
    };

    let api_url = format!(
        "{uri}/users/{user}/playlists",
        uri = config::spotify_apiurl(),
        user = config::spotify_user()
    );

    let body = CreatePlaylistRequest {
        name: name.to_string(),
        description: "Synchronized by spsync".to_string(),
        public: true,
        collaborative: false,
    };

    let client = Client::new();
    let token = token_mgr.get_valid_token().await;
    let response = client
        .post(&api_url)
        .bearer_auth(token)
        .json(&body)
        .send()
        .await?
        .error_for_status()?;

    let created = response.json::<CreatePlaylistResponse>().await?;
    Ok(Playlist {
        id: created.id,
        name: created.name,
    })
}
