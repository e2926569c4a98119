use tabled::Table;

use crate::{
    config::SyncConfig,
    error, info,
    normalize::Normalizer,
    songlist,
    spotify::playlist::{self, PlaylistClient},
    success,
    sync::{build_actual_map, build_desired_map},
    types::RemoteTrack,
    warning,
};

pub async fn diff(file: String, playlist_name: String) {
    let config = SyncConfig::from_env();
    let normalizer = Normalizer::new(config.artist_aliases.clone());

    let list = match songlist::load_song_list(&file).await {
        Ok(list) => list,
        Err(e) => error!("{}", e),
    };
    for line in &list.invalid {
        warning!("Skipping invalid line (missing '-' separator): {}", line);
    }
    info!("Found {} songs in {}", list.songs.len(), file);

    // A playlist that does not exist yet diffs against an empty snapshot.
    let snapshot: Vec<RemoteTrack> = match playlist::find_by_name(&playlist_name).await {
        Ok(Some(found)) => {
            let client = match PlaylistClient::open(found.id, config.append_chunk_size).await {
                Ok(client) => client,
                Err(e) => error!("Failed to load token. Please run spsync auth\n Error: {}", e),
            };
            super::read_snapshot(&client, &config).await
        }
        Ok(None) => {
            info!("Playlist '{}' does not exist yet", playlist_name);
            Vec::new()
        }
        Err(e) => error!("Failed to look up playlist '{}': {}", playlist_name, e),
    };

    let desired = build_desired_map(&normalizer, &list.songs);
    let actual = build_actual_map(&normalizer, &snapshot);
    let actions = crate::sync::diff(&desired, &actual);

    if actions.is_empty() {
        success!("Playlist already matches the song list");
        return;
    }

    info!(
        "Plan: {} to add, {} to remove, {} to move",
        actions.add.len(),
        actions.remove.len(),
        actions.moves.len()
    );
    println!("{}", Table::new(super::action_rows(&actions)));
}
