use tabled::Table;

use crate::{
    config::SyncConfig,
    error, info,
    normalize::Normalizer,
    songlist,
    spotify::playlist::{self, PlaylistClient},
    success,
    sync::verify as run_verify,
    types::ReportTableRow,
    warning,
};

pub async fn verify(file: String, playlist_name: String) {
    let config = SyncConfig::from_env();
    let normalizer = Normalizer::new(config.artist_aliases.clone());

    let list = match songlist::load_song_list(&file).await {
        Ok(list) => list,
        Err(e) => error!("{}", e),
    };
    for line in &list.invalid {
        warning!("Skipping invalid line (missing '-' separator): {}", line);
    }

    let playlist = match playlist::find_by_name(&playlist_name).await {
        Ok(Some(found)) => found,
        Ok(None) => error!("Playlist '{}' does not exist", playlist_name),
        Err(e) => error!("Failed to look up playlist '{}': {}", playlist_name, e),
    };

    let client = match PlaylistClient::open(playlist.id, config.append_chunk_size).await {
        Ok(client) => client,
        Err(e) => error!("Failed to load token. Please run spsync auth\n Error: {}", e),
    };

    info!(
        "Verifying '{}' against {} ({} songs)",
        playlist_name,
        file,
        list.songs.len()
    );

    let report = match run_verify(&client, &normalizer, &list.songs).await {
        Ok(report) => report,
        Err(e) => error!("Cannot read playlist: {}", e),
    };

    if report.passed {
        success!("Verification passed: playlist matches the song list");
        return;
    }

    if let Some((expected, actual)) = report.length {
        error!(
            "Verification failed: length mismatch (expected {}, actual {})",
            expected, actual
        );
    }

    warning!(
        "Verification failed: {} positions mismatch",
        report.mismatches.len()
    );
    let rows: Vec<ReportTableRow> = report
        .mismatches
        .iter()
        .map(|m| ReportTableRow {
            position: m.position,
            expected: m.expected.clone(),
            actual: m.actual.clone(),
        })
        .collect();
    println!("{}", Table::new(rows));
}
