use tabled::Table;

use crate::{
    config::SyncConfig,
    error, info,
    normalize::Normalizer,
    songlist,
    spotify::playlist::{self, PlaylistClient},
    success,
    sync::{Sequencer, build_actual_map, build_desired_map, verify as run_verify},
    types::{Playlist, RemoteTrack, ReportTableRow, SongSpec, SyncOutcome, VerifyReport},
    warning,
};

pub async fn sync(
    file: String,
    playlist_name: String,
    do_verify: bool,
    dry_run: bool,
    report_path: Option<String>,
) {
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

    let playlist = resolve_playlist(&playlist_name, dry_run).await;
    let client = match PlaylistClient::open(playlist.id, config.append_chunk_size).await {
        Ok(client) => client,
        Err(e) => error!("Failed to load token. Please run spsync auth\n Error: {}", e),
    };

    let snapshot = super::read_snapshot(&client, &config).await;
    let actions = {
        let desired = build_desired_map(&normalizer, &list.songs);
        let actual = build_actual_map(&normalizer, &snapshot);
        crate::sync::diff(&desired, &actual)
    };

    info!(
        "Plan: {} to add, {} to remove, {} to move",
        actions.add.len(),
        actions.remove.len(),
        actions.moves.len()
    );

    if dry_run {
        if actions.is_empty() {
            success!("Playlist already matches the song list");
        } else {
            println!("{}", Table::new(super::action_rows(&actions)));
        }
        return;
    }

    let outcome = if actions.is_empty() {
        success!("Playlist already matches the song list");
        SyncOutcome::default()
    } else {
        let sequencer = Sequencer::new(&client, &normalizer, &config);
        match sequencer.run(&list.songs).await {
            Ok(outcome) => outcome,
            Err(e) => error!("Sync aborted: {}", e),
        }
    };

    success!(
        "Placed {}, inserted {}, removed {} (skipped {}, not found {})",
        outcome.placed,
        outcome.inserted,
        outcome.removed,
        outcome.skipped,
        outcome.not_found.len()
    );

    let final_snapshot = super::read_snapshot(&client, &config).await;
    let rows = report_rows(&list.songs, &final_snapshot);

    let verification = if do_verify {
        let report = match run_verify(&client, &normalizer, &list.songs).await {
            Ok(report) => report,
            Err(e) => error!("Cannot read playlist: {}", e),
        };
        print_verification(&report);
        Some(report)
    } else {
        None
    };

    if let Some(path) = report_path {
        let text = render_report(&outcome, &rows, verification.as_ref());
        match async_fs::write(&path, text).await {
            Ok(()) => success!("Report written to {}", path),
            Err(e) => warning!("Failed to write report to {}: {}", path, e),
        }
    }
}

/// Finds the playlist by name, creating it when missing. A dry run never
/// creates anything and bails out instead.
async fn resolve_playlist(name: &str, dry_run: bool) -> Playlist {
    match playlist::find_by_name(name).await {
        Ok(Some(found)) => found,
        Ok(None) if dry_run => {
            error!(
                "Playlist '{}' does not exist; dry run has nothing to diff against. Use `spsync diff` instead.",
                name
            );
        }
        Ok(None) => {
            info!("Playlist '{}' does not exist, creating it", name);
            match playlist::create(name).await {
                Ok(created) => {
                    success!("Playlist '{}' created", created.name);
                    created
                }
                Err(e) => error!("Failed to create playlist '{}': {}", name, e),
            }
        }
        Err(e) => error!("Failed to look up playlist '{}': {}", name, e),
    }
}

/// Position-aligned `{position, expected, actual}` rows over the longer of
/// the two sequences.
fn report_rows(desired: &[SongSpec], snapshot: &[RemoteTrack]) -> Vec<ReportTableRow> {
    let len = desired.len().max(snapshot.len());
    (0..len)
        .map(|position| ReportTableRow {
            position,
            expected: desired
                .get(position)
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            actual: snapshot
                .get(position)
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect()
}

fn print_verification(report: &VerifyReport) {
    if report.passed {
        success!("Verification passed: playlist matches the song list");
        return;
    }

    if let Some((expected, actual)) = report.length {
        warning!(
            "Verification failed: length mismatch (expected {}, actual {})",
            expected,
            actual
        );
        return;
    }

    warning!(
        "Verification failed: {} positions mismatch",
        report.mismatches.len()
    );
    for mismatch in &report.mismatches {
        warning!(
            "  position {}: expected '{}', actual '{}'",
            mismatch.position,
            mismatch.expected,
            mismatch.actual
        );
    }
}

fn render_report(
    outcome: &SyncOutcome,
    rows: &[ReportTableRow],
    verification: Option<&VerifyReport>,
) -> String {
    let mut text = String::new();

    text.push_str(&format!(
        "Sync summary: placed {}, inserted {}, removed {}, skipped {}\n",
        outcome.placed, outcome.inserted, outcome.removed, outcome.skipped
    ));

    if !outcome.not_found.is_empty() {
        text.push_str("\nNot found:\n");
        for song in &outcome.not_found {
            text.push_str(&format!("  - {}\n", song));
        }
    }

    if let Some(report) = verification {
        match (report.passed, report.length) {
            (true, _) => text.push_str("\nVerification: passed\n"),
            (false, Some((expected, actual))) => text.push_str(&format!(
                "\nVerification: failed, length mismatch (expected {}, actual {})\n",
                expected, actual
            )),
            (false, None) => text.push_str(&format!(
                "\nVerification: failed, {} positions mismatch\n",
                report.mismatches.len()
            )),
        }
    }

    text.push_str("\nFinal state:\n");
    text.push_str(&Table::new(rows).to_string());
    text.push('\n');

    text
}
