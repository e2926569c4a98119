//! Read-only verification of the final playlist against the desired list.

use crate::{
    error::SyncError,
    normalize::Normalizer,
    sync::PlaylistService,
    types::{Mismatch, SongSpec, VerifyReport},
};

/// Re-reads the playlist and compares it position by position against the
/// desired list under the same normalization as the matcher.
///
/// A length mismatch fails fast with `(expected, actual)` lengths and no
/// positional comparison. Otherwise every mismatching position is collected.
/// Never mutates.
pub async fn verify<S: PlaylistService>(
    service: &S,
    normalizer: &Normalizer,
    desired: &[SongSpec],
) -> Result<VerifyReport, SyncError> {
    let snapshot = service
        .read_collection()
        .await
        .map_err(|e| SyncError::CollectionRead(e.to_string()))?;

    if snapshot.len() != desired.len() {
        return Ok(VerifyReport {
            passed: false,
            length: Some((desired.len(), snapshot.len())),
            mismatches: Vec::new(),
        });
    }

    let mismatches: Vec<Mismatch> = desired
        .iter()
        .zip(snapshot.iter())
        .filter(|(song, track)| {
            normalizer.make_key(&song.artist, &song.raw_title)
                != normalizer.make_key(&track.artist_name, &track.name)
        })
        .map(|(song, track)| Mismatch {
            position: song.position,
            expected: song.to_string(),
            actual: track.to_string(),
        })
        .collect();

    Ok(VerifyReport {
        passed: mismatches.is_empty(),
        length: None,
        mismatches,
    })
}
