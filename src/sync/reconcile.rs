//! Diff engine: computes the divergence between the desired list and one
//! playlist snapshot as an [`ActionSet`].

use std::collections::HashMap;

use crate::{
    normalize::Normalizer,
    types::{ActionSet, MoveAction, RemoteTrack, SongSpec},
};

/// Keys the desired list in list order. Later entries colliding on a key
/// overwrite earlier ones; key identity cannot tell them apart.
pub fn build_desired_map(
    normalizer: &Normalizer,
    songs: &[SongSpec],
) -> HashMap<String, SongSpec> {
    let mut map = HashMap::with_capacity(songs.len());
    for song in songs {
        map.insert(
            normalizer.make_key(&song.artist, &song.raw_title),
            song.clone(),
        );
    }
    map
}

/// Keys one full snapshot of the remote playlist in playlist order.
pub fn build_actual_map(
    normalizer: &Normalizer,
    tracks: &[RemoteTrack],
) -> HashMap<String, RemoteTrack> {
    let mut map = HashMap::with_capacity(tracks.len());
    for track in tracks {
        map.insert(
            normalizer.make_key(&track.artist_name, &track.name),
            track.clone(),
        );
    }
    map
}

/// Computes the add/remove/move sets between the two keyed maps.
///
/// The three sets are mutually exclusive and together describe every
/// divergence under key identity. No ordering among the actions is implied
/// here - sequencing them correctly against shifting indices is the
/// sequencer's job. The vectors are sorted by position only so output and
/// reports are deterministic.
pub fn diff(
    desired: &HashMap<String, SongSpec>,
    actual: &HashMap<String, RemoteTrack>,
) -> ActionSet {
    let mut actions = ActionSet::default();

    for (key, track) in actual {
        if !desired.contains_key(key) {
            actions.remove.push(track.clone());
        }
    }

    for (key, song) in desired {
        match actual.get(key) {
            None => actions.add.push(song.clone()),
            Some(track) if track.position != song.position => {
                actions.moves.push(MoveAction {
                    id: track.id.clone(),
                    name: track.name.clone(),
                    from_pos: track.position,
                    to_pos: song.position,
                });
            }
            Some(_) => {}
        }
    }

    actions.remove.sort_by_key(|t| t.position);
    actions.add.sort_by_key(|s| s.position);
    actions.moves.sort_by_key(|m| m.to_pos);
    actions
}
