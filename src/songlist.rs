//! Desired-list loading and parsing.
//!
//! The desired list is a plain text file with one `Artist - Title` entry per
//! line. Order is significant and total: positions are assigned over the
//! valid lines at load time and never renumbered. Lines without a separator
//! are recorded as format errors and excluded; they never abort the run.

use crate::types::SongSpec;

/// The parsed desired list plus the lines that failed to parse.
#[derive(Debug, Clone, Default)]
pub struct SongList {
    pub songs: Vec<SongSpec>,
    pub invalid: Vec<String>,
}

/// Parses the desired list from file contents.
///
/// Splits each non-blank line on the first `-` into artist and title. A line
/// without a `-` is collected into `invalid` and does not consume a position.
pub fn parse_song_list(content: &str) -> SongList {
    let mut list = SongList::default();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match trimmed.split_once('-') {
            Some((artist, title)) => {
                let position = list.songs.len();
                list.songs.push(SongSpec {
                    position,
                    artist: artist.trim().to_string(),
                    raw_title: title.trim().to_string(),
                    original_line: trimmed.to_string(),
                });
            }
            None => list.invalid.push(trimmed.to_string()),
        }
    }

    list
}

/// Reads and parses the desired list from `path`.
pub async fn load_song_list(path: &str) -> Result<SongList, String> {
    let content = async_fs::read_to_string(path)
        .await
        .map_err(|e| format!("cannot read song list {}: {}", path, e))?;
    Ok(parse_song_list(&content))
}
