//! Song catalog: the descriptors the player can select from.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

const LOG_TARGET: &str = "lyricplayer::catalog";

/// Descriptor of a playable song.
///
/// Accepts both `snake_case` keys (TOML config) and the `camelCase` keys used
/// by JSON song lists (`audioFile`, `lyricsFile`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: u32,
    pub title: String,
    pub artist: String,
    /// Path or URL of the audio file
    #[serde(alias = "audioFile")]
    pub audio_file: String,
    /// Path or URL of the timestamped lyrics
    #[serde(alias = "lyricsFile")]
    pub lyrics_file: String,
    /// Path or URL of the cover image
    #[serde(default)]
    pub cover: String,
}

impl Song {
    /// Case-insensitive match of `term` against title or artist.
    /// `term` must already be lowercase.
    fn matches(&self, term: &str) -> bool {
        self.title.to_lowercase().contains(term) || self.artist.to_lowercase().contains(term)
    }
}

/// Ordered collection of songs with unique ids
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    songs: Vec<Song>,
}

impl Catalog {
    /// Build a catalog, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateSongId`] if two songs share an id.
    pub fn new(songs: Vec<Song>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(songs.len());
        for song in &songs {
            if !seen.insert(song.id) {
                return Err(CoreError::DuplicateSongId { id: song.id });
            }
        }

        Ok(Self { songs })
    }

    /// Read a JSON array of song descriptors.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid song list.
    pub async fn read_json(path: &Path) -> Result<Vec<Song>> {
        let content = tokio::fs::read_to_string(path).await?;
        let songs: Vec<Song> = serde_json::from_str(&content)?;
        debug!(
            target: LOG_TARGET,
            "Read {} songs from {}",
            songs.len(),
            path.display()
        );
        Ok(songs)
    }

    #[must_use]
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: u32) -> Option<&Song> {
        self.songs.iter().find(|song| song.id == id)
    }

    /// Filter songs by title or artist, case-insensitively.
    ///
    /// A blank query returns every song. Catalog order is preserved.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Song> {
        let query = query.trim();
        if query.is_empty() {
            return self.songs.iter().collect();
        }

        let term = query.to_lowercase();
        self.songs.iter().filter(|song| song.matches(&term)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: u32, title: &str, artist: &str) -> Song {
        Song {
            id,
            title: title.to_string(),
            artist: artist.to_string(),
            audio_file: format!("songs/{id}.mp3"),
            lyrics_file: format!("songs/lrcs/{id}.lrc"),
            cover: format!("songs/image/{id}.jpg"),
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            song(1, "Birthday", "The Innkeepers"),
            song(2, "Tell Me", "Pedro Vertiz"),
            song(3, "Night Drive", "Birthday Club"),
        ])
        .unwrap()
    }

    fn ids(songs: &[&Song]) -> Vec<u32> {
        songs.iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_get() {
        let catalog = catalog();
        assert_eq!(catalog.get(2).map(|s| s.title.as_str()), Some("Tell Me"));
        assert!(catalog.get(42).is_none());
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Catalog::new(vec![song(1, "a", "x"), song(1, "b", "y")]);
        assert!(matches!(result, Err(CoreError::DuplicateSongId { id: 1 })));
    }

    #[test]
    fn test_search_blank_returns_all() {
        let catalog = catalog();
        assert_eq!(ids(&catalog.search("")), [1, 2, 3]);
        assert_eq!(ids(&catalog.search("   ")), [1, 2, 3]);
    }

    #[test]
    fn test_search_matches_title_or_artist() {
        let catalog = catalog();
        assert_eq!(ids(&catalog.search("birthday")), [1, 3]);
        assert_eq!(ids(&catalog.search("VERTIZ")), [2]);
        assert_eq!(ids(&catalog.search("  drive ")), [3]);
        assert!(catalog.search("nothing here").is_empty());
    }

    #[test]
    fn test_song_deserialize_camel_case() {
        let json = r#"[{
            "id": 7,
            "title": "Song",
            "artist": "Artist",
            "audioFile": "songs/a.mp3",
            "lyricsFile": "songs/lrcs/a.lrc",
            "cover": "songs/image/a.jpg"
        }]"#;
        let songs: Vec<Song> = serde_json::from_str(json).unwrap();
        assert_eq!(songs[0].audio_file, "songs/a.mp3");
        assert_eq!(songs[0].lyrics_file, "songs/lrcs/a.lrc");
    }

    #[test]
    fn test_song_deserialize_snake_case_without_cover() {
        let toml_str = r#"
id = 3
title = "Song"
artist = "Artist"
audio_file = "a.mp3"
lyrics_file = "a.lrc"
"#;
        let song: Song = toml::from_str(toml_str).unwrap();
        assert_eq!(song.lyrics_file, "a.lrc");
        assert!(song.cover.is_empty());
    }

    #[tokio::test]
    async fn test_read_json() {
        let path = std::env::temp_dir().join(format!(
            "lyricplayer-catalog-{}.json",
            std::process::id()
        ));
        let songs = vec![song(1, "a", "x"), song(2, "b", "y")];
        tokio::fs::write(&path, serde_json::to_string(&songs).unwrap())
            .await
            .unwrap();

        let read = Catalog::read_json(&path).await.unwrap();
        let _ = tokio::fs::remove_file(&path).await;
        assert_eq!(read, songs);
    }

    #[tokio::test]
    async fn test_read_json_missing_file() {
        let path = std::env::temp_dir().join("lyricplayer-catalog-does-not-exist.json");
        assert!(matches!(
            Catalog::read_json(&path).await,
            Err(CoreError::IoError(_))
        ));
    }
}
