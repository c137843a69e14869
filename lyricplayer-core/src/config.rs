use crate::catalog::Song;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Slowest allowed time-update schedule. Media elements report at least
/// about four times per second, and line changes should not lag more.
pub const MAX_TICK_INTERVAL_MS: u64 = 250;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub lyrics: LyricsConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Songs declared inline, ahead of any catalog file
    #[serde(default)]
    pub songs: Vec<Song>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// How often the playback position is sampled for lyric updates
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Start playing as soon as a song is selected
    #[serde(default = "default_true")]
    pub autoplay: bool,
}

const fn default_tick_interval() -> u64 {
    MAX_TICK_INTERVAL_MS
}

const fn default_true() -> bool {
    true
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            autoplay: true,
        }
    }
}

impl PlaybackConfig {
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LyricsConfig {
    /// Show the demonstration track when a lyrics file cannot be retrieved
    #[serde(default = "default_true")]
    pub demo_fallback: bool,
    /// Directory that relative lyrics paths resolve against
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
    #[serde(default = "default_http_max_retries")]
    pub http_max_retries: u32,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

const fn default_http_timeout() -> u64 {
    10
}

const fn default_http_max_retries() -> u32 {
    3
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            demo_fallback: true,
            base_dir: default_base_dir(),
            http_timeout_secs: default_http_timeout(),
            http_max_retries: default_http_max_retries(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Optional JSON file with an array of song descriptors
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write logs to ~/.config/lyricplayer/lyricplayer.log
    #[serde(default)]
    pub enabled: bool,
}

impl PlayerConfig {
    /// Get the config file path (~/.config/lyricplayer/config.toml)
    #[must_use]
    pub fn config_path() -> PathBuf {
        crate::paths::config_path()
    }

    /// Load config from `path`, or write a template there on first run.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConfigNotFound`] after creating the template, or
    /// an error if the file cannot be read, parsed or validated.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            // Create config directory if it doesn't exist
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }

            fs::write(path, CONFIG_TEMPLATE)?;

            return Err(CoreError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate config text
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a value is out of range.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=MAX_TICK_INTERVAL_MS).contains(&self.playback.tick_interval_ms) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "playback.tick_interval_ms must be between 1 and {MAX_TICK_INTERVAL_MS}, got {}",
                    self.playback.tick_interval_ms
                ),
            });
        }
        if self.lyrics.http_timeout_secs == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "lyrics.http_timeout_secs must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Template written on first run
pub const CONFIG_TEMPLATE: &str = r#"# lyricplayer configuration
# ~/.config/lyricplayer/config.toml

[playback]
# How often the playback position is sampled (1-250 ms)
tick_interval_ms = 250
autoplay = true

[lyrics]
# Show a demonstration track when a lyrics file cannot be retrieved
demo_fallback = true
# Relative lyrics paths resolve against this directory
base_dir = "."
http_timeout_secs = 10
http_max_retries = 3

[catalog]
# Optional JSON array of songs:
# [{ "id": 1, "title": "...", "artist": "...", "audioFile": "...", "lyricsFile": "...", "cover": "..." }]
# path = "songs.json"

[logging]
# Also write logs to ~/.config/lyricplayer/lyricplayer.log
enabled = false

# Songs can also be listed inline
# [[songs]]
# id = 1
# title = "Song Title"
# artist = "Artist Name"
# audio_file = "songs/song.mp3"
# lyrics_file = "songs/lrcs/song.lrc"
# cover = "songs/image/song-cover.jpg"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_to_defaults() {
        let config = PlayerConfig::from_toml(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.playback.tick_interval_ms, 250);
        assert!(config.playback.autoplay);
        assert!(config.lyrics.demo_fallback);
        assert_eq!(config.lyrics.base_dir, PathBuf::from("."));
        assert!(config.catalog.path.is_none());
        assert!(config.songs.is_empty());
        assert!(!config.logging.enabled);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = PlayerConfig::from_toml("").unwrap();
        assert_eq!(config.playback.tick_interval(), Duration::from_millis(250));
        assert_eq!(config.lyrics.http_timeout_secs, 10);
        assert_eq!(config.lyrics.http_max_retries, 3);
    }

    #[test]
    fn test_inline_songs() {
        let content = r#"
[catalog]
path = "songs.json"

[[songs]]
id = 1
title = "First"
artist = "Someone"
audio_file = "songs/first.mp3"
lyrics_file = "songs/lrcs/first.lrc"
cover = "songs/image/first.jpg"

[[songs]]
id = 2
title = "Second"
artist = "Someone Else"
audio_file = "songs/second.mp3"
lyrics_file = "https://example.com/second.lrc"
"#;
        let config = PlayerConfig::from_toml(content).unwrap();
        assert_eq!(config.catalog.path, Some(PathBuf::from("songs.json")));
        assert_eq!(config.songs.len(), 2);
        assert_eq!(config.songs[1].lyrics_file, "https://example.com/second.lrc");
    }

    #[test]
    fn test_tick_interval_validated() {
        let too_slow = "[playback]\ntick_interval_ms = 1000";
        assert!(matches!(
            PlayerConfig::from_toml(too_slow),
            Err(CoreError::ConfigInvalid { .. })
        ));

        let zero = "[playback]\ntick_interval_ms = 0";
        assert!(matches!(
            PlayerConfig::from_toml(zero),
            Err(CoreError::ConfigInvalid { .. })
        ));

        let fast = "[playback]\ntick_interval_ms = 50";
        assert!(PlayerConfig::from_toml(fast).is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let content = "[lyrics]\nhttp_timeout_secs = 0";
        assert!(matches!(
            PlayerConfig::from_toml(content),
            Err(CoreError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(
            PlayerConfig::from_toml("[playback"),
            Err(CoreError::ConfigParseError(_))
        ));
    }

    #[test]
    fn test_load_or_create_writes_template() {
        let dir = std::env::temp_dir().join(format!("lyricplayer-config-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = fs::remove_dir_all(&dir);

        assert!(matches!(
            PlayerConfig::load_or_create(&path),
            Err(CoreError::ConfigNotFound { .. })
        ));
        assert!(path.exists());

        let config = PlayerConfig::load_or_create(&path).unwrap();
        assert_eq!(config.playback.tick_interval_ms, 250);

        let _ = fs::remove_dir_all(&dir);
    }
}
