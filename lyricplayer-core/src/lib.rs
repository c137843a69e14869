pub mod catalog;
pub mod config;
pub mod demo;
pub mod error;
pub mod loader;
pub mod lrc;
pub mod paths;
pub mod playback;
pub mod player;
pub mod source;
pub mod time;
pub mod tracker;

pub use catalog::{Catalog, Song};
pub use config::{
    CatalogConfig, LoggingConfig, LyricsConfig, PlaybackConfig, PlayerConfig, CONFIG_TEMPLATE,
};

pub use demo::demo_track;
pub use error::CoreError;
pub use loader::{LoadedLyrics, LyricsLoader, LyricsOrigin};
pub use lrc::{LyricLine, LyricTrack};
pub use paths::{config_dir, log_file_path, CONFIG_DIR_NAME, CONFIG_FILE_NAME, LOG_FILE_NAME};
pub use playback::{DisplayAdapter, MediaClock, PlaybackClock};
pub use player::{LyricsRequest, Player, PlayerEvent, RequestToken};
pub use source::{is_remote, FileSource, LyricsSource};
pub use time::SecondsExt;
pub use tracker::{LineState, LineTracker, Transition};
