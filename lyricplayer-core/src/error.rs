use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // Configuration errors
    #[error("Config file not found at {path}. A template has been created - add your songs and restart.")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid config: {message}")]
    ConfigInvalid { message: String },

    #[error("Failed to parse config file: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    // Catalog errors
    #[error("No song with id {id} in the catalog")]
    SongNotFound { id: u32 },

    #[error("Duplicate song id {id} in the catalog")]
    DuplicateSongId { id: u32 },

    // Lyrics errors
    #[error("Failed to fetch lyrics from {location}: {reason}")]
    LyricsFetchFailed { location: String, reason: String },

    #[error("No lyrics source can handle {location}")]
    NoSourceForLocation { location: String },

    // Network errors
    #[error("Network request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Network middleware failed: {0}")]
    MiddlewareError(#[from] reqwest_middleware::Error),

    // IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
