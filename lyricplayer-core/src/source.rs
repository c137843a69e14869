//! Lyrics retrieval sources.

use crate::error::{CoreError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;
use url::Url;

const LOG_TARGET: &str = "lyricplayer::source";

/// Trait for lyrics sources.
///
/// A source turns a lyrics location from a song descriptor (a path or URL)
/// into the raw text of the lyrics file. Parsing is not its concern.
#[async_trait]
pub trait LyricsSource: Send + Sync {
    /// Get the source name
    fn name(&self) -> &'static str;

    /// Whether this source can fetch `location`
    fn handles(&self, location: &str) -> bool;

    /// Fetch the full text at `location`.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be obtained.
    async fn fetch(&self, location: &str) -> Result<String>;
}

/// Whether `location` is an `http` or `https` URL
#[must_use]
pub fn is_remote(location: &str) -> bool {
    Url::parse(location).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// Reads lyrics from the local filesystem.
///
/// Relative locations resolve against a base directory; `file://` URLs and
/// absolute paths are used as-is.
#[derive(Debug, Clone)]
pub struct FileSource {
    base_dir: PathBuf,
}

impl FileSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Resolve a location to a filesystem path
    #[must_use]
    pub fn resolve(&self, location: &str) -> PathBuf {
        if let Some(path) = Url::parse(location)
            .ok()
            .filter(|url| url.scheme() == "file")
            .and_then(|url| url.to_file_path().ok())
        {
            return path;
        }

        // `join` keeps absolute paths unchanged
        self.base_dir.join(location)
    }
}

#[async_trait]
impl LyricsSource for FileSource {
    fn name(&self) -> &'static str {
        "file"
    }

    fn handles(&self, location: &str) -> bool {
        !is_remote(location)
    }

    async fn fetch(&self, location: &str) -> Result<String> {
        let path = self.resolve(location);
        debug!(target: LOG_TARGET, "Reading lyrics from {}", path.display());

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| CoreError::LyricsFetchFailed {
                location: location.to_string(),
                reason: e.to_string(),
            })?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("http://example.com/a.lrc"));
        assert!(is_remote("https://example.com/a.lrc"));
        assert!(!is_remote("file:///tmp/a.lrc"));
        assert!(!is_remote("songs/lrcs/a.lrc"));
        assert!(!is_remote("/abs/a.lrc"));
    }

    #[test]
    fn test_file_source_handles_local_only() {
        let source = FileSource::new(".");
        assert!(source.handles("songs/lrcs/a.lrc"));
        assert!(source.handles("file:///tmp/a.lrc"));
        assert!(!source.handles("https://example.com/a.lrc"));
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let source = FileSource::new("/srv/music");
        assert_eq!(
            source.resolve("songs/lrcs/a.lrc"),
            PathBuf::from("/srv/music/songs/lrcs/a.lrc")
        );
        assert_eq!(source.resolve("/tmp/b.lrc"), PathBuf::from("/tmp/b.lrc"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_file_url() {
        let source = FileSource::new("/srv/music");
        assert_eq!(
            source.resolve("file:///tmp/c.lrc"),
            PathBuf::from("/tmp/c.lrc")
        );
    }

    #[tokio::test]
    async fn test_fetch_reads_file() {
        let dir = std::env::temp_dir();
        let name = format!("lyricplayer-source-{}.lrc", std::process::id());
        tokio::fs::write(dir.join(&name), "[00:01.00]hello\n")
            .await
            .unwrap();

        let source = FileSource::new(&dir);
        let text = source.fetch(&name).await.unwrap();
        let _ = tokio::fs::remove_file(dir.join(&name)).await;

        assert_eq!(text, "[00:01.00]hello\n");
    }

    #[tokio::test]
    async fn test_fetch_missing_file_fails() {
        let source = FileSource::new(std::env::temp_dir());
        let result = source.fetch("lyricplayer-no-such-file.lrc").await;
        assert!(matches!(
            result,
            Err(CoreError::LyricsFetchFailed { ref location, .. }) if location == "lyricplayer-no-such-file.lrc"
        ));
    }
}
