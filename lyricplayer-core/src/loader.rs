//! Lyrics loader that picks a source for a location and parses the result.

use std::sync::Arc;
use tracing::{info, warn};

use crate::demo::demo_track;
use crate::error::{CoreError, Result};
use crate::lrc::LyricTrack;
use crate::source::LyricsSource;

const LOG_TARGET: &str = "lyricplayer::loader";

/// Where a loaded track came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LyricsOrigin {
    /// Parsed from the song's lyrics file
    Fetched,
    /// The lyrics file could not be retrieved
    Fallback,
}

/// A parsed track ready to hand to the player
#[derive(Debug, Clone)]
pub struct LoadedLyrics {
    pub track: Arc<LyricTrack>,
    pub origin: LyricsOrigin,
}

impl LoadedLyrics {
    #[must_use]
    pub fn fetched(track: LyricTrack) -> Self {
        Self {
            track: Arc::new(track),
            origin: LyricsOrigin::Fetched,
        }
    }

    #[must_use]
    pub fn fallback(track: LyricTrack) -> Self {
        Self {
            track: Arc::new(track),
            origin: LyricsOrigin::Fallback,
        }
    }
}

/// Loads lyrics through the first source that handles a location.
///
/// Retrieval failures never reach the caller: the demonstration track is
/// substituted, or an empty track when the fallback is disabled.
pub struct LyricsLoader {
    sources: Vec<Box<dyn LyricsSource>>,
    demo_fallback: bool,
}

impl LyricsLoader {
    /// Create a new lyrics loader
    ///
    /// # Arguments
    /// * `sources` - Sources to consult, in priority order
    /// * `demo_fallback` - Substitute the demonstration track when retrieval fails
    pub fn new(sources: Vec<Box<dyn LyricsSource>>, demo_fallback: bool) -> Self {
        Self {
            sources,
            demo_fallback,
        }
    }

    /// Names of the configured sources, in priority order
    #[must_use]
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Fetch the raw text at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoSourceForLocation`] if no source handles the
    /// location, or the source's error if the fetch fails.
    pub async fn fetch_text(&self, location: &str) -> Result<String> {
        let source = self
            .sources
            .iter()
            .find(|source| source.handles(location))
            .ok_or_else(|| CoreError::NoSourceForLocation {
                location: location.to_string(),
            })?;

        info!(
            target: LOG_TARGET,
            "Fetching lyrics from {} (source: {})",
            location,
            source.name()
        );
        source.fetch(location).await
    }

    /// Fetch and parse the lyrics at `location`, falling back on failure
    pub async fn load(&self, location: &str) -> LoadedLyrics {
        match self.fetch_text(location).await {
            Ok(text) => {
                let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
                let track = LyricTrack::parse(text);
                info!(
                    target: LOG_TARGET,
                    "Parsed {} lyric lines from {}",
                    track.len(),
                    location
                );
                LoadedLyrics::fetched(track)
            }
            Err(e) if self.demo_fallback => {
                warn!(
                    target: LOG_TARGET,
                    "Could not load lyrics, using demo track: {}", e
                );
                LoadedLyrics::fallback(demo_track())
            }
            Err(e) => {
                warn!(target: LOG_TARGET, "Could not load lyrics: {}", e);
                LoadedLyrics::fallback(LyricTrack::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Source that serves fixed text for locations with a given prefix
    struct StaticSource {
        prefix: &'static str,
        content: Option<&'static str>,
    }

    #[async_trait]
    impl LyricsSource for StaticSource {
        fn name(&self) -> &'static str {
            self.prefix
        }

        fn handles(&self, location: &str) -> bool {
            location.starts_with(self.prefix)
        }

        async fn fetch(&self, location: &str) -> Result<String> {
            self.content
                .map(str::to_string)
                .ok_or_else(|| CoreError::LyricsFetchFailed {
                    location: location.to_string(),
                    reason: "unavailable".to_string(),
                })
        }
    }

    fn loader(demo_fallback: bool) -> LyricsLoader {
        LyricsLoader::new(
            vec![
                Box::new(StaticSource {
                    prefix: "ok:",
                    content: Some("\u{feff}[00:02.00]second\n[00:01.00]first"),
                }),
                Box::new(StaticSource {
                    prefix: "down:",
                    content: None,
                }),
                Box::new(StaticSource {
                    prefix: "ok:shadowed",
                    content: Some("[00:09.00]never used"),
                }),
            ],
            demo_fallback,
        )
    }

    #[test]
    fn test_source_names() {
        assert_eq!(loader(true).source_names(), ["ok:", "down:", "ok:shadowed"]);
    }

    #[tokio::test]
    async fn test_load_parses_fetched_text() {
        let loaded = loader(true).load("ok:shadowed/song.lrc").await;

        assert_eq!(loaded.origin, LyricsOrigin::Fetched);
        let texts: Vec<_> = loaded.track.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["first", "second"]);
    }

    #[tokio::test]
    async fn test_load_failure_uses_demo_track() {
        let loaded = loader(true).load("down:song.lrc").await;

        assert_eq!(loaded.origin, LyricsOrigin::Fallback);
        assert_eq!(*loaded.track, demo_track());
    }

    #[tokio::test]
    async fn test_load_without_source_uses_demo_track() {
        let loaded = loader(true).load("ftp://elsewhere/song.lrc").await;
        assert_eq!(loaded.origin, LyricsOrigin::Fallback);
        assert!(!loaded.track.is_empty());
    }

    #[tokio::test]
    async fn test_load_failure_without_fallback_is_empty() {
        let loaded = loader(false).load("down:song.lrc").await;

        assert_eq!(loaded.origin, LyricsOrigin::Fallback);
        assert!(loaded.track.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_text_no_source() {
        let result = loader(true).fetch_text("nowhere").await;
        assert!(matches!(result, Err(CoreError::NoSourceForLocation { .. })));
    }
}
