use async_trait::async_trait;
use lyricplayer_core::{is_remote, CoreError, LyricsSource};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use std::time::Duration;
use tracing::{debug, info, warn};

const LOG_TARGET: &str = "lyricplayer::source::http";

/// Fetches lyrics files over HTTP(S)
pub struct HttpSource {
    client: ClientWithMiddleware,
}

impl HttpSource {
    /// Create an HTTP source with a custom request timeout and retry count.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_settings(timeout_secs: u64, max_retries: u32) -> Result<Self, CoreError> {
        // Base client with timeout
        let base_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("lyricplayer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // Wrap with retry middleware (exponential backoff)
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);
        let client = ClientBuilder::new(base_client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self { client })
    }
}

#[async_trait]
impl LyricsSource for HttpSource {
    fn name(&self) -> &'static str {
        "http"
    }

    fn handles(&self, location: &str) -> bool {
        is_remote(location)
    }

    async fn fetch(&self, location: &str) -> Result<String, CoreError> {
        info!(target: LOG_TARGET, "GET {}", location);

        let response = self.client.get(location).send().await?;
        let status = response.status();
        debug!(target: LOG_TARGET, "Response status: {}", status);

        if !status.is_success() {
            warn!(target: LOG_TARGET, "{} returned status: {}", location, status);
            return Err(CoreError::LyricsFetchFailed {
                location: location.to_string(),
                reason: format!("server returned status: {status}"),
            });
        }

        let text = response.text().await?;
        debug!(target: LOG_TARGET, "Received {} bytes from {}", text.len(), location);
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_only_remote_locations() {
        let source = HttpSource::with_settings(10, 3).unwrap();
        assert!(source.handles("https://example.com/lyrics/song.lrc"));
        assert!(source.handles("http://127.0.0.1:8080/song.lrc"));
        assert!(!source.handles("songs/lrcs/song.lrc"));
        assert!(!source.handles("file:///tmp/song.lrc"));
    }

    #[test]
    fn test_name() {
        let source = HttpSource::with_settings(1, 0).unwrap();
        assert_eq!(source.name(), "http");
    }

    #[tokio::test]
    async fn test_unreachable_host_fails() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let source = HttpSource::with_settings(2, 0).unwrap();
        let result = source.fetch("http://127.0.0.1:9/song.lrc").await;
        assert!(result.is_err());
    }
}
