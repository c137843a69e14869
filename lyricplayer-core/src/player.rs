use crate::catalog::{Catalog, Song};
use crate::error::{CoreError, Result};
use crate::loader::{LoadedLyrics, LyricsOrigin};
use crate::lrc::LyricTrack;
use crate::playback::DisplayAdapter;
use crate::tracker::{LineTracker, Transition};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

const LOG_TARGET: &str = "lyricplayer::player";

/// Identifies one lyrics load request.
///
/// Tokens increase monotonically; only the most recently issued one may
/// apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// Lyrics the caller should fetch for a newly selected song
#[derive(Debug, Clone)]
pub struct LyricsRequest {
    pub token: RequestToken,
    pub song: Song,
}

impl LyricsRequest {
    /// Path or URL of the lyrics to fetch
    #[must_use]
    pub fn location(&self) -> &str {
        &self.song.lyrics_file
    }
}

/// Events emitted by the player
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// A song became current (selected or restored from history)
    SongSelected { song: Song, can_go_back: bool },
    /// Lyrics were loaded for the current song
    LyricsLoaded {
        song_id: u32,
        track: Arc<LyricTrack>,
        origin: LyricsOrigin,
    },
    /// The current song has no lyric lines
    LyricsUnavailable { song_id: u32 },
    /// The active line changed at playback position `time`
    LineChanged { transition: Transition, time: f64 },
    /// A line was picked; the clock should move to `time`
    SeekRequested { index: usize, time: f64 },
    /// Playback stopped and the player returned to its initial state
    ReturnedHome,
}

impl PlayerEvent {
    /// Forward display-relevant events to a display adapter
    pub fn dispatch<D: DisplayAdapter + ?Sized>(&self, display: &mut D) {
        match self {
            Self::LyricsLoaded { track, .. } => display.lyrics_loaded(track),
            Self::LyricsUnavailable { .. } => display.lyrics_unavailable(),
            Self::LineChanged { transition, .. } => display.line_changed(transition),
            Self::ReturnedHome => display.cleared(),
            Self::SongSelected { .. } | Self::SeekRequested { .. } => {}
        }
    }
}

/// Application state of the player.
///
/// Owns the catalog, the current song, the back-navigation history and the
/// line tracker. All mutation goes through `&mut self`, so the owner decides
/// where the state lives; observers subscribe to [`PlayerEvent`]s.
pub struct Player {
    catalog: Catalog,
    current: Option<Song>,
    history: Vec<Song>,
    tracker: LineTracker,
    last_token: u64,
    pending: Option<RequestToken>,
    event_tx: broadcast::Sender<PlayerEvent>,
}

impl Player {
    /// Create a new player with nothing selected
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        let (event_tx, _) = broadcast::channel(64);

        Self {
            catalog,
            current: None,
            history: Vec::new(),
            tracker: LineTracker::new(),
            last_token: 0,
            pending: None,
            event_tx,
        }
    }

    /// Subscribe to player events
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.event_tx.subscribe()
    }

    /// Make song `id` current and request its lyrics.
    ///
    /// The previous song, if any, is pushed onto the history. The returned
    /// request must be completed with [`complete_lyrics`](Self::complete_lyrics).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SongNotFound`] if `id` is not in the catalog.
    pub fn select_song(&mut self, id: u32) -> Result<LyricsRequest> {
        let song = self
            .catalog
            .get(id)
            .cloned()
            .ok_or(CoreError::SongNotFound { id })?;

        if let Some(previous) = self.current.take() {
            self.history.push(previous);
        }

        Ok(self.make_current(song))
    }

    /// Return to the most recent song in the history without recording the
    /// current one. Returns `None` when there is no history.
    pub fn play_previous(&mut self) -> Option<LyricsRequest> {
        let song = self.history.pop()?;
        Some(self.make_current(song))
    }

    fn make_current(&mut self, song: Song) -> LyricsRequest {
        info!(
            target: LOG_TARGET,
            "Selected: {} - {} (id {})",
            song.artist,
            song.title,
            song.id
        );

        self.tracker.reset();
        self.current = Some(song.clone());

        self.last_token += 1;
        let token = RequestToken(self.last_token);
        self.pending = Some(token);

        let _ = self.event_tx.send(PlayerEvent::SongSelected {
            song: song.clone(),
            can_go_back: self.can_go_back(),
        });

        LyricsRequest { token, song }
    }

    /// Apply loaded lyrics if `token` is still the pending request.
    ///
    /// Results for superseded requests (another song was selected, or the
    /// player returned home) are discarded. Returns whether the lyrics were
    /// applied.
    pub fn complete_lyrics(&mut self, token: RequestToken, lyrics: LoadedLyrics) -> bool {
        if self.pending != Some(token) {
            debug!(
                target: LOG_TARGET,
                "Discarding stale lyrics for request {:?} (pending: {:?})",
                token,
                self.pending
            );
            return false;
        }
        let Some(song_id) = self.current.as_ref().map(|song| song.id) else {
            return false;
        };

        self.pending = None;
        self.tracker.load(lyrics.track.clone());

        if lyrics.track.is_empty() {
            info!(target: LOG_TARGET, "No lyrics available for song {}", song_id);
            let _ = self.event_tx.send(PlayerEvent::LyricsUnavailable { song_id });
        } else {
            info!(
                target: LOG_TARGET,
                "Lyrics loaded for song {}: {} lines ({:?})",
                song_id,
                lyrics.track.len(),
                lyrics.origin
            );
            let _ = self.event_tx.send(PlayerEvent::LyricsLoaded {
                song_id,
                track: lyrics.track,
                origin: lyrics.origin,
            });
        }

        true
    }

    /// Clear the current song, history and lyrics
    pub fn go_home(&mut self) {
        info!(target: LOG_TARGET, "Returning home");

        self.current = None;
        self.history.clear();
        self.tracker.reset();
        self.pending = None;

        let _ = self.event_tx.send(PlayerEvent::ReturnedHome);
    }

    /// Report the playback position; returns the transition if the active
    /// line changed.
    pub fn time_update(&mut self, current_time: f64) -> Option<Transition> {
        let transition = self.tracker.update(current_time)?;

        let _ = self.event_tx.send(PlayerEvent::LineChanged {
            transition,
            time: current_time,
        });

        Some(transition)
    }

    /// Seek target for a picked line.
    ///
    /// Returns the line's time, or `None` if there is no such line. The
    /// active line is left alone until the next time update.
    pub fn seek_to_line(&mut self, index: usize) -> Option<f64> {
        let time = self.tracker.track()?.get(index)?.time;

        debug!(target: LOG_TARGET, "Seek to line {} at {:.2}s", index, time);
        let _ = self.event_tx.send(PlayerEvent::SeekRequested { index, time });

        Some(time)
    }

    #[must_use]
    pub const fn current_song(&self) -> Option<&Song> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// Whether nothing is selected (initial state or after going home)
    #[must_use]
    pub const fn is_home(&self) -> bool {
        self.current.is_none()
    }

    /// Request currently awaiting its lyrics, if any
    #[must_use]
    pub const fn pending_request(&self) -> Option<RequestToken> {
        self.pending
    }

    #[must_use]
    pub const fn tracker(&self) -> &LineTracker {
        &self.tracker
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}
