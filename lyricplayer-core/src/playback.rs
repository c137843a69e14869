use crate::lrc::LyricTrack;
use crate::time::SecondsExt;
use crate::tracker::Transition;
use std::sync::Arc;
use std::time::Instant;

/// Source of the current playback position.
///
/// Implemented by whatever actually plays the audio. Positions are seconds
/// from the start of the track; they increase during playback and may jump
/// backward after a seek.
pub trait PlaybackClock {
    /// Current playback position in seconds
    fn current_time(&self) -> f64;

    /// Move playback to `time` seconds.
    ///
    /// The active line is not updated here; the next scheduled time update
    /// picks up the new position.
    fn seek_to(&mut self, time: f64);
}

/// Receiver of lyric display changes.
pub trait DisplayAdapter {
    /// A new track is ready to be shown. No line is active yet.
    fn lyrics_loaded(&mut self, track: &Arc<LyricTrack>);

    /// The song has no usable lyrics
    fn lyrics_unavailable(&mut self);

    /// The active line changed. Lines before `transition.current` are passed,
    /// the line at it is active, all others are upcoming.
    fn line_changed(&mut self, transition: &Transition);

    /// Nothing is loaded anymore (returned home)
    fn cleared(&mut self);
}

/// Simulated media element clock.
///
/// Tracks a position anchor and interpolates from it while playing, the same
/// way a media element advances `currentTime` between time updates.
#[derive(Debug, Clone)]
pub struct MediaClock {
    /// Position at the last anchor
    position: f64,
    /// Total media duration, if known
    duration: Option<f64>,
    is_playing: bool,
    /// When `position` was anchored (for interpolation)
    updated_at: Instant,
}

impl Default for MediaClock {
    fn default() -> Self {
        Self {
            position: 0.0,
            duration: None,
            is_playing: false,
            updated_at: Instant::now(),
        }
    }
}

impl MediaClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load new media: paused at the start with an optional known duration
    pub fn load(&mut self, duration: Option<f64>) {
        self.duration = duration.map(SecondsExt::sanitize);
        self.is_playing = false;
        self.anchor(0.0);
    }

    /// Stop and forget the loaded media
    pub fn unload(&mut self) {
        self.load(None);
    }

    pub fn play(&mut self) {
        if !self.is_playing {
            self.anchor(self.position);
            self.is_playing = true;
        }
    }

    pub fn pause(&mut self) {
        if self.is_playing {
            let position = self.interpolated_position();
            self.is_playing = false;
            self.anchor(position);
        }
    }

    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.is_playing
    }

    #[must_use]
    pub const fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Whether playback reached the end of media with a known duration
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.duration
            .is_some_and(|duration| self.interpolated_position() >= duration)
    }

    /// Get interpolated position based on time elapsed since the last anchor
    #[must_use]
    pub fn interpolated_position(&self) -> f64 {
        if !self.is_playing {
            return self.position;
        }

        let interpolated = self.position + self.updated_at.elapsed().as_secs_f64();
        self.clamp(interpolated)
    }

    fn anchor(&mut self, position: f64) {
        self.position = position;
        self.updated_at = Instant::now();
    }

    fn clamp(&self, position: f64) -> f64 {
        let position = position.sanitize();
        match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        }
    }
}

impl PlaybackClock for MediaClock {
    fn current_time(&self) -> f64 {
        self.interpolated_position()
    }

    fn seek_to(&mut self, time: f64) {
        let time = self.clamp(time);
        self.anchor(time);
    }
}
