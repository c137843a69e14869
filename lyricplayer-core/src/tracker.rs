//! Active-line tracking against a playback clock.

use crate::lrc::{LyricLine, LyricTrack};
use std::sync::Arc;
use tracing::trace;

const LOG_TARGET: &str = "lyricplayer::tracker";

/// A change of the active line.
///
/// `None` means no line is active: playback is before the first timestamp,
/// or the track is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub previous: Option<usize>,
    pub current: Option<usize>,
}

/// Display state of a single line relative to the active one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    /// Before the active line
    Passed,
    Active,
    /// After the active line, or any line while none is active
    Upcoming,
}

impl Transition {
    /// Classify the line at `index` after this transition
    #[must_use]
    pub fn line_state(&self, index: usize) -> LineState {
        LineState::classify(self.current, index)
    }

    /// Whether playback moved to an earlier line (a backward seek)
    #[must_use]
    pub fn is_backward(&self) -> bool {
        match (self.previous, self.current) {
            (Some(prev), Some(cur)) => cur < prev,
            (Some(_), None) => true,
            _ => false,
        }
    }
}

impl LineState {
    /// Classify the line at `index` when `active` is the active line
    #[must_use]
    pub fn classify(active: Option<usize>, index: usize) -> Self {
        match active {
            Some(active) if index < active => Self::Passed,
            Some(active) if index == active => Self::Active,
            _ => Self::Upcoming,
        }
    }
}

/// Tracks which lyric line is active as playback time is reported.
///
/// Each [`update`](Self::update) recomputes the active line from scratch, so
/// seeks in either direction need no special handling. A [`Transition`] is
/// only reported when the active line actually changes.
#[derive(Debug, Default)]
pub struct LineTracker {
    track: Option<Arc<LyricTrack>>,
    active: Option<usize>,
}

impl LineTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the track and forget the active line
    pub fn load(&mut self, track: Arc<LyricTrack>) {
        self.track = Some(track);
        self.active = None;
    }

    /// Clear the track and the active line (song change or return home)
    pub fn reset(&mut self) {
        self.track = None;
        self.active = None;
    }

    /// Recompute the active line for `current_time` seconds.
    ///
    /// Returns a transition only if the active line differs from the one
    /// computed by the previous call.
    pub fn update(&mut self, current_time: f64) -> Option<Transition> {
        let current = self
            .track
            .as_deref()
            .and_then(|track| track.line_index_at(current_time));

        if current == self.active {
            return None;
        }

        let transition = Transition {
            previous: self.active,
            current,
        };
        self.active = current;

        trace!(
            target: LOG_TARGET,
            "Active line {:?} -> {:?} at {:.2}s",
            transition.previous,
            transition.current,
            current_time
        );

        Some(transition)
    }

    #[must_use]
    pub const fn active_index(&self) -> Option<usize> {
        self.active
    }

    #[must_use]
    pub fn active_line(&self) -> Option<&LyricLine> {
        let index = self.active?;
        self.track.as_deref()?.get(index)
    }

    #[must_use]
    pub fn track(&self) -> Option<&Arc<LyricTrack>> {
        self.track.as_ref()
    }
}
