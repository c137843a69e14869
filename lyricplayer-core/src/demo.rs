//! Demonstration lyrics shown when a song's lyrics cannot be retrieved.

use crate::lrc::{LyricLine, LyricTrack};

const DEMO_LINES: [(f64, &str); 8] = [
    (0.0, "🎵 Synchronized lyrics example"),
    (3.0, "This is the first line"),
    (6.0, "Here comes the second line"),
    (9.0, "And on to the third"),
    (12.0, "The rhythm keeps going"),
    (15.0, "With more lyrics to come"),
    (18.0, "The music never stops"),
    (21.0, "Until the end of the song"),
];

/// The fixed demonstration track, one line every three seconds
#[must_use]
pub fn demo_track() -> LyricTrack {
    DEMO_LINES
        .iter()
        .map(|&(time, text)| LyricLine::new(time, text))
        .collect::<Vec<_>>()
        .into()
}
