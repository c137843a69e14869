use lyricplayer_core::{
    DisplayAdapter, LineState, LyricLine, LyricTrack, SecondsExt, Song, Transition,
};
use std::io::{self, Write};
use std::sync::Arc;

/// Lines shown above the active one
const LINES_BEFORE: usize = 2;
/// Lines shown below the active one
const LINES_AFTER: usize = 3;

/// Prints lyric changes to a terminal.
///
/// Only a window of lines around the active one is printed on each change,
/// marked as passed, active or upcoming.
pub struct TerminalDisplay<W: Write> {
    out: W,
    track: Option<Arc<LyricTrack>>,
}

impl<W: Write> TerminalDisplay<W> {
    pub const fn new(out: W) -> Self {
        Self { out, track: None }
    }

    /// Announce the song that just became current
    pub fn now_playing(&mut self, song: &Song, can_go_back: bool) {
        self.track = None;
        let back_hint = if can_go_back { "  (prev to go back)" } else { "" };
        let _ = writeln!(
            self.out,
            "\n♪ Now playing: {} - {}{back_hint}",
            song.title, song.artist
        );
        let _ = writeln!(self.out, "  Loading lyrics...");
        let _ = self.out.flush();
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplayAdapter for TerminalDisplay<W> {
    fn lyrics_loaded(&mut self, track: &Arc<LyricTrack>) {
        self.track = Some(Arc::clone(track));
        let _ = writeln!(self.out, "  {} lyric lines", track.len());

        let (start, lines) = track.visible_lines(None, LINES_BEFORE, LINES_AFTER);
        let _ = render_lines(&mut self.out, start, lines, None);
        let _ = self.out.flush();
    }

    fn lyrics_unavailable(&mut self) {
        self.track = None;
        let _ = writeln!(self.out, "  🎵 No lyrics available");
        let _ = self.out.flush();
    }

    fn line_changed(&mut self, transition: &Transition) {
        let Some(track) = &self.track else {
            return;
        };

        let (start, lines) = track.visible_lines(transition.current, LINES_BEFORE, LINES_AFTER);
        let _ = writeln!(self.out);
        let _ = render_lines(&mut self.out, start, lines, transition.current);
        let _ = self.out.flush();
    }

    fn cleared(&mut self) {
        self.track = None;
        let _ = writeln!(self.out, "\n🎵 Select a song to see its lyrics");
        let _ = self.out.flush();
    }
}

/// Print `lines` (the first of which is line `start` of its track) with
/// their state markers and 1-based line numbers.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn render_lines<W: Write + ?Sized>(
    out: &mut W,
    start: usize,
    lines: &[LyricLine],
    active: Option<usize>,
) -> io::Result<()> {
    for (offset, line) in lines.iter().enumerate() {
        let index = start + offset;
        let marker = match LineState::classify(active, index) {
            LineState::Passed => ' ',
            LineState::Active => '▶',
            LineState::Upcoming => '·',
        };
        writeln!(
            out,
            "{marker} {:>3}  [{}]  {}",
            index + 1,
            line.time.to_timestamp(),
            line.text
        )?;
    }
    Ok(())
}
