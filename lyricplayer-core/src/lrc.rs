use crate::time::SecondsExt;

/// Byte length of a `[mm:ss.cc]` timestamp tag.
const TIMESTAMP_LEN: usize = 10;

/// Largest value of a two-digit tag field.
const MAX_FIELD: u64 = 99;

/// A single line of lyrics with timing
#[derive(Debug, Clone, PartialEq)]
pub struct LyricLine {
    /// Seconds from the start of the track
    pub time: f64,
    pub text: String,
}

impl LyricLine {
    pub fn new(time: f64, text: impl Into<String>) -> Self {
        Self {
            time,
            text: text.into(),
        }
    }
}

/// Parsed lyrics for one song, sorted by time.
///
/// Lines with equal timestamps keep the order they had in the source text.
/// An empty track is valid and means no lyrics are available.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LyricTrack {
    lines: Vec<LyricLine>,
}

impl LyricTrack {
    /// Parse timestamped lyric text into a track.
    ///
    /// Every line is searched for its first `[mm:ss.cc]` tag (two ASCII digits
    /// per field). The text after the tag, trimmed, becomes the lyric. Lines
    /// without a tag or with blank text are skipped, so metadata tags such as
    /// `[ti:Title]` and garbage never fail the parse.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let lines = input
            .split('\n')
            .filter_map(parse_lyric_line)
            .collect::<Vec<_>>();

        Self::from(lines)
    }

    #[must_use]
    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LyricLine> {
        self.lines.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LyricLine> {
        self.lines.iter()
    }

    /// Find the index of the line active at `position` seconds.
    ///
    /// This is the last line whose time is at or before `position`. Returns
    /// `None` before the first line, for an empty track, and for NaN.
    #[must_use]
    pub fn line_index_at(&self, position: f64) -> Option<usize> {
        // Sorted by time, so the lines at or before `position` form a prefix.
        let count = self.lines.partition_point(|line| line.time <= position);
        count.checked_sub(1)
    }

    /// Get lines around `center` for display, with the index of the first one.
    ///
    /// With no center the window starts at the first line.
    #[must_use]
    pub fn visible_lines(
        &self,
        center: Option<usize>,
        before: usize,
        after: usize,
    ) -> (usize, &[LyricLine]) {
        let center = center.unwrap_or(0);
        let start = center.saturating_sub(before).min(self.lines.len());
        let end = center
            .saturating_add(after)
            .saturating_add(1)
            .min(self.lines.len());

        (start, &self.lines[start..end])
    }

    /// Serialize back to `[mm:ss.cc]text` lines.
    ///
    /// Every time the parser can produce is written as a tag it accepts again,
    /// so parsing the output yields the same track.
    #[must_use]
    pub fn to_lrc_string(&self) -> String {
        use std::fmt::Write;

        let mut output = String::new();
        for line in &self.lines {
            let _ = writeln!(output, "[{}]{}", lrc_tag(line.time), line.text);
        }
        output
    }
}

impl From<Vec<LyricLine>> for LyricTrack {
    fn from(mut lines: Vec<LyricLine>) -> Self {
        // `sort_by` is stable: equal timestamps keep their input order
        lines.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { lines }
    }
}

impl<'a> IntoIterator for &'a LyricTrack {
    type Item = &'a LyricLine;
    type IntoIter = std::slice::Iter<'a, LyricLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Format `time` as the inside of a `[mm:ss.cc]` tag.
///
/// Minutes stop at 99; past that the seconds field carries the rest, the way
/// `[99:99.99]` encodes 6039.99 s. Times beyond that cannot be written in two
/// digits per field.
fn lrc_tag(time: f64) -> String {
    let total_centis = time.to_centiseconds();
    let minutes = (total_centis / 6000).min(MAX_FIELD);
    let seconds = (total_centis - minutes * 6000) / 100;
    let centis = total_centis % 100;

    format!("{minutes:02}:{seconds:02}.{centis:02}")
}

/// Parse a lyric line like `[00:12.34]Hello world`.
///
/// The tag may appear anywhere in the line; the first valid one wins and
/// everything after it up to a line terminator is the text.
fn parse_lyric_line(line: &str) -> Option<LyricLine> {
    let (time, rest) = find_timestamp(line)?;

    let text = rest
        .split(['\r', '\u{2028}', '\u{2029}'])
        .next()
        .unwrap_or_default()
        .trim();

    if text.is_empty() {
        return None;
    }

    Some(LyricLine::new(time, text))
}

/// Locate the first `[mm:ss.cc]` tag and return its time and the text after it.
fn find_timestamp(line: &str) -> Option<(f64, &str)> {
    let bytes = line.as_bytes();

    line.match_indices('[').find_map(|(start, _)| {
        let time = bytes
            .get(start + 1..start + TIMESTAMP_LEN)
            .and_then(parse_timestamp)?;
        // The tag ends in ASCII `]`, so this is a char boundary.
        Some((time, &line[start + TIMESTAMP_LEN..]))
    })
}

/// Parse the bytes after `[` in a tag: `mm:ss.cc]`
fn parse_timestamp(tag: &[u8]) -> Option<f64> {
    let &[m1, m2, b':', s1, s2, b'.', c1, c2, b']'] = tag else {
        return None;
    };

    let minutes = two_digits(m1, m2)?;
    let seconds = two_digits(s1, s2)?;
    let centis = two_digits(c1, c2)?;

    Some(f64::from(minutes * 60 + seconds) + f64::from(centis) / 100.0)
}

fn two_digits(tens: u8, ones: u8) -> Option<u32> {
    (tens.is_ascii_digit() && ones.is_ascii_digit())
        .then(|| u32::from(tens - b'0') * 10 + u32::from(ones - b'0'))
}
