//! Time and position conversion utilities.
//!
//! Playback positions are carried as `f64` seconds, the unit media clocks
//! report. This module keeps the lossy conversions in one place with explicit
//! clamping behavior.

/// Extension trait for playback positions expressed in seconds.
pub trait SecondsExt {
    /// Format as `mm:ss.cc` for display, truncating to whole centiseconds.
    ///
    /// Minutes are not wrapped, so positions past an hour render as `61:02.50`.
    /// Negative and non-finite values render as `00:00.00`.
    fn to_timestamp(self) -> String;

    /// Whole centiseconds, truncated. Negative and non-finite values give 0.
    fn to_centiseconds(self) -> u64;

    /// Clamp to a valid clock position: NaN and negative values become `0.0`.
    #[must_use]
    fn sanitize(self) -> Self;
}

impl SecondsExt for f64 {
    fn to_timestamp(self) -> String {
        let total_centis = self.to_centiseconds();
        let minutes = total_centis / 6000;
        let seconds = (total_centis / 100) % 60;
        let centis = total_centis % 100;

        format!("{minutes:02}:{seconds:02}.{centis:02}")
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn to_centiseconds(self) -> u64 {
        let secs = self.sanitize();
        if !secs.is_finite() {
            return 0;
        }
        // Nudge before flooring so that 3.07 (stored as 3.0699999...) stays 307.
        (secs * 100.0 + 1e-6).floor() as u64
    }

    fn sanitize(self) -> Self {
        if self.is_nan() || self < 0.0 {
            0.0
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_timestamp_basic() {
        assert_eq!(12.34_f64.to_timestamp(), "00:12.34");
    }

    #[test]
    fn test_to_timestamp_with_minutes() {
        assert_eq!(125.5_f64.to_timestamp(), "02:05.50");
    }

    #[test]
    fn test_to_timestamp_zero() {
        assert_eq!(0.0_f64.to_timestamp(), "00:00.00");
    }

    #[test]
    fn test_to_timestamp_truncates_sub_centisecond() {
        assert_eq!(3.079_f64.to_timestamp(), "00:03.07");
        assert_eq!(3.07_f64.to_timestamp(), "00:03.07");
    }

    #[test]
    fn test_to_timestamp_long_duration() {
        assert_eq!(3662.5_f64.to_timestamp(), "61:02.50");
    }

    #[test]
    fn test_to_timestamp_invalid_values() {
        assert_eq!((-4.0_f64).to_timestamp(), "00:00.00");
        assert_eq!(f64::NAN.to_timestamp(), "00:00.00");
        assert_eq!(f64::INFINITY.to_timestamp(), "00:00.00");
    }

    #[test]
    fn test_to_centiseconds() {
        assert_eq!(3.07_f64.to_centiseconds(), 307);
        assert_eq!(6039.99_f64.to_centiseconds(), 603_999);
        assert_eq!((-1.0_f64).to_centiseconds(), 0);
        assert_eq!(f64::INFINITY.to_centiseconds(), 0);
    }

    #[test]
    fn test_sanitize() {
        assert!((2.5_f64.sanitize() - 2.5).abs() < f64::EPSILON);
        assert!(f64::NAN.sanitize().abs() < f64::EPSILON);
        assert!((-1.0_f64).sanitize().abs() < f64::EPSILON);
    }
}
