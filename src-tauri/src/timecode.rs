//! Timestamp parsing and rendering.
//!
//! Timer records use `HH:MM:SS.mmm`; SRT cues use `HH:MM:SS,mmm`. Both parse
//! to seconds since midnight as `f64`. Input is matched exactly, so callers
//! trim user-typed text themselves.

use chrono::{NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::TimeFormatError;

pub const ZERO_TIMESTAMP: &str = "00:00:00.000";

const MICROS_PER_DAY: i64 = 86_400 * 1_000_000;

static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2})[.,](\d{3})$").expect("timestamp pattern is valid")
});

struct Fields {
    hours: u32,
    minutes: u32,
    seconds: u32,
    millis: u32,
}

fn invalid(input: &str) -> TimeFormatError {
    TimeFormatError::InvalidTimeFormat(input.to_string())
}

fn split(input: &str) -> Result<Fields, TimeFormatError> {
    let caps = TIMESTAMP_RE
        .captures(input)
        .ok_or_else(|| invalid(input))?;
    let field = |i: usize| caps[i].parse::<u32>().map_err(|_| invalid(input));

    let fields = Fields {
        hours: field(1)?,
        minutes: field(2)?,
        seconds: field(3)?,
        millis: field(4)?,
    };

    // Values are seconds since midnight, so the clock fields must be in range.
    if fields.hours >= 24 || fields.minutes >= 60 || fields.seconds >= 60 {
        return Err(invalid(input));
    }

    Ok(fields)
}

/// Parses `HH:MM:SS.mmm` or `HH:MM:SS,mmm` into seconds since midnight.
pub fn parse(input: &str) -> Result<f64, TimeFormatError> {
    let f = split(input)?;
    let whole = f.hours * 3600 + f.minutes * 60 + f.seconds;
    Ok(f64::from(whole) + f64::from(f.millis) / 1000.0)
}

pub fn parse_time_of_day(input: &str) -> Result<NaiveTime, TimeFormatError> {
    let f = split(input)?;
    NaiveTime::from_hms_milli_opt(f.hours, f.minutes, f.seconds, f.millis)
        .ok_or_else(|| invalid(input))
}

/// Renders seconds since midnight as `HH:MM:SS.mmm`, wrapping into a single
/// day and truncating to the millisecond.
pub fn format(seconds: f64) -> String {
    let micros = (seconds * 1_000_000.0).round() as i64;
    render(micros.rem_euclid(MICROS_PER_DAY) / 1000)
}

/// Renders an elapsed duration. Hours are not wrapped.
pub fn format_duration(elapsed_ms: f64) -> String {
    let micros = (elapsed_ms * 1000.0).round() as i64;
    render(micros.max(0) / 1000)
}

pub fn format_time_of_day(time: NaiveTime) -> String {
    let millis = i64::from(time.num_seconds_from_midnight()) * 1000
        + i64::from((time.nanosecond() / 1_000_000).min(999));
    render(millis)
}

fn render(total_ms: i64) -> String {
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}.{ms:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_separators() {
        assert_eq!(parse("00:00:01.500").unwrap(), 1.5);
        assert_eq!(parse("00:00:01,500").unwrap(), 1.5);
        assert_eq!(parse("01:30:00,000").unwrap(), 5400.0);
        assert_eq!(parse("00:01:30.000").unwrap(), 90.0);
    }

    #[test]
    fn surrounding_whitespace_is_not_a_timestamp() {
        for padded in [" 00:01:30.000", "00:01:30.000 ", "\t00:01:30,000\n"] {
            assert_eq!(
                parse(padded),
                Err(TimeFormatError::InvalidTimeFormat(padded.to_string()))
            );
            assert!(parse_time_of_day(padded).is_err());
        }
    }

    #[test]
    fn rejects_malformed_timestamps() {
        for bad in [
            "",
            "bad",
            "0:00:01.000",
            "00:00:01",
            "00:00:01.5",
            "00:00:01.5000",
            "00:00:01;000",
            "00-00-01.000",
            "00:60:00.000",
            "00:00:60.000",
            "24:00:00.000",
            "00:00:01.000 --> 00:00:02.000",
        ] {
            assert_eq!(
                parse(bad),
                Err(TimeFormatError::InvalidTimeFormat(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn format_round_trips_to_the_millisecond() {
        for input in [
            "00:00:00.000",
            "00:00:01.001",
            "00:59:59.999",
            "12:34:56.789",
            "23:59:59.999",
            "07:08:09,010",
        ] {
            let seconds = parse(input).unwrap();
            assert_eq!(parse(&format(seconds)).unwrap(), seconds, "{input}");
        }
    }

    #[test]
    fn format_truncates_and_wraps() {
        assert_eq!(format(1.0009), "00:00:01.000");
        assert_eq!(format(86_400.0 + 61.25), "00:01:01.250");
        assert_eq!(format(-1.0), "23:59:59.000");
    }

    #[test]
    fn format_duration_keeps_hours() {
        assert_eq!(format_duration(0.0), ZERO_TIMESTAMP);
        assert_eq!(format_duration(1234.9), "00:00:01.234");
        assert_eq!(format_duration(25.0 * 3_600_000.0), "25:00:00.000");
        assert_eq!(format_duration(-5.0), ZERO_TIMESTAMP);
    }

    #[test]
    fn time_of_day_matches_seconds_form() {
        let time = parse_time_of_day("10:15:30,250").unwrap();
        assert_eq!(format_time_of_day(time), "10:15:30.250");
        assert_eq!(format_time_of_day(time), format(parse("10:15:30.250").unwrap()));
    }
}
