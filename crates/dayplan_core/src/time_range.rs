//! Clock parsing and formatting on a minute timeline.
//!
//! Minutes count from midnight of the first planned day, so values past
//! `1440` belong to later days.

use regex::Regex;
use std::sync::LazyLock;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

static RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,2}):([0-9]{2})\s*-\s*([0-9]{1,2}):([0-9]{2})")
        .expect("range pattern is valid")
});

static CLOCK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{1,2}):([0-9]{2})$").expect("clock pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinuteRange {
    pub start: u32,
    pub end: u32,
}

/// Finds the first `H:MM - H:MM` range anywhere in `text`.
///
/// Empty and inverted ranges are rejected rather than clamped.
pub fn parse_range(text: &str) -> Option<MinuteRange> {
    let captures = RANGE_PATTERN.captures(text)?;
    let start = hhmm_to_minutes(&captures[1], &captures[2])?;
    let end = hhmm_to_minutes(&captures[3], &captures[4])?;
    if end <= start {
        return None;
    }
    Some(MinuteRange { start, end })
}

/// Strict `H:MM` / `HH:MM` parse.
pub fn try_parse_time(hhmm: &str) -> Option<u32> {
    let captures = CLOCK_PATTERN.captures(hhmm)?;
    hhmm_to_minutes(&captures[1], &captures[2])
}

/// Like [`try_parse_time`], but malformed input reads as midnight.
pub fn parse_time(hhmm: &str) -> u32 {
    match try_parse_time(hhmm) {
        Some(minutes) => minutes,
        None => {
            tracing::warn!(value = hhmm, "malformed clock string, using 00:00");
            0
        }
    }
}

/// Renders minutes as `HH:MM` without wrapping hours, so `1500` is `25:00`.
pub fn format_minutes(total_minutes: u32) -> String {
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

/// Renders the clock time of day for a point on a multi-day timeline.
pub fn minutes_to_time(total_minutes: u32) -> String {
    format_minutes(total_minutes % MINUTES_PER_DAY)
}

/// Zero-based day index of a point on the timeline.
pub fn day_of(total_minutes: u32) -> u32 {
    total_minutes / MINUTES_PER_DAY
}

fn hhmm_to_minutes(hours: &str, minutes: &str) -> Option<u32> {
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    Some(hours * 60 + minutes)
}

#[cfg(test)]
mod tests {
    use super::{
        MinuteRange, day_of, format_minutes, minutes_to_time, parse_range, parse_time,
        try_parse_time,
    };

    #[test]
    fn parse_range_reads_padded_range() {
        assert_eq!(
            parse_range("09:00 - 10:30"),
            Some(MinuteRange {
                start: 540,
                end: 630
            })
        );
    }

    #[test]
    fn parse_range_finds_range_inside_text() {
        assert_eq!(
            parse_range("Zahnarzt 8:15-9:00 mitbringen"),
            Some(MinuteRange {
                start: 495,
                end: 540
            })
        );
    }

    #[test]
    fn parse_range_uses_first_match() {
        let range = parse_range("10:00 - 11:00, 14:00 - 15:00").unwrap();
        assert_eq!((range.start, range.end), (600, 660));
    }

    #[test]
    fn parse_range_only_reads_ascii_digits() {
        let range = parse_range("١٠:٠٠ - ١١:٠٠ then 09:00 - 10:00").unwrap();
        assert_eq!((range.start, range.end), (540, 600));
        assert_eq!(try_parse_time("٠٩:٣٠"), None);
    }

    #[test]
    fn parse_range_rejects_missing_and_inverted() {
        assert_eq!(parse_range("no time here"), None);
        assert_eq!(parse_range("10:00 - 09:00"), None);
        assert_eq!(parse_range("10:00 - 10:00"), None);
        assert_eq!(parse_range(""), None);
    }

    #[test]
    fn try_parse_time_is_strict() {
        assert_eq!(try_parse_time("08:00"), Some(480));
        assert_eq!(try_parse_time("8:05"), Some(485));
        assert_eq!(try_parse_time("08:0"), None);
        assert_eq!(try_parse_time(" 08:00"), None);
        assert_eq!(try_parse_time("08:00 - 09:00"), None);
    }

    #[test]
    fn parse_time_falls_back_to_midnight() {
        assert_eq!(parse_time("17:30"), 1050);
        assert_eq!(parse_time("half past five"), 0);
    }

    #[test]
    fn format_minutes_keeps_hours_unbounded() {
        assert_eq!(format_minutes(0), "00:00");
        assert_eq!(format_minutes(545), "09:05");
        assert_eq!(format_minutes(1500), "25:00");
    }

    #[test]
    fn minutes_to_time_wraps_to_clock_of_day() {
        assert_eq!(minutes_to_time(1500), "01:00");
        assert_eq!(minutes_to_time(2 * 1440 + 750), "12:30");
        assert_eq!(day_of(2 * 1440 + 750), 2);
        assert_eq!(day_of(1439), 0);
    }
}
