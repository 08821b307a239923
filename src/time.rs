// Time utility functions

use crate::error::{self, CacheError};
use crate::Error;
use crate::Result;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::time::{Duration, Instant};

/// Monotonic clock used by time based validators. Injectable so tests can
/// move time forward without sleeping.
pub type Clock = fn() -> Instant;

pub fn now() -> Instant {
    Instant::now()
}

enum Time {
    Second,
    Minute,
    Hour,
    Day,
}

impl Time {
    fn to_seconds(&self) -> u64 {
        match self {
            Time::Second => 1,
            Time::Minute => 60,
            Time::Hour => 3600,
            Time::Day => 86400,
        }
    }
}

impl TryFrom<&str> for Time {
    type Error = Error;

    fn try_from(unit: &str) -> std::result::Result<Self, Self::Error> {
        match unit {
            "" | "s" | "sec" | "secs" | "second" | "seconds" => Ok(Time::Second),
            "m" | "min" | "mins" | "minute" | "minutes" => Ok(Time::Minute),
            "h" | "hr" | "hrs" | "hour" | "hours" => Ok(Time::Hour),
            "d" | "day" | "days" => Ok(Time::Day),
            _ => Err(error::gen(format!(
                "Unknown time unit: {unit} - valid units are s, m, h, d"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Seconds(u64);

impl Seconds {
    pub fn new(seconds: u64) -> Self {
        Seconds(seconds)
    }
}

impl Deref for Seconds {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Seconds {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Seconds> for Duration {
    fn from(seconds: Seconds) -> Self {
        Duration::from_secs(seconds.0)
    }
}

/// Convert a string with time format to seconds.
/// A string with time format is a number followed by an optional unit:
/// 1s, 2s, 2 seconds, 2 second, 2seconds, 2second, 2 s, 2 sec
/// The same would apply for minutes, hours and days. A bare number is
/// seconds. Anything after the unit, like the `30m` in `1h30m`, is an error.
fn string_to_seconds(str_fmt: &str) -> Result<Seconds> {
    let trimmed = str_fmt.trim();
    let unit_start = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(unit_start);
    if digits.is_empty() {
        return Err(error::gen(format!("Missing time value in: {str_fmt:?}")));
    }
    let value: u64 = digits
        .parse()
        .map_err(|_| error::gen(format!("Time value too large: {str_fmt}")))?;
    let time = Time::try_from(unit.trim_start())?;
    value
        .checked_mul(time.to_seconds())
        .map(Seconds)
        .ok_or_else(|| error::gen(format!("Time value too large: {str_fmt}")))
}

impl TryFrom<&str> for Seconds {
    type Error = CacheError;

    fn try_from(str_fmt: &str) -> std::result::Result<Self, Self::Error> {
        match string_to_seconds(str_fmt) {
            Ok(seconds) => Ok(seconds),
            Err(err) => Err(CacheError::TimeConversionError(format!(
                "Could not convert {str_fmt} to time format: {err}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatted_string_to_seconds() {
        let test_table = vec![
            ("1s", Seconds(1)),
            ("2 seconds", Seconds(2)),
            ("2second", Seconds(2)),
            ("2 s", Seconds(2)),
            ("1m", Seconds(60)),
            ("2 minutes", Seconds(120)),
            ("1h", Seconds(3600)),
            ("2hours", Seconds(7200)),
            ("1d", Seconds(86400)),
            ("2 day", Seconds(172800)),
            ("2 sec", Seconds(2)),
            ("3 mins", Seconds(180)),
            ("1hr", Seconds(3600)),
            // If no time format is specified, it defaults to seconds
            ("300", Seconds(300)),
            (" 45 ", Seconds(45)),
        ];
        for (input, expected) in test_table {
            let actual = string_to_seconds(input).unwrap();
            assert_eq!(expected.0, actual.0);
        }
    }

    #[test]
    fn test_cannot_convert_time_formatted_string_to_seconds() {
        let input_err = "2x"; // user meant 2d and typed 2x
        match Seconds::try_from(input_err) {
            Err(CacheError::TimeConversionError(_)) => (),
            _ => panic!("Expected TimeConversionError"),
        }
    }

    #[test]
    fn test_malformed_time_strings_are_errors() {
        let test_table = vec![
            // milliseconds are not a supported unit, not 500 minutes
            "500ms",
            // compound durations are not supported, not 1 hour
            "1h30m",
            "",
            "   ",
            "m",
            "5 fortnights",
            "10 minutes ago",
        ];
        for input in test_table {
            match Seconds::try_from(input) {
                Err(CacheError::TimeConversionError(_)) => (),
                other => panic!("Expected TimeConversionError for {input:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_overflowing_time_is_error() {
        assert!(string_to_seconds("99999999999999999999d").is_err());
    }

    #[test]
    fn test_seconds_into_duration() {
        let duration: Duration = Seconds::new(90).into();
        assert_eq!(Duration::from_secs(90), duration);
    }
}
