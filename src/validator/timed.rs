use std::time::{Duration, Instant};

use crate::error::CacheError;
use crate::time::{self, Clock, Seconds};
use crate::validator::Validator;

/// Refreshes once more than `window` has elapsed since the last fetch.
/// Before the first fetch it is always stale.
#[derive(Debug, Clone)]
pub struct TimedWindow {
    last_fetch: Option<Instant>,
    window: Duration,
    now: Clock,
}

impl TimedWindow {
    pub fn new(window: Duration) -> Self {
        Self {
            last_fetch: None,
            window,
            now: time::now,
        }
    }

    pub fn with_clock(self, now: Clock) -> Self {
        Self { now, ..self }
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl TryFrom<&str> for TimedWindow {
    type Error = CacheError;

    /// Accepts the same formats as [`Seconds`], e.g. `"30s"` or `"5 minutes"`.
    fn try_from(window: &str) -> Result<Self, Self::Error> {
        let seconds = Seconds::try_from(window)?;
        Ok(TimedWindow::new(seconds.into()))
    }
}

impl Validator for TimedWindow {
    fn should_fetch(&mut self) -> bool {
        match self.last_fetch {
            Some(last_fetch) => (self.now)().saturating_duration_since(last_fetch) > self.window,
            None => true,
        }
    }

    fn on_fetch(&mut self) {
        self.last_fetch = Some((self.now)());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::fake_clock;

    #[test]
    fn test_timed_window_stale_before_first_fetch() {
        let mut validator = TimedWindow::new(Duration::from_secs(3600));
        assert!(validator.should_fetch());
    }

    #[test]
    fn test_timed_window_fresh_within_window() {
        let mut validator =
            TimedWindow::new(Duration::from_secs(60)).with_clock(fake_clock::now);
        validator.on_fetch();
        assert!(!validator.should_fetch());
        fake_clock::advance(Duration::from_secs(60));
        // exactly at the boundary it is still fresh
        assert!(!validator.should_fetch());
        fake_clock::advance(Duration::from_secs(1));
        assert!(validator.should_fetch());
        validator.on_fetch();
        assert!(!validator.should_fetch());
    }

    #[test]
    fn test_timed_window_from_time_string() {
        let validator = TimedWindow::try_from("5m").unwrap();
        assert_eq!(Duration::from_secs(300), validator.window());
    }

    #[test]
    fn test_timed_window_rejects_milliseconds() {
        assert!(TimedWindow::try_from("500ms").is_err());
    }

    #[test]
    fn test_timed_window_from_bad_time_string() {
        match TimedWindow::try_from("5 fortnights") {
            Err(CacheError::TimeConversionError(_)) => (),
            _ => panic!("Expected TimeConversionError"),
        }
    }
}
