//! Interval timers for the dashboard refresh loops.
//!
//! The host drives time (a browser interval or a native loop); a
//! [`PollTimer`] only answers whether a feed is due for another fetch.

use std::time::Duration;
use web_time::Instant;

/// Tracks when a feed was last fetched and whether it is due again.
#[derive(Debug, Clone)]
pub struct PollTimer {
    /// Feed name, for logging
    name: &'static str,
    interval: Duration,
    last_fired: Option<Instant>,
}

impl PollTimer {
    /// Default refresh interval for backend data (5 minutes).
    pub const DASHBOARD_INTERVAL: Duration = Duration::from_secs(5 * 60);

    /// Default refresh interval for weather data (30 minutes).
    pub const WEATHER_INTERVAL: Duration = Duration::from_secs(30 * 60);

    pub fn new(name: &'static str, interval: Duration) -> Self {
        Self {
            name,
            interval,
            last_fired: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a fetch is due at `now`. A timer that never fired is due.
    pub fn is_due_at(&self, now: Instant) -> bool {
        match self.last_fired {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    pub fn is_due(&self) -> bool {
        self.is_due_at(Instant::now())
    }

    /// Record that a fetch started at `now`.
    pub fn mark_fired_at(&mut self, now: Instant) {
        self.last_fired = Some(now);
        log::trace!("Poll '{}': fired", self.name);
    }

    pub fn mark_fired(&mut self) {
        self.mark_fired_at(Instant::now());
    }

    /// Time left until the next fetch is due, zero when already due.
    pub fn remaining_at(&self, now: Instant) -> Duration {
        match self.last_fired {
            None => Duration::ZERO,
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
        }
    }

    /// Force the next check to report due (e.g. after the inputs changed).
    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_fired_is_due() {
        let timer = PollTimer::new("dashboard", PollTimer::DASHBOARD_INTERVAL);
        assert!(timer.is_due());
        assert_eq!(timer.remaining_at(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn test_not_due_before_interval() {
        let mut timer = PollTimer::new("weather", Duration::from_secs(60));
        let start = Instant::now();
        timer.mark_fired_at(start);

        assert!(!timer.is_due_at(start + Duration::from_secs(59)));
        assert!(timer.is_due_at(start + Duration::from_secs(60)));
        assert_eq!(
            timer.remaining_at(start + Duration::from_secs(20)),
            Duration::from_secs(40)
        );
    }

    #[test]
    fn test_reset_makes_due() {
        let mut timer = PollTimer::new("dashboard", Duration::from_secs(300));
        timer.mark_fired();
        assert!(!timer.is_due());
        timer.reset();
        assert!(timer.is_due());
    }
}
