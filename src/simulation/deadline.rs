use std::time::Instant;
use chrono::Duration;

/// End of a time-boxed fault window, measured on the monotonic clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deadline {
    At(Instant),
    /// The window ends past anything the monotonic clock can represent
    Never,
}

impl Deadline {
    /// Deadline `duration` after `now`. A zero or negative duration has already passed at `now`.
    pub fn after(now: Instant, duration: Duration) -> Self {
        match duration.to_std() {
            Ok(window) => now.checked_add(window).map_or(Deadline::Never, Deadline::At),
            Err(_) => Deadline::At(now),
        }
    }

    pub fn has_passed(&self, now: Instant) -> bool {
        match self {
            Deadline::At(at) => now >= *at,
            Deadline::Never => false,
        }
    }

    /// Time left at `now`, or `None` for a window that never closes.
    pub fn remaining(&self, now: Instant) -> Option<std::time::Duration> {
        match self {
            Deadline::At(at) => Some(at.saturating_duration_since(now)),
            Deadline::Never => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_closes_at_the_deadline() {
        let t0 = Instant::now();
        let deadline = Deadline::after(t0, Duration::seconds(10));
        assert!(!deadline.has_passed(t0));
        assert!(!deadline.has_passed(t0 + std::time::Duration::from_secs(9)));
        assert!(deadline.has_passed(t0 + std::time::Duration::from_secs(10)));
        assert_eq!(deadline.remaining(t0), Some(std::time::Duration::from_secs(10)));
    }

    #[test]
    fn zero_and_negative_windows_are_already_closed() {
        let t0 = Instant::now();
        assert!(Deadline::after(t0, Duration::zero()).has_passed(t0));
        assert!(Deadline::after(t0, Duration::seconds(-5)).has_passed(t0));
    }

    #[test]
    fn oversized_window_does_not_overflow() {
        let t0 = Instant::now();
        for duration in [Duration::weeks(100_000_000), Duration::MAX] {
            let deadline = Deadline::after(t0, duration);
            assert!(!deadline.has_passed(t0 + std::time::Duration::from_secs(3_600 * 24 * 365)));
        }
    }
}
