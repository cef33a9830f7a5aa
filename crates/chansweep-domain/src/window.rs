//! Activity window - the fixed "recent" threshold for one run

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Default lookback, in days
pub const DEFAULT_LOOKBACK_DAYS: u64 = 14;

/// Threshold timestamp separating recent activity from old activity
///
/// Computed once per run and held fixed for every upstream query and every
/// comparison in that run, so all evidence streams agree on what "recent"
/// means.
///
/// # Examples
///
/// ```
/// use chansweep_domain::ActivityWindow;
/// use std::time::Duration;
///
/// let window = ActivityWindow::ending_at(1_000_000, Duration::from_secs(14 * 86_400));
/// assert_eq!(window.since(), 1_000_000 - 14 * 86_400);
/// assert!(window.is_fresh(window.since() + 1));
/// assert!(!window.is_fresh(window.since()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActivityWindow {
    since: u64,
}

impl ActivityWindow {
    /// Window starting at an explicit unix timestamp
    pub const fn starting_at(since: u64) -> Self {
        Self { since }
    }

    /// Window covering `lookback` before `now` (unix seconds)
    pub fn ending_at(now: u64, lookback: Duration) -> Self {
        Self {
            since: now.saturating_sub(lookback.as_secs()),
        }
    }

    /// Window covering `lookback` before the current wall-clock time
    pub fn from_now(lookback: Duration) -> Self {
        Self::ending_at(unix_now(), lookback)
    }

    /// The default two-week window ending at `now`
    pub fn two_weeks_before(now: u64) -> Self {
        Self::ending_at(now, Duration::from_secs(DEFAULT_LOOKBACK_DAYS * 86_400))
    }

    /// Threshold timestamp (unix seconds)
    pub fn since(&self) -> u64 {
        self.since
    }

    /// Whether a timestamp lies strictly after the threshold
    pub fn is_fresh(&self, timestamp: u64) -> bool {
        timestamp > self.since
    }
}

/// Current time in seconds since the Unix epoch (0 if the clock is before it)
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_weeks() {
        let window = ActivityWindow::two_weeks_before(10_000_000);
        assert_eq!(window.since(), 10_000_000 - 1_209_600);
    }

    #[test]
    fn test_saturates_at_epoch() {
        let window = ActivityWindow::ending_at(5, Duration::from_secs(100));
        assert_eq!(window.since(), 0);
    }

    #[test]
    fn test_from_now_is_in_the_past() {
        let window = ActivityWindow::from_now(Duration::from_secs(60));
        assert!(window.since() < unix_now());
    }
}
