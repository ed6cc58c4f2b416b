//! Poll cadence with exponential backoff on failures.

use std::time::Duration;

use tracing::debug;

/// Tracks consecutive fetch failures and the wait before the next poll.
#[derive(Debug)]
pub struct Backoff {
    /// Consecutive failure count.
    consecutive_failures: u32,
    /// Current wait before the next poll.
    current: Duration,
    /// Regular poll interval.
    base_interval: Duration,
    /// Upper bound for `current`.
    max_backoff: Duration,
}

impl Backoff {
    pub fn new(base_interval: Duration, max_backoff: Duration) -> Self {
        Self {
            consecutive_failures: 0,
            current: base_interval,
            base_interval,
            max_backoff: max_backoff.max(base_interval),
        }
    }

    /// A poll succeeded: return to the regular interval.
    pub fn record_success(&mut self) {
        if self.consecutive_failures > 0 {
            debug!(
                failures = self.consecutive_failures,
                "fetch recovered, resetting poll interval"
            );
        }
        self.consecutive_failures = 0;
        self.current = self.base_interval;
    }

    /// A poll failed: double the wait up to the maximum.
    pub fn record_failure(&mut self) {
        self.consecutive_failures += 1;
        self.current = self.current.saturating_mul(2).min(self.max_backoff);
    }

    /// Wait before the next poll.
    pub fn next_interval(&self) -> Duration {
        self.current
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_base_interval() {
        let backoff = Backoff::new(Duration::from_secs(2), Duration::from_secs(60));
        assert_eq!(backoff.next_interval(), Duration::from_secs(2));
        assert_eq!(backoff.consecutive_failures(), 0);
    }

    #[test]
    fn each_failure_doubles() {
        let mut backoff = Backoff::new(Duration::from_secs(1), Duration::from_secs(60));

        backoff.record_failure();
        assert_eq!(backoff.next_interval(), Duration::from_secs(2));
        backoff.record_failure();
        assert_eq!(backoff.next_interval(), Duration::from_secs(4));
        backoff.record_failure();
        assert_eq!(backoff.next_interval(), Duration::from_secs(8));
        assert_eq!(backoff.consecutive_failures(), 3);
    }

    #[test]
    fn caps_at_max() {
        let mut backoff = Backoff::new(Duration::from_secs(1), Duration::from_secs(60));
        for _ in 0..10 {
            backoff.record_failure();
        }
        // 1 → 2 → 4 → 8 → 16 → 32 → 60 → 60 → 60 → 60
        assert_eq!(backoff.next_interval(), Duration::from_secs(60));
    }

    #[test]
    fn huge_cap_saturates_instead_of_overflowing() {
        let cap = Duration::from_secs(u64::MAX);
        let mut backoff = Backoff::new(Duration::from_secs(2), cap);
        for _ in 0..70 {
            backoff.record_failure();
        }
        assert_eq!(backoff.next_interval(), cap);
        assert_eq!(backoff.consecutive_failures(), 70);
    }

    #[test]
    fn resets_on_success() {
        let mut backoff = Backoff::new(Duration::from_secs(2), Duration::from_secs(60));
        backoff.record_failure();
        backoff.record_failure();
        assert_eq!(backoff.next_interval(), Duration::from_secs(8));

        backoff.record_success();
        assert_eq!(backoff.next_interval(), Duration::from_secs(2));
        assert_eq!(backoff.consecutive_failures(), 0);
    }

    #[test]
    fn max_below_base_never_shortens_the_interval() {
        let mut backoff = Backoff::new(Duration::from_secs(10), Duration::from_secs(1));
        backoff.record_failure();
        assert_eq!(backoff.next_interval(), Duration::from_secs(10));
    }
}
