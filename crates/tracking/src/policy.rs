//! Retry policy for the assignment poll loop.
//!
//! The default reproduces the dispatch flow as it has always behaved: a
//! fixed 2 second pause between lookups, no attempt cap, and service
//! failures treated exactly like "not assigned yet". Callers that want a
//! bounded wait opt into a cap, a failure budget, or exponential backoff.

use std::time::Duration;

/// Pause between lookups when no backoff is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Exponential backoff parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Backoff {
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each unanswered lookup.
    pub multiplier: f64,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Delay after the first unanswered lookup. Constant unless
    /// `backoff` is set.
    pub interval: Duration,
    pub backoff: Option<Backoff>,
    /// Give up after this many lookups. `None` polls until cancelled.
    pub max_attempts: Option<u32>,
    /// Give up after this many consecutive *failed* lookups (5xx or
    /// unreachable). Pending answers reset the count. `None` never
    /// gives up on failures.
    pub max_consecutive_failures: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(DEFAULT_POLL_INTERVAL)
    }
}

impl RetryPolicy {
    /// Constant `interval`, unbounded.
    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            backoff: None,
            max_attempts: None,
            max_consecutive_failures: None,
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = Some(backoff);
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_max_consecutive_failures(mut self, failures: u32) -> Self {
        self.max_consecutive_failures = Some(failures);
        self
    }

    /// Delay to use after `current`.
    ///
    /// Without backoff this is always `interval`; with backoff the delay
    /// grows by the multiplier and is clamped to `max_delay`.
    pub fn next_delay(&self, current: Duration) -> Duration {
        match &self.backoff {
            None => self.interval,
            Some(backoff) => {
                let next_ms = (current.as_millis() as f64 * backoff.multiplier) as u64;
                Duration::from_millis(next_ms).min(backoff.max_delay)
            }
        }
    }

    pub fn attempts_exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }

    pub fn failures_exhausted(&self, consecutive_failures: u32) -> bool {
        self.max_consecutive_failures
            .is_some_and(|max| consecutive_failures >= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fixed_two_seconds_unbounded() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.interval, Duration::from_secs(2));
        assert_eq!(policy.next_delay(Duration::from_secs(2)), Duration::from_secs(2));
        assert!(!policy.attempts_exhausted(u32::MAX));
        assert!(!policy.failures_exhausted(u32::MAX));
    }

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy::fixed(Duration::from_secs(1)).with_backoff(Backoff::default());
        assert_eq!(policy.next_delay(Duration::from_secs(1)), Duration::from_secs(2));
    }

    #[test]
    fn backoff_clamps_at_max() {
        let policy = RetryPolicy::fixed(Duration::from_secs(1)).with_backoff(Backoff {
            max_delay: Duration::from_secs(10),
            ..Default::default()
        });
        assert_eq!(policy.next_delay(Duration::from_secs(8)), Duration::from_secs(10));
    }

    #[test]
    fn full_backoff_sequence() {
        let policy = RetryPolicy::fixed(Duration::from_secs(1)).with_backoff(Backoff::default());
        let mut delay = policy.interval;
        let expected = [1, 2, 4, 8, 16, 30, 30, 30];

        for &expected_secs in &expected {
            assert_eq!(delay.as_secs(), expected_secs);
            delay = policy.next_delay(delay);
        }
    }

    #[test]
    fn caps() {
        let policy = RetryPolicy::default()
            .with_max_attempts(3)
            .with_max_consecutive_failures(2);
        assert!(!policy.attempts_exhausted(2));
        assert!(policy.attempts_exhausted(3));
        assert!(!policy.failures_exhausted(1));
        assert!(policy.failures_exhausted(2));
    }
}
