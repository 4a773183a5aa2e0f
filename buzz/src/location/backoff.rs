//! Exponential retry backoff for failed location sends.
//!
//! The delay starts at `initial`, doubles after every scheduled retry and is
//! capped at `max`. Any successful send resets it to `initial`.
//!
//! ```text
//! failure 1 -> 5s, failure 2 -> 10s, failure 3 -> 20s, ... -> 60s, 60s
//! ```

use std::time::Duration;

/// Default initial retry delay (5 seconds).
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 5_000;

/// Default maximum retry delay (60 seconds).
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 60_000;

/// Backoff counter for the send retry timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_INITIAL_BACKOFF_MS),
            Duration::from_millis(DEFAULT_MAX_BACKOFF_MS),
        )
    }
}

impl Backoff {
    /// Create a backoff starting at `initial` and capped at `max`.
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            current: initial,
        }
    }

    /// The delay the next retry would use, without advancing.
    pub fn peek(&self) -> Duration {
        self.current.min(self.max)
    }

    /// Take the delay for the retry being scheduled now and double the
    /// delay for the next one.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.peek();
        self.current = delay.saturating_mul(2).min(self.max);
        delay
    }

    /// Reset to the initial delay.
    pub fn reset(&mut self) {
        self.current = self.initial;
    }

    /// The configured initial delay.
    pub fn initial(&self) -> Duration {
        self.initial
    }

    /// The configured maximum delay.
    pub fn max(&self) -> Duration {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_values() {
        let backoff = Backoff::default();
        assert_eq!(backoff.initial(), Duration::from_secs(5));
        assert_eq!(backoff.max(), Duration::from_secs(60));
        assert_eq!(backoff.peek(), Duration::from_secs(5));
    }

    #[test]
    fn test_doubles_until_capped() {
        let mut backoff = Backoff::default();

        let delays: Vec<u64> = (0..6).map(|_| backoff.next_delay().as_secs()).collect();
        assert_eq!(delays, vec![5, 10, 20, 40, 60, 60]);
    }

    #[test]
    fn test_reset_returns_to_initial() {
        let mut backoff = Backoff::default();
        backoff.next_delay();
        backoff.next_delay();
        assert_eq!(backoff.peek(), Duration::from_secs(20));

        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_secs(5));
    }

    #[test]
    fn test_initial_above_max_is_capped() {
        let mut backoff = Backoff::new(Duration::from_secs(90), Duration::from_secs(60));
        assert_eq!(backoff.next_delay(), Duration::from_secs(60));
        assert_eq!(backoff.next_delay(), Duration::from_secs(60));
    }

    proptest! {
        #[test]
        fn prop_nth_delay_matches_formula(
            initial_ms in 1u64..10_000,
            max_ms in 1u64..120_000,
            n in 1u32..20,
        ) {
            let mut backoff = Backoff::new(
                Duration::from_millis(initial_ms),
                Duration::from_millis(max_ms),
            );

            let mut delay = Duration::ZERO;
            for _ in 0..n {
                delay = backoff.next_delay();
            }

            let expected = initial_ms
                .saturating_mul(2u64.saturating_pow(n - 1))
                .min(max_ms);
            prop_assert_eq!(delay, Duration::from_millis(expected));
        }
    }
}
