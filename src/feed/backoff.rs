//! Exponential reconnect delay.

use std::time::Duration;

/// Delay before the first reconnect attempt.
pub const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Upper bound on the delay between reconnect attempts.
pub const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// Computes `min(max, initial * 2^retries)` and counts attempts.
///
/// The retry counter keeps growing without bound; only the delay is capped.
#[derive(Clone, Debug)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    retries: u32,
}

impl Backoff {
    #[must_use]
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            retries: 0,
        }
    }

    /// Returns the delay for the next attempt and bumps the retry counter.
    pub fn next_delay(&mut self) -> Duration {
        let factor = 2u32.checked_pow(self.retries).unwrap_or(u32::MAX);
        let delay = self
            .initial
            .checked_mul(factor)
            .map_or(self.max, |d| d.min(self.max));
        self.retries = self.retries.saturating_add(1);
        delay
    }

    /// Called after a connection opens successfully.
    pub fn reset(&mut self) {
        self.retries = 0;
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(INITIAL_BACKOFF, MAX_BACKOFF)
    }
}
