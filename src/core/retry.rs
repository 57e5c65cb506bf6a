//! Retry policy for transient request failures

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backoff policy consumed by the API client.
///
/// `max_attempts` counts all attempts including the first; the delay before
/// retry `n` is `base_delay_ms * multiplier^(n-1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempt ceiling, first attempt included
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds
    pub base_delay_ms: u64,
    /// Factor applied to the delay on each further retry
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// Delay before the given retry, with retries numbered from 1
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1);
        Duration::from_millis(self.base_delay_ms * u64::from(self.multiplier).pow(exponent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_doubles_per_retry() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(4000));
    }

    #[test]
    fn test_custom_multiplier() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay_ms: 250,
            multiplier: 3,
        };

        assert_eq!(policy.delay_for(1), Duration::from_millis(250));
        assert_eq!(policy.delay_for(2), Duration::from_millis(750));
        assert_eq!(policy.delay_for(3), Duration::from_millis(2250));
    }
}
