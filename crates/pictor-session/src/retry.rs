//! Retry policy for the status poll loop.

use std::time::Duration;

/// Bounded retry policy with per-attempt backoff.
///
/// The attempt cap is the sole bound on how long the session waits for the
/// remote service; there is no independent wall-clock timeout. The backoff
/// between attempts grows linearly with the attempt number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
}

impl Default for RetryPolicy {
    /// Five attempts, 500ms initial backoff.
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Set the maximum number of attempts.
    ///
    /// A cap of zero is clamped to one; the loop always issues at least one
    /// status request unless cancelled first.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the backoff applied after the first failed attempt.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Maximum number of attempts.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Backoff to wait after the given attempt (1-based) fails.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.initial_delay * attempt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(3), Duration::from_millis(1500));
    }

    #[test]
    fn test_zero_attempts_clamped() {
        let policy = RetryPolicy::default().with_max_attempts(0);
        assert_eq!(policy.max_attempts(), 1);
    }
}
