use std::time::Duration;

/// Bounded retry with exponential backoff for transient inference failures.
///
/// `max_attempts` counts the first call; `1` disables retrying.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration
}

impl RetryPolicy {
    /// Delay before the attempt following `attempt` (1-based): `backoff * 2^(attempt - 1)`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.backoff.saturating_mul(1 << exponent)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::from_millis(100)
        }
    }
}
