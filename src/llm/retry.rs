//! Bounded retry with exponential backoff.

use std::time::Duration;

/// How many extra attempts a transient failure earns, and how long to wait
/// before each. Delays double per retry: `base`, `2 * base`, `4 * base`...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

/// Ceiling on any single backoff delay.
const MAX_DELAY: Duration = Duration::from_secs(30);

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self { max_retries, base_delay }
    }

    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self { max_retries: 0, base_delay: Duration::ZERO }
    }

    /// Delay before retry number `attempt + 1` (zero-based `attempt`).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(MAX_DELAY)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 1, base_delay: Duration::from_millis(500) }
    }
}
