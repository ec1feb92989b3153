use std::time::Duration;

use crate::config::BackoffConfig;

/// Exponential backoff between failed exports, doubling from `base_delay`
/// up to `max_delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl From<&BackoffConfig> for RetryPolicy {
    fn from(cfg: &BackoffConfig) -> Self {
        Self {
            base_delay: Duration::from_secs(cfg.base_seconds),
            max_delay: Duration::from_secs(cfg.max_seconds),
        }
    }
}

impl RetryPolicy {
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exp = 2u64.saturating_pow(attempt);
        let delay_ms = (self.base_delay.as_millis() as u64).saturating_mul(exp);
        Duration::from_millis(delay_ms).min(self.max_delay)
    }
}
