//! Capped exponential backoff with jitter.

use std::thread::sleep;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

use crate::error::Result;

/// Retry schedule for transient API failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay before the given retry (1-based), doubling per attempt and
    /// saturating so worst-case waits stay bounded.
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let base = self.base_delay.as_millis().max(1) as u64;
        let exponent = attempt.saturating_sub(1).min(6) as u32;
        Duration::from_millis(base.saturating_mul(1u64 << exponent))
    }

    /// Run `operation`, retrying retryable failures with backoff plus
    /// jitter. Non-retryable errors and exhausted attempts surface as-is.
    pub fn run<T>(&self, label: &str, mut operation: impl FnMut() -> Result<T>) -> Result<T> {
        let mut attempt = 0usize;
        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(error) => {
                    attempt += 1;
                    if attempt >= self.max_attempts || !error.is_retryable() {
                        return Err(error);
                    }
                    let base = self.base_delay.as_millis().max(1) as u64;
                    let jitter = rand::thread_rng().gen_range(0..=base);
                    let delay = self.delay_for_attempt(attempt) + Duration::from_millis(jitter);
                    warn!(
                        label = %label,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "transient failure, retrying"
                    );
                    sleep(delay);
                }
            }
        }
    }
}
