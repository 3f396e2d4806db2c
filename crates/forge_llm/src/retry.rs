//! Retry policy for backend calls.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{LlmError, LlmResult};

/// Exponential-backoff retry schedule for transient backend failures.
///
/// Only [`LlmError::Transient`] is retried; configuration and terminal
/// errors propagate on the first attempt.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(2000),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Delay to sleep after the given 1-based attempt fails.
    pub fn delay_after_attempt(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt.saturating_sub(1) as i32);
        self.initial_delay.mul_f64(factor)
    }

    /// Run `operation` until it succeeds, fails terminally, or attempts run
    /// out. Returns the last error on exhaustion.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> LlmResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = LlmResult<T>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    let delay = self.delay_after_attempt(attempt);
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        retry_in_ms = delay.as_millis() as u64,
                        error = %err,
                        "backend call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
