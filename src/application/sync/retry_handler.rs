//! Retry handler for block-level operations

use std::future::Future;
use tokio::time::{sleep, Duration};

use crate::utils::logging;

/// Retries an operation a bounded number of times with a linearly growing delay
#[derive(Debug, Clone)]
pub struct RetryHandler {
    max_attempts: u32,
    base_delay_ms: u64,
}

impl RetryHandler {
    pub fn new() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
        }
    }

    pub fn with_config(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay_ms,
        }
    }

    /// Execute an operation, logging each failed attempt under `stream`
    pub async fn execute_with_retry_and_logging<F, Fut, T, E>(
        &self,
        operation: F,
        operation_name: &str,
        stream: &str,
    ) -> Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;
            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        logging::log_info(&format!(
                            "[{}] {} succeeded on attempt {}",
                            stream, operation_name, attempt
                        ));
                    }
                    return Ok(result);
                }
                Err(e) => {
                    if attempt >= self.max_attempts {
                        logging::log_error(&format!(
                            "[{}] ❌ {} failed after {} attempts: {}",
                            stream, operation_name, self.max_attempts, e
                        ));
                        return Err(e);
                    }

                    let delay = self.calculate_delay(attempt);
                    logging::log_warning(&format!(
                        "[{}] {} failed (attempt {}/{}): {}. Retrying in {}ms",
                        stream, operation_name, attempt, self.max_attempts, e, delay
                    ));

                    sleep(Duration::from_millis(delay)).await;
                }
            }
        }
    }

    /// Delay after the given failed attempt: `base * attempt`
    fn calculate_delay(&self, attempt: u32) -> u64 {
        self.base_delay_ms.saturating_mul(attempt as u64)
    }
}

impl Default for RetryHandler {
    fn default() -> Self {
        Self::new()
    }
}
