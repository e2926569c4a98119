//! Centralized retry policy for remote calls.
//!
//! Every remote-call wrapper in the engine goes through one [`RetryPolicy`]
//! so transient-failure behavior is uniform and testable in one place rather
//! than scattered per call site. Only errors classified as transient are
//! retried; permanent failures propagate immediately.

use std::time::Duration;

use tokio::time::sleep;

use crate::{config::SyncConfig, error::SyncError};

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_retries: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        RetryPolicy { max_retries, delay }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        RetryPolicy {
            max_retries: config.max_retries,
            delay: config.retry_delay,
        }
    }

    /// Runs `op`, retrying transient failures up to `max_retries` times with
    /// a fixed delay between attempts. The last error is returned once the
    /// attempts are exhausted.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, SyncError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SyncError>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    sleep(self.delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
