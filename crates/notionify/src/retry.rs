//! Fixed-delay retry
//!
//! Every remote call goes through [`RetryPolicy::run`]. All errors are retried
//! the same way; once attempts run out the last error is returned unchanged.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::error::Result;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Pause between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Run `op` until it succeeds or the attempt budget is spent.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(operation, attempt, "succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) if attempt < attempts => {
                    warn!(
                        operation,
                        attempt,
                        max_attempts = attempts,
                        error = %err,
                        "attempt failed, retrying in {:?}",
                        self.delay
                    );
                    if !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                    attempt += 1;
                }
                Err(err) => {
                    error!(operation, attempts, error = %err, "giving up");
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotionError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn api_error(n: u32) -> NotionError {
        NotionError::Api {
            status: 502,
            code: "bad_gateway".to_string(),
            message: format!("failure {}", n),
        }
    }

    #[tokio::test]
    async fn test_succeeds_on_third_attempt() {
        let calls = &AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::ZERO);

        let result = policy
            .run("flaky", move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(api_error(n))
                } else {
                    Ok(n)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_last_error() {
        let calls = &AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::ZERO);

        let result: Result<()> = policy
            .run("broken", move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Err(api_error(n))
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match result.unwrap_err() {
            NotionError::Api { status, message, .. } => {
                assert_eq!(status, 502);
                assert_eq!(message, "failure 3");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let calls = &AtomicU32::new(0);
        let policy = RetryPolicy::new(0, Duration::ZERO);

        let _ = policy
            .run("once", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(api_error(1))
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_fixed_delay_between_attempts() {
        let policy = RetryPolicy::default();
        let start = tokio::time::Instant::now();

        let _ = policy
            .run("slow", || async { Err::<(), _>(api_error(0)) })
            .await;

        // two pauses of 5s between three attempts, no backoff growth
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(10));
        assert!(elapsed < Duration::from_secs(11));
    }
}
