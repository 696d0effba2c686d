//! Bounded retry with doubling backoff, shared by the fetcher and notifier.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::config::Config;

/// Bounded retry policy: a fixed number of attempts with doubling delay.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy with explicit attempts and base delay.
    pub fn new(attempts: u32, base_delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            base_delay,
        }
    }

    /// Build the policy from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.retry_attempts,
            Duration::from_secs(config.retry_base_delay_secs),
        )
    }

    /// Delay slept after the given 1-based attempt fails: base * 2^(attempt-1).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }

    /// Run `op` up to `attempts` times. Intermediate failures are logged and
    /// slept over; the final attempt's error propagates.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut op: F) -> Result<T, E>
    where
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.attempts => {
                    let delay = self.delay_after(attempt);
                    warn!(
                        attempt,
                        max_attempts = self.attempts,
                        delay_secs = delay.as_secs(),
                        "{label} failed: {e}, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_double_from_base() {
        let policy = RetryPolicy::new(4, Duration::from_secs(3));
        assert_eq!(policy.delay_after(1), Duration::from_secs(3));
        assert_eq!(policy.delay_after(2), Duration::from_secs(6));
        assert_eq!(policy.delay_after(3), Duration::from_secs(12));
    }

    #[test]
    fn attempts_clamped_to_one() {
        let policy = RetryPolicy::new(0, Duration::from_secs(3));
        assert_eq!(policy.attempts, 1);
    }

    #[tokio::test]
    async fn succeeds_without_retrying() {
        let policy = RetryPolicy::new(4, Duration::from_millis(1));
        let mut calls = 0u32;
        let result: Result<u32, String> = policy
            .run("test", || {
                calls += 1;
                async { Ok(42) }
            })
            .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn retries_until_success() {
        let policy = RetryPolicy::new(4, Duration::from_millis(1));
        let mut calls = 0u32;
        let result: Result<u32, String> = policy
            .run("test", || {
                calls += 1;
                let attempt = calls;
                async move {
                    if attempt < 3 {
                        Err("transient".to_string())
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn final_failure_propagates() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let mut calls = 0u32;
        let result: Result<u32, String> = policy
            .run("test", || {
                calls += 1;
                async { Err("down".to_string()) }
            })
            .await;
        assert_eq!(result.unwrap_err(), "down");
        assert_eq!(calls, 3);
    }
}
