// In crates/market-data/src/retry.rs

use crate::error::{Error, Result};
use app_config::ProviderSettings;
use std::future::Future;
use std::time::Duration;

/// Bounded linear-backoff policy shared by every provider request.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// How many retries after the first attempt.
    pub max_retries: u32,
    /// Backoff base; the delay before retry `n` is `base * n`.
    pub base: Duration,
    /// Upper bound on any single delay.
    pub cap: Duration,
}

impl RetryPolicy {
    pub fn from_settings(settings: &ProviderSettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            base: Duration::from_secs(settings.backoff_base_secs),
            cap: Duration::from_secs(settings.backoff_cap_secs),
        }
    }

    /// Delay before the given retry (1-based), linear and capped.
    pub fn delay(&self, attempt: u32) -> Duration {
        (self.base * attempt).min(self.cap)
    }
}

/// Runs one fetch attempt through the retry policy.
///
/// Retries only errors classified transient by [`Error::is_retryable`]; once
/// the budget is spent the last error is wrapped in `RetriesExhausted` so the
/// caller sees both the operation and the cause. Non-retryable errors
/// (malformed payloads, provider rejections) surface immediately.
pub async fn fetch_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &'static str,
    mut attempt_fn: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match attempt_fn().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt <= policy.max_retries => {
                let delay = policy.delay(attempt);
                tracing::warn!(
                    operation = %operation,
                    attempt = attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Transient fetch failure, backing off"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) if err.is_retryable() => {
                return Err(Error::RetriesExhausted {
                    operation,
                    attempts: attempt,
                    source: Box::new(err),
                });
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            base: Duration::from_millis(1),
            cap: Duration::from_millis(2),
        }
    }

    #[test]
    fn delay_is_linear_until_the_cap() {
        let policy = RetryPolicy {
            max_retries: 5,
            base: Duration::from_secs(2),
            cap: Duration::from_secs(10),
        };
        assert_eq!(policy.delay(1), Duration::from_secs(2));
        assert_eq!(policy.delay(3), Duration::from_secs(6));
        assert_eq!(policy.delay(5), Duration::from_secs(10));
        assert_eq!(policy.delay(9), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn transient_failures_are_retried_until_success() {
        let calls = Cell::new(0u32);
        let result = fetch_with_retry(&policy(), "test", || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move {
                if n < 3 {
                    Err(Error::Status {
                        status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                    })
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn budget_exhaustion_wraps_the_last_error() {
        let calls = Cell::new(0u32);
        let result: Result<()> = fetch_with_retry(&policy(), "test", || {
            calls.set(calls.get() + 1);
            async {
                Err(Error::Status {
                    status: reqwest::StatusCode::TOO_MANY_REQUESTS,
                })
            }
        })
        .await;
        // 1 initial attempt + 3 retries.
        assert_eq!(calls.get(), 4);
        assert!(matches!(
            result,
            Err(Error::RetriesExhausted { attempts: 4, .. })
        ));
    }

    #[tokio::test]
    async fn data_shape_errors_are_not_retried() {
        let calls = Cell::new(0u32);
        let result: Result<()> = fetch_with_retry(&policy(), "test", || {
            calls.set(calls.get() + 1);
            async {
                Err(Error::DataShape {
                    context: "bad payload".into(),
                })
            }
        })
        .await;
        assert_eq!(calls.get(), 1);
        assert!(matches!(result, Err(Error::DataShape { .. })));
    }
}
