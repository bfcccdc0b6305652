//! Retry helpers for outbound Bot API calls.
//!
//! Delivery to a user is retried at most once, and only when the transport
//! tells us how long to back off (flood control). Everything else is reported
//! back to the caller on the first failure.

use std::future::Future;
use std::time::Duration;

/// Determines if an error is retryable.
pub trait Retryable {
    /// Returns true if the error should be retried.
    fn is_retryable(&self) -> bool;

    /// Returns an optional hint for retry delay (e.g., from rate limit responses).
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl Retryable for teloxide::RequestError {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            teloxide::RequestError::Network(_) | teloxide::RequestError::Io(_) | teloxide::RequestError::RetryAfter(_)
        )
    }

    fn retry_after(&self) -> Option<Duration> {
        if let teloxide::RequestError::RetryAfter(seconds) = self {
            Some(seconds.duration())
        } else {
            None
        }
    }
}

/// Result of a retried operation.
#[derive(Debug)]
pub struct RetryResult<T, E> {
    /// The final result (success or last error)
    pub result: Result<T, E>,
    /// Number of attempts made (1 or 2)
    pub attempts: u32,
}

impl<T, E> RetryResult<T, E> {
    /// Returns true if the operation succeeded.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs `operation`; if it fails with a retryable error carrying a back-off
/// hint, sleeps for that long and runs it exactly once more.
pub async fn retry_once_after_hint<F, Fut, T, E>(mut operation: F) -> RetryResult<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Debug,
{
    match operation().await {
        Ok(value) => RetryResult {
            result: Ok(value),
            attempts: 1,
        },
        Err(e) => match e.retry_after() {
            Some(delay) if e.is_retryable() => {
                log::warn!("Rate limited, retrying once in {:?}: {:?}", delay, e);
                tokio::time::sleep(delay).await;
                RetryResult {
                    result: operation().await,
                    attempts: 2,
                }
            }
            _ => RetryResult {
                result: Err(e),
                attempts: 1,
            },
        },
    }
}
