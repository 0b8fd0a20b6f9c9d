//! Bounded retry shared by the probe, upload and delete paths.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// How often an operation is attempted and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub attempts: u32,

    /// Base for the jittered exponential backoff. Zero disables sleeping.
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Same attempt count, no sleeping between attempts.
    pub fn immediate(attempts: u32) -> Self {
        Self {
            attempts,
            base_backoff: Duration::ZERO,
        }
    }

    fn backoff(&self, retry: u32) -> Duration {
        if self.base_backoff.is_zero() {
            return Duration::ZERO;
        }
        let base = self
            .base_backoff
            .saturating_mul(1 << retry.min(16))
            .min(MAX_BACKOFF);
        let jittered_ms = rand::thread_rng().gen_range(0..=base.as_millis() as u64);
        Duration::from_millis(jittered_ms.max(10))
    }
}

/// Classifier verdict for one attempt.
#[derive(Debug)]
pub enum Attempt<T, E> {
    /// Stop retrying with this value.
    Done(T),
    /// Try again; the error is returned if no attempts remain.
    Retry(E),
}

/// Run `op` until `classify` says [`Attempt::Done`] or the attempts run out.
///
/// Returns the last [`Attempt::Retry`] error on exhaustion.
pub async fn retry_with<T, E, R, Op, Fut, C>(
    policy: &RetryPolicy,
    mut op: Op,
    mut classify: C,
) -> Result<T, E>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = R>,
    C: FnMut(R) -> Attempt<T, E>,
    E: std::fmt::Display,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        match classify(op().await) {
            Attempt::Done(value) => return Ok(value),
            Attempt::Retry(e) if attempt < attempts => {
                let backoff = policy.backoff(attempt);
                warn!(
                    error = %e,
                    attempt = attempt,
                    max_attempts = attempts,
                    backoff_ms = backoff.as_millis(),
                    "retrying request"
                );
                if !backoff.is_zero() {
                    tokio::time::sleep(backoff).await;
                }
            }
            Attempt::Retry(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_stops_on_first_done() {
        let calls = Cell::new(0);
        let result: Result<u32, String> = retry_with(
            &RetryPolicy::immediate(3),
            || {
                calls.set(calls.get() + 1);
                async { 7 }
            },
            Attempt::Done,
        )
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_last_error() {
        let calls = Cell::new(0);
        let result: Result<(), String> = retry_with(
            &RetryPolicy::immediate(3),
            || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move { n }
            },
            |n| Attempt::Retry(format!("failure {}", n)),
        )
        .await;

        assert_eq!(result.unwrap_err(), "failure 3");
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failures() {
        let calls = Cell::new(0);
        let result: Result<&str, String> = retry_with(
            &RetryPolicy::immediate(3),
            || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move { n }
            },
            |n| {
                if n < 3 {
                    Attempt::Retry("flaky".to_string())
                } else {
                    Attempt::Done("ok")
                }
            },
        )
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let calls = Cell::new(0);
        let result: Result<(), &str> = retry_with(
            &RetryPolicy::immediate(0),
            || {
                calls.set(calls.get() + 1);
                async {}
            },
            |_| Attempt::Retry("nope"),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_backoff_is_capped_and_jittered() {
        let policy = RetryPolicy {
            attempts: 3,
            base_backoff: Duration::from_secs(20),
        };
        for retry in 1..5 {
            assert!(policy.backoff(retry) <= MAX_BACKOFF);
        }
        assert_eq!(RetryPolicy::immediate(3).backoff(2), Duration::ZERO);
        assert_eq!(RetryPolicy::default().attempts, 3);
    }
}
