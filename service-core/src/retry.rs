//! Retry support for outbound HTTP calls to upstream APIs.
//!
//! Only transient upstream statuses (429 and 5xx) are retried. Transport
//! failures, timeouts included, surface immediately so a slow upstream does
//! not multiply the caller's wait.

use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// Backoff before the first retry; doubles on each subsequent one.
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_backoff: Duration::from_millis(400),
        }
    }
}

impl RetryPolicy {
    pub fn with_base_backoff(base_backoff: Duration) -> Self {
        Self {
            base_backoff,
            ..Default::default()
        }
    }

    pub fn backoff_duration(&self, attempt: u32) -> Duration {
        self.base_backoff * 2u32.saturating_pow(attempt)
    }
}

/// Whether a response status is worth retrying.
pub fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Executes `f` until it yields a non-retryable status or the policy is
/// exhausted. The final response is returned regardless of its status; the
/// caller decides how to map it.
pub async fn send_with_retry<F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    f: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut attempt: u32 = 0;
    loop {
        let response = f().await?;
        let status = response.status();

        if is_retryable(status) && attempt < policy.max_retries {
            let backoff = policy.backoff_duration(attempt);
            warn!(
                operation,
                attempt = attempt + 1,
                status = status.as_u16(),
                backoff_ms = backoff.as_millis() as u64,
                "Upstream returned retryable status, backing off"
            );
            sleep(backoff).await;
            attempt += 1;
            continue;
        }

        if attempt > 0 {
            if status.is_success() {
                info!(
                    operation,
                    attempts = attempt + 1,
                    "Upstream call succeeded after retry"
                );
            } else {
                warn!(
                    operation,
                    attempts = attempt + 1,
                    status = status.as_u16(),
                    "Upstream call still failing after retries"
                );
            }
        }

        return Ok(response);
    }
}
