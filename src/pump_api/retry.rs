//! Fetch with a fixed retry budget
//!
//! A request is retried on transport failure or non-success status, waiting
//! a fixed delay between attempts. No backoff, no jitter.

use reqwest::{RequestBuilder, Response};
use std::time::Duration;
use tokio_retry::{strategy::FixedInterval, Retry};
use tracing::{debug, warn};

use super::errors::ApiError;

/// Retries after the first attempt
pub const MAX_RETRIES: u32 = 3;

/// Delay between attempts
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Retry configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; total requests = `max_retries + 1`
    pub max_retries: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            delay: RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Total number of requests this policy allows
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    fn strategy(&self) -> impl Iterator<Item = Duration> {
        FixedInterval::new(self.delay).take(self.max_retries as usize)
    }
}

/// Send a request, retrying on failure until the budget is spent
///
/// `request` is called once per attempt so the body can be rebuilt. The
/// last error is returned when every attempt failed.
pub async fn fetch_with_retry<F>(
    url: &str,
    policy: &RetryPolicy,
    request: F,
) -> Result<Response, ApiError>
where
    F: Fn() -> RequestBuilder,
{
    let mut attempt = 0u32;
    let max_attempts = policy.max_attempts();

    let result = Retry::spawn(policy.strategy(), || {
        attempt += 1;
        let current = attempt;
        let pending = request().send();
        async move {
            if current > 1 {
                debug!(url, attempt = current, max_attempts, "Retrying request");
            }
            match pending.await {
                Ok(resp) if resp.status().is_success() => Ok(resp),
                Ok(resp) => {
                    let err = ApiError::Http {
                        url: url.to_string(),
                        status: resp.status().as_u16(),
                    };
                    debug!(url, attempt = current, error = %err, "Request failed");
                    Err(err)
                }
                Err(e) => {
                    let err = ApiError::transport(url, e);
                    debug!(url, attempt = current, error = %err, "Request failed");
                    Err(err)
                }
            }
        }
    })
    .await;

    if let Err(err) = &result {
        warn!(url, attempts = attempt, error = %err, "All retry attempts exhausted");
    }
    result
}
