//! Retry wrapper for remote calls
//!
//! [`RetryPolicy::execute`] runs any remote operation, sleeping and
//! retrying while it fails with a rate-limit rejection. Other failures
//! are returned on the spot. No sleep follows the final attempt.
//!
//! Backoff schedule with the default 1s unit: 2s, 4s, 8s, 16s (plus up to
//! one unit of jitter each), for at most 5 attempts.

use std::future::Future;

use drivebackup_core::ports::RemoteError;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::backoff::BackoffCalculator;
use crate::rate_limit::is_rate_limited;

/// Default total number of attempts per call
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Why a retried call gave up
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError {
    /// A failure that is not worth retrying
    #[error("{0}")]
    Fatal(RemoteError),

    /// Still rate limited after every attempt
    #[error("rate limited after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: RemoteError },
}

impl RetryError {
    /// The remote error that ended the call
    pub fn last_error(&self) -> &RemoteError {
        match self {
            Self::Fatal(err) => err,
            Self::Exhausted { last, .. } => last,
        }
    }
}

/// Attempt ceiling plus backoff schedule
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: BackoffCalculator,
}

impl RetryPolicy {
    /// Creates a policy; an attempt ceiling of 0 is raised to 1
    pub fn new(max_attempts: u32, backoff: BackoffCalculator) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> &BackoffCalculator {
        &self.backoff
    }

    /// Executes `op` until it succeeds, fails fatally, or runs out of attempts
    ///
    /// # Arguments
    /// * `operation` - Name used in log records
    /// * `op` - Produces one attempt of the remote call per invocation
    pub async fn execute<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RemoteError>>,
    {
        let mut attempt: u32 = 0;

        loop {
            match op().await {
                Ok(value) => {
                    if attempt > 0 {
                        info!(operation, attempt, "Operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) if !is_rate_limited(&err) => {
                    debug!(operation, attempt, error = %err, "Non-retryable error");
                    return Err(RetryError::Fatal(err));
                }
                Err(err) => {
                    let attempts = attempt + 1;
                    if attempts >= self.max_attempts {
                        warn!(operation, attempts, error = %err, "Rate limit retries exhausted");
                        return Err(RetryError::Exhausted {
                            attempts,
                            last: err,
                        });
                    }

                    let delay = self.backoff.delay(attempt);
                    warn!(
                        operation,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "Rate limited, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt = attempts;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, BackoffCalculator::default())
    }
}
