//! Fixed-interval retry for Share HTTP operations.
use std::time::Duration;

use tokio_retry::{RetryIf, strategy::FixedInterval};

use crate::error::ShareError;

/// Determine if a Share error is worth another authentication attempt.
///
/// Every rejected login counts against the retry budget, whatever the status
/// code: 502/503 mean the service is unavailable, anything else is unexpected
/// but observed to clear up on its own. Transport-level connect and timeout
/// errors are retried on the same budget.
pub(crate) fn is_retryable_auth(err: &ShareError) -> bool {
    match err {
        ShareError::Auth { .. } => true,
        ShareError::Http(e) => e.is_timeout() || e.is_connect(),
        ShareError::Fetch { .. } => false,
    }
}

/// Retry the provided async operation at a fixed interval while `condition`
/// holds for the returned error, giving up after `max_retries` retries.
///
/// The initial attempt is not counted as a retry, so at most
/// `max_retries + 1` attempts are made.
pub(crate) async fn retry_fixed_if<F, Fut, T, E, C>(
    delay: Duration,
    max_retries: u32,
    op: F,
    condition: C,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    C: Fn(&E) -> bool,
{
    let strategy = FixedInterval::new(delay).take(max_retries as usize);
    RetryIf::spawn(strategy, op, condition).await
}
