//! Rate-limit handling for outbound webhook calls.
//!
//! Only [`ScraperError::RateLimited`] is retried, after sleeping for the
//! duration the server asked for plus a fixed buffer. Every other error is
//! returned immediately.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ScraperError;

/// Wait used when a 429 response carries no usable retry hint.
pub(crate) const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Longest wait honored from a server hint.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(300);

/// Discord's 429 body: `{"message": "...", "retry_after": 0.2, "global": false}`.
#[derive(Debug, Deserialize)]
struct RateLimitBody {
    retry_after: f64,
}

/// Derives the retry delay from a 429 response.
///
/// Prefers the JSON body's `retry_after` (fractional seconds, as Discord sends
/// it), then the `Retry-After` header in seconds, then [`DEFAULT_RETRY_AFTER`].
/// Negative or non-finite hints are ignored; the result is capped at five minutes.
pub(crate) fn retry_after_from_response(header: Option<&str>, body: &str) -> Duration {
    let from_body = serde_json::from_str::<RateLimitBody>(body)
        .ok()
        .map(|b| b.retry_after);
    let from_header = header.and_then(|h| h.trim().parse::<f64>().ok());

    from_body
        .into_iter()
        .chain(from_header)
        .find(|secs| secs.is_finite() && *secs >= 0.0)
        .map_or(DEFAULT_RETRY_AFTER, |secs| {
            Duration::from_secs_f64(secs.min(MAX_RETRY_AFTER.as_secs_f64()))
        })
}

/// Executes `operation`, retrying up to `max_retries` times when it fails with
/// [`ScraperError::RateLimited`].
///
/// Before each retry the function sleeps for the error's `retry_after` plus
/// `buffer`. If the retries are exhausted the last error is returned.
pub(crate) async fn retry_on_rate_limit<T, F, Fut>(
    max_retries: u32,
    buffer: Duration,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        let ScraperError::RateLimited {
            ref domain,
            retry_after,
        } = err
        else {
            return Err(err);
        };
        if attempt >= max_retries {
            return Err(err);
        }

        let delay = retry_after.saturating_add(buffer);
        tracing::warn!(
            attempt,
            max_retries,
            domain = %domain,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "rate limited, retrying after requested delay"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
