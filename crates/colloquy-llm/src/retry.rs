use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::Result;
use futures::Stream;
use reqwest::header::{HeaderMap, RETRY_AFTER};

use crate::error::LlmError;
use crate::streaming::StreamEvent;
use crate::traits::{ChatClient, ChatRequest};

/// Bounded retry for rate-limit responses on a single request attempt.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt; attempts = max_retries + 1.
    pub max_retries: u32,
    /// Delay used when the response carries no `Retry-After` header.
    pub default_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            default_delay: Duration::from_secs(2),
        }
    }
}

/// Header-driven backoff: `Retry-After` in whole seconds, when present.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Delay for one retry attempt: the server hint when present, else the
/// policy default. Pure, so the backoff schedule is testable offline.
pub fn retry_delay(policy: &RetryPolicy, retry_after: Option<Duration>) -> Duration {
    retry_after.unwrap_or(policy.default_delay)
}

/// Run `attempt` until it succeeds, retrying only rate-limit failures.
///
/// Any other error class, or a rate limit past the retry budget, propagates
/// immediately.
pub async fn with_rate_limit_retry<T, F, Fut>(policy: &RetryPolicy, mut attempt: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut retries = 0;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) => match e.downcast_ref::<LlmError>() {
                Some(LlmError::RateLimited { retry_after }) if retries < policy.max_retries => {
                    let delay = retry_delay(policy, *retry_after);
                    retries += 1;
                    tracing::warn!(
                        "Rate limited; retry {}/{} in {:?}",
                        retries,
                        policy.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                _ => return Err(e),
            },
        }
    }
}

/// One streaming round with rate-limit retry around connection setup.
///
/// Applies to the single-round streaming path only; the conversation loop
/// treats any mid-turn error as fatal to the turn.
pub async fn chat_stream_with_retry(
    client: &dyn ChatClient,
    request: ChatRequest,
    policy: &RetryPolicy,
) -> Result<Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>> {
    with_rate_limit_retry(policy, || client.chat_stream(request.clone())).await
}
