use std::time::Duration;
use thiserror::Error;

/// Error classes callers need to match on. General plumbing failures stay
/// `anyhow` with context; these are the conditions with distinct handling:
/// 429 is retryable, an API status is not, and a poll timeout means "gave up",
/// not "failed".
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("rate limited by API (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("deferred completion {job_id} not ready after {waited:?}")]
    PollTimeout { job_id: String, waited: Duration },
}
