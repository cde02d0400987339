use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::LlmError;
use crate::traits::{ChatRequest, ChatResponse};

/// Deferred (submit-then-poll) completion endpoint.
///
/// `try_get_result` distinguishes "not ready" (`Ok(None)`, a 202-class
/// status) from a hard failure (`Err`); `wait_for_result` adds the bounded
/// polling loop on top.
#[async_trait]
pub trait DeferredClient: Send + Sync {
    /// Submit a request for deferred execution, returning the job id.
    async fn submit(&self, request: ChatRequest) -> Result<String>;

    /// Fetch the result if ready; `Ok(None)` while the job is still pending.
    async fn try_get_result(&self, job_id: &str) -> Result<Option<ChatResponse>>;

    /// Poll until the job completes or `timeout` elapses, sleeping
    /// `poll_interval` between attempts. A missed deadline is
    /// [`LlmError::PollTimeout`], distinct from a hard endpoint error.
    async fn wait_for_result(
        &self,
        job_id: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<ChatResponse> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            if let Some(response) = self.try_get_result(job_id).await? {
                return Ok(response);
            }

            if tokio::time::Instant::now() + poll_interval > deadline {
                return Err(LlmError::PollTimeout {
                    job_id: job_id.to_string(),
                    waited: timeout,
                }
                .into());
            }

            tokio::time::sleep(poll_interval).await;
        }
    }
}
