use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use colloquy_llm::{ChatRequest, ChatResponse, DeferredClient, LlmError};

/// Endpoint stub: pending for the first `ready_after` polls, then done.
struct StubDeferredEndpoint {
    ready_after: u32,
    polls: AtomicU32,
}

impl StubDeferredEndpoint {
    fn new(ready_after: u32) -> Self {
        Self {
            ready_after,
            polls: AtomicU32::new(0),
        }
    }

    fn response() -> ChatResponse {
        ChatResponse {
            content: Some("deferred answer".to_string()),
            tool_calls: None,
            usage: None,
            finish_reason: Some("stop".to_string()),
            raw: serde_json::Value::Null,
        }
    }
}

#[async_trait]
impl DeferredClient for StubDeferredEndpoint {
    async fn submit(&self, _request: ChatRequest) -> Result<String> {
        Ok("job_1".to_string())
    }

    async fn try_get_result(&self, _job_id: &str) -> Result<Option<ChatResponse>> {
        let poll = self.polls.fetch_add(1, Ordering::SeqCst);
        if poll < self.ready_after {
            Ok(None)
        } else {
            Ok(Some(Self::response()))
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_wait_polls_until_ready() {
    let endpoint = StubDeferredEndpoint::new(2);

    let job_id = endpoint
        .submit(ChatRequest::new("gpt-4o", vec![]))
        .await
        .unwrap();

    let start = tokio::time::Instant::now();
    let result = endpoint
        .wait_for_result(&job_id, Duration::from_secs(10), Duration::from_secs(1))
        .await
        .unwrap();

    assert_eq!(result.content.as_deref(), Some("deferred answer"));
    assert_eq!(endpoint.polls.load(Ordering::SeqCst), 3);
    // Two not-ready polls, one interval sleep each.
    assert_eq!(start.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_is_a_distinct_condition() {
    let endpoint = StubDeferredEndpoint::new(u32::MAX);

    let err = endpoint
        .wait_for_result("job_1", Duration::from_secs(3), Duration::from_secs(1))
        .await
        .unwrap_err();

    match err.downcast_ref::<LlmError>() {
        Some(LlmError::PollTimeout { job_id, .. }) => assert_eq!(job_id, "job_1"),
        other => panic!("Expected PollTimeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_immediate_result_needs_no_sleep() {
    let endpoint = StubDeferredEndpoint::new(0);

    let result = endpoint
        .wait_for_result("job_1", Duration::from_secs(1), Duration::from_secs(1))
        .await
        .unwrap();

    assert!(result.content.is_some());
    assert_eq!(endpoint.polls.load(Ordering::SeqCst), 1);
}
