pub mod accumulator;
pub mod deferred;
pub mod error;
pub mod openai;
pub mod retry;
pub mod sse;
pub mod streaming;
pub mod traits;
pub mod types;

pub use traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenUsage};

pub use accumulator::ToolCallAccumulator;
pub use deferred::DeferredClient;
pub use error::LlmError;
pub use openai::OpenAIClient;
pub use retry::{chat_stream_with_retry, parse_retry_after, with_rate_limit_retry, RetryPolicy};
pub use sse::{LineBuffer, SseFrame, SseFrameReader};
pub use streaming::{parse_chat_sse_stream, ChatStreamChunk, StreamEvent, ToolCallDelta};
pub use types::{Content, ContentPart, Message, Tool, ToolCall, ToolChoice};
