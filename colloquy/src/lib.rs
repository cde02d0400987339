//! # Colloquy - Conversational LLM Client for Rust
//!
//! Colloquy is a client for OpenAI-compatible chat completion APIs built
//! around a conversation orchestration engine:
//! - **Token-by-token streaming** (SSE frames decoded into typed deltas)
//! - **Tool round-trips** (ask model, execute requested tools in parallel,
//!   resubmit with ordered results)
//! - **Budget management** (history trimming, compression, hard clear)
//! - **Rate-limit recovery** (header-driven backoff with bounded retries)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use colloquy::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Arc::new(OpenAIClient::new(std::env::var("OPENAI_API_KEY")?)?);
//!     let thread = ChatThread::new(client, ThreadConfig::new("gpt-4o"));
//!
//!     thread.add_system_instruction("You are a helpful assistant.").await;
//!
//!     let mut events = thread.ask("What's the weather in SF?", CancellationToken::new())?;
//!     while let Some(event) = events.recv().await {
//!         println!("{:?}", event);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Colloquy consists of two composable crates:
//!
//! - **colloquy-llm**: transport layer (message/tool data model, `ChatClient`,
//!   SSE frame reader, tool-call accumulator, retry policy, deferred poller)
//! - **colloquy-thread**: orchestration (`ChatThread`, history, token budget,
//!   tool registry, typed event stream)

pub use colloquy_llm as llm;
pub use colloquy_thread as thread;

/// Common imports for applications
pub mod prelude {
    pub use colloquy_llm::{
        ChatClient, ChatOptions, ChatRequest, ChatResponse, Content, ContentPart, DeferredClient,
        LlmError, Message, OpenAIClient, RetryPolicy, StreamEvent, Tool, ToolCall,
        ToolCallAccumulator, ToolChoice,
    };
    pub use colloquy_thread::{
        CancellationToken, ChatThread, ThreadConfig, ThreadError, ThreadEvent, ThreadState,
        ToolHandler,
    };
}
