use std::sync::Arc;

use anyhow::Result;
use colloquy_llm::{ChatClient, ChatOptions, ChatRequest, Content, Message, ToolChoice};
use futures::future;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::budget::{estimate_tokens, ConversationBudget};
use crate::config::ThreadConfig;
use crate::error::ThreadError;
use crate::events::{ThreadEvent, ThreadState};
use crate::history::History;
use crate::registry::{ToolHandler, ToolRegistry};

const COMPRESSION_PROMPT: &str = "Summarize the conversation so far into a single message. \
Preserve facts, decisions, names and open questions; drop pleasantries.";

struct ThreadInner {
    history: History,
    registry: ToolRegistry,
    budget: ConversationBudget,
}

/// A single logical conversation: ordered history with a pinned instruction,
/// a token budget, a tool registry, and the ask/tool round-trip loop.
///
/// One instance owns one conversation for its lifetime. Turns must be
/// serialized by the caller; a second concurrent `ask` on the same instance
/// queues behind the first rather than interleaving with it.
pub struct ChatThread {
    client: Arc<dyn ChatClient>,
    config: ThreadConfig,
    inner: Arc<Mutex<ThreadInner>>,
}

impl ChatThread {
    pub fn new(client: Arc<dyn ChatClient>, config: ThreadConfig) -> Self {
        let inner = ThreadInner {
            history: History::new(config.max_messages_in_history),
            registry: ToolRegistry::new(),
            budget: ConversationBudget::new(config.max_tokens_for_model),
        };

        Self {
            client,
            config,
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Replace the pinned instruction with a system-role directive.
    pub async fn add_system_instruction(&self, text: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        inner.history.set_pinned(Message::system(text.into()));
    }

    /// Replace the pinned instruction with a developer-role directive.
    pub async fn add_developer_instruction(&self, text: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        inner.history.set_pinned(Message::developer(text.into()));
    }

    /// Append a user message without making a network call.
    pub async fn add_user_message(&self, text: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        inner.history.push(Message::human(text.into()));
    }

    /// Register a tool under its own name, or `alias` when given.
    pub async fn register_tool(
        &self,
        tool: Arc<dyn ToolHandler>,
        alias: Option<&str>,
    ) -> Result<(), ThreadError> {
        let mut inner = self.inner.lock().await;
        inner.registry.register(tool, alias)
    }

    /// Remove a tool by resolved name; false when absent.
    pub async fn unregister_tool(&self, name: &str) -> bool {
        let mut inner = self.inner.lock().await;
        inner.registry.unregister(name)
    }

    pub async fn unregister_all_tools(&self) {
        let mut inner = self.inner.lock().await;
        inner.registry.unregister_all();
    }

    /// Current history estimate, in tokens.
    pub async fn estimated_tokens(&self) -> u32 {
        let inner = self.inner.lock().await;
        estimate_tokens(inner.history.char_count())
    }

    /// Tokens reported by the endpoint across the conversation's lifetime.
    pub async fn lifetime_tokens(&self) -> u64 {
        let inner = self.inner.lock().await;
        inner.budget.total_tokens_lifetime
    }

    pub async fn history_len(&self) -> usize {
        let inner = self.inner.lock().await;
        inner.history.len()
    }

    /// Ask a question. Returns the event receiver for this turn: a
    /// drain-once sequence ending in `Done` or `Error`.
    ///
    /// Validation runs synchronously; a blank question fails before any
    /// network activity.
    pub fn ask(
        &self,
        question: &str,
        cancel: CancellationToken,
    ) -> Result<UnboundedReceiver<ThreadEvent>, ThreadError> {
        if question.trim().is_empty() {
            return Err(ThreadError::EmptyQuestion);
        }

        let (tx, rx) = mpsc::unbounded_channel();

        let client = Arc::clone(&self.client);
        let config = self.config.clone();
        let inner = Arc::clone(&self.inner);
        let question = question.to_string();

        tokio::spawn(async move {
            let run_id = uuid::Uuid::new_v4();
            tracing::info!(%run_id, "Starting turn");

            let mut guard = inner.lock().await;

            if let Err(e) =
                run_turn(client.as_ref(), &config, &mut guard, &question, &tx, &cancel).await
            {
                tracing::error!(%run_id, "Turn failed: {}", e);
                let _ = tx.send(ThreadEvent::Error {
                    message: e.to_string(),
                });
                let _ = tx.send(ThreadEvent::state(ThreadState::Error));
            }
        });

        Ok(rx)
    }

    /// Replace the whole history with a model-generated summary seeded as a
    /// single user message; the pinned instruction survives verbatim.
    pub async fn compress_history(&self, prompt: &str) -> Result<()> {
        let mut inner = self.inner.lock().await;
        compress_locked(self.client.as_ref(), &self.config, &mut inner, prompt).await
    }
}

fn emit(tx: &UnboundedSender<ThreadEvent>, event: ThreadEvent) {
    let _ = tx.send(event);
}

/// One complete turn: budget pre-check, then the tool round-trip loop.
///
/// History appended by completed rounds is retained on failure; progress is
/// at-least-once, not transactional.
async fn run_turn(
    client: &dyn ChatClient,
    config: &ThreadConfig,
    inner: &mut ThreadInner,
    question: &str,
    tx: &UnboundedSender<ThreadEvent>,
    cancel: &CancellationToken,
) -> Result<()> {
    emit(tx, ThreadEvent::state(ThreadState::Thinking));

    inner.history.push(Message::human(question));

    // Budget pre-check. Clear wins over compression when both trip, and a
    // cleared turn never reaches the model.
    let estimated = estimate_tokens(inner.history.char_count());
    if estimated >= inner.budget.threshold(config.clear_threshold_percent) {
        inner.history.clear();
        tracing::warn!(
            estimated,
            max = inner.budget.max_tokens,
            "History cleared at hard threshold"
        );
        emit(
            tx,
            ThreadEvent::notice(
                "Conversation history exceeded the context window and was cleared. \
                 Please ask your question again.",
            ),
        );
        emit(tx, ThreadEvent::state(ThreadState::Done));
        return Ok(());
    }

    if config.enable_compression
        && estimated >= inner.budget.threshold(config.compression_threshold_percent)
    {
        compress_locked(client, config, inner, COMPRESSION_PROMPT).await?;
        emit(
            tx,
            ThreadEvent::notice("Conversation history was compressed into a summary."),
        );
        // The turn continues with the original question against the
        // now-compressed history.
        inner.history.push(Message::human(question));
    }

    let mut rounds = 0u32;

    loop {
        if rounds > 0 {
            emit(tx, ThreadEvent::state(ThreadState::Thinking));
        }

        let request = build_request(config, inner, true);

        emit(tx, ThreadEvent::state(ThreadState::Streaming));

        let response = tokio::select! {
            _ = cancel.cancelled() => {
                emit(tx, ThreadEvent::notice("Turn cancelled"));
                emit(tx, ThreadEvent::state(ThreadState::Done));
                return Ok(());
            }
            result = client.chat(request) => result?,
        };

        if let Some(usage) = &response.usage {
            inner.budget.record_usage(usage);
        }

        let tool_calls = response.tool_calls.clone().unwrap_or_default();

        if tool_calls.is_empty() {
            // Normal exit: final text for the turn.
            let text = response.content.unwrap_or_default();
            inner.history.push(Message::ai(text.clone()));
            emit(tx, ThreadEvent::Text { content: text });
            emit(tx, ThreadEvent::state(ThreadState::Done));
            return Ok(());
        }

        inner.history.push(Message::ai_with_tools(
            response.content.map(Content::Text),
            tool_calls.clone(),
        ));

        emit(tx, ThreadEvent::state(ThreadState::CallingTool));

        // Resolve every handler before executing anything: a hallucinated
        // tool name is a contract mismatch, fatal and not retryable.
        let mut jobs = Vec::with_capacity(tool_calls.len());
        for call in &tool_calls {
            let handler = inner
                .registry
                .get(&call.function.name)
                .ok_or_else(|| ThreadError::UnknownTool(call.function.name.clone()))?;
            jobs.push((call, handler));
        }

        let executions = jobs.iter().map(|(call, handler)| {
            let handler = Arc::clone(handler);
            let arguments = call.function.arguments.clone();
            async move { handler.execute(&arguments).await }
        });

        // Execution fans out concurrently; results re-enter history in the
        // original request order so replay stays deterministic.
        let results = tokio::select! {
            _ = cancel.cancelled() => {
                emit(tx, ThreadEvent::notice("Turn cancelled"));
                emit(tx, ThreadEvent::state(ThreadState::Done));
                return Ok(());
            }
            results = future::join_all(executions) => results,
        };

        for ((call, _), result) in jobs.iter().zip(results) {
            let output = match result {
                Ok(output) => output,
                // Fed back to the model as the result so it can react.
                Err(e) => format!("Tool execution failed: {}", e),
            };

            emit(
                tx,
                ThreadEvent::ToolResponse {
                    tool_name: call.function.name.clone(),
                    content: output.clone(),
                },
            );
            inner
                .history
                .push(Message::tool_result(call.id.clone(), output));
        }

        rounds += 1;
        if rounds >= config.max_tool_rounds {
            return Err(ThreadError::ToolRoundsExceeded(config.max_tool_rounds).into());
        }
    }
}

fn build_request(config: &ThreadConfig, inner: &ThreadInner, with_tools: bool) -> ChatRequest {
    let mut options = ChatOptions::new();

    if let Some(temp) = config.temperature {
        options = options.temperature(temp);
    }

    // Tool parameters are omitted entirely when nothing is registered;
    // an empty tool list with an auto choice is an invalid request.
    if with_tools && !inner.registry.is_empty() {
        options = options
            .tools(inner.registry.declarations())
            .tool_choice(ToolChoice::auto());
    }

    ChatRequest::new(config.model.clone(), inner.history.snapshot()).with_options(options)
}

/// One tool-free summarization round, then full-history replacement.
async fn compress_locked(
    client: &dyn ChatClient,
    config: &ThreadConfig,
    inner: &mut ThreadInner,
    prompt: &str,
) -> Result<()> {
    let mut request = build_request(config, inner, false);
    request.messages.push(Message::human(prompt));

    tracing::info!("Compressing history ({} messages)", inner.history.len());

    let response = client.chat(request).await?;

    if let Some(usage) = &response.usage {
        inner.budget.record_usage(usage);
    }

    let summary = response.content.unwrap_or_default();
    inner.history.replace_with(vec![Message::human(format!(
        "Summary of the conversation so far: {}",
        summary
    ))]);

    Ok(())
}
