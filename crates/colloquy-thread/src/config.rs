use colloquy_llm::RetryPolicy;
use serde::{Deserialize, Serialize};

/// Per-conversation orchestration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadConfig {
    pub model: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Context window assumed for the model, in tokens
    pub max_tokens_for_model: u32,

    /// Cap on history entries (pinned instruction included); oldest
    /// non-pinned messages are trimmed FIFO past this.
    pub max_messages_in_history: usize,

    /// Hard clear when the estimate reaches this percentage of the window.
    /// Clear wins over compression when both thresholds trip.
    pub clear_threshold_percent: u8,

    /// Compress when the estimate reaches this percentage of the window
    pub compression_threshold_percent: u8,

    pub enable_compression: bool,

    /// Guardrail on tool round-trips within one turn
    pub max_tool_rounds: u32,

    #[serde(skip)]
    pub retry: RetryPolicy,
}

impl ThreadConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: None,
            max_tokens_for_model: 128_000,
            max_messages_in_history: 50,
            clear_threshold_percent: 100,
            compression_threshold_percent: 80,
            enable_compression: true,
            max_tool_rounds: 10,
            retry: RetryPolicy::default(),
        }
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn max_tokens_for_model(mut self, tokens: u32) -> Self {
        self.max_tokens_for_model = tokens;
        self
    }

    pub fn max_messages_in_history(mut self, count: usize) -> Self {
        self.max_messages_in_history = count;
        self
    }

    pub fn clear_threshold_percent(mut self, percent: u8) -> Self {
        self.clear_threshold_percent = percent;
        self
    }

    pub fn compression_threshold_percent(mut self, percent: u8) -> Self {
        self.compression_threshold_percent = percent;
        self
    }

    pub fn enable_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }

    pub fn max_tool_rounds(mut self, rounds: u32) -> Self {
        self.max_tool_rounds = rounds;
        self
    }
}
