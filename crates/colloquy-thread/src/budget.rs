use colloquy_llm::TokenUsage;

/// Cheap deterministic token estimate: ceil(chars / 4), computed as
/// `(chars + 3) / 4` in integer arithmetic. Not a real tokenizer; good
/// enough to drive the clear/compress thresholds.
pub fn estimate_tokens(char_count: usize) -> u32 {
    ((char_count + 3) / 4) as u32
}

/// Token accounting for one conversation: the model's context window and a
/// lifetime counter fed from every response's usage block.
#[derive(Debug, Clone)]
pub struct ConversationBudget {
    pub max_tokens: u32,
    pub total_tokens_lifetime: u64,
}

impl ConversationBudget {
    pub fn new(max_tokens: u32) -> Self {
        Self {
            max_tokens,
            total_tokens_lifetime: 0,
        }
    }

    pub fn record_usage(&mut self, usage: &TokenUsage) {
        self.total_tokens_lifetime += u64::from(usage.total_tokens);
    }

    /// Threshold in tokens for a given percentage of the window.
    pub fn threshold(&self, percent: u8) -> u32 {
        ((u64::from(self.max_tokens) * u64::from(percent)) / 100) as u32
    }
}
