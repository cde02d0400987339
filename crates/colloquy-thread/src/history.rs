use colloquy_llm::Message;

/// Ordered conversation history with a single pinned instruction at the head.
///
/// Append-only except for: pinned-instruction replacement, FIFO trimming of
/// the oldest non-pinned entries past `max_messages`, and full replacement
/// during compression.
pub struct History {
    pinned: Option<Message>,
    rest: Vec<Message>,
    max_messages: usize,
}

impl History {
    pub fn new(max_messages: usize) -> Self {
        Self {
            pinned: None,
            rest: Vec::new(),
            max_messages,
        }
    }

    /// Replace (never append) the pinned System/Developer instruction.
    pub fn set_pinned(&mut self, instruction: Message) {
        debug_assert!(instruction.is_instruction());
        self.pinned = Some(instruction);
    }

    pub fn pinned(&self) -> Option<&Message> {
        self.pinned.as_ref()
    }

    /// Append a non-pinned message, then trim oldest non-pinned entries
    /// while the total count exceeds the cap.
    pub fn push(&mut self, message: Message) {
        self.rest.push(message);
        self.trim();
    }

    fn trim(&mut self) {
        while self.len() > self.max_messages && !self.rest.is_empty() {
            self.rest.remove(0);
        }
    }

    /// Drop everything except the pinned instruction.
    pub fn clear(&mut self) {
        self.rest.clear();
    }

    /// Replace all non-pinned messages (compression seeds the summary here).
    pub fn replace_with(&mut self, messages: Vec<Message>) {
        self.rest = messages;
        self.trim();
    }

    /// Pinned instruction followed by the rest, for building requests.
    pub fn snapshot(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.len());
        if let Some(pinned) = &self.pinned {
            messages.push(pinned.clone());
        }
        messages.extend(self.rest.iter().cloned());
        messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.rest.last().or(self.pinned.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rest.len() + usize::from(self.pinned.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total visible characters, input to the token estimate.
    pub fn char_count(&self) -> usize {
        let pinned = self.pinned.as_ref().map(|m| m.char_count()).unwrap_or(0);
        pinned + self.rest.iter().map(|m| m.char_count()).sum::<usize>()
    }
}
