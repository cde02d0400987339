use serde::{Deserialize, Serialize};

/// Orchestrator state transitions surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadState {
    /// Preparing the next model round
    Thinking,
    /// Waiting on the model endpoint
    Streaming,
    /// Executing requested tools
    CallingTool,
    /// Turn finished normally
    Done,
    /// Turn aborted on an unrecoverable error
    Error,
}

/// Events emitted per `ask` invocation, in production order. The receiver is
/// a drain-once sequence; `Done` or `Error` is always terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ThreadEvent {
    State {
        state: ThreadState,
    },

    /// Final assistant text for the turn
    Text {
        content: String,
    },

    /// Raw output of one executed tool call (consumers may need it, e.g.
    /// an image URL)
    ToolResponse {
        tool_name: String,
        content: String,
    },

    /// Housekeeping notice: history cleared/compressed, turn cancelled
    ServiceNotice {
        message: String,
    },

    Error {
        message: String,
    },
}

impl ThreadEvent {
    pub fn state(state: ThreadState) -> Self {
        Self::State { state }
    }

    pub fn notice(message: impl Into<String>) -> Self {
        Self::ServiceNotice {
            message: message.into(),
        }
    }
}
