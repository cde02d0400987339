pub mod budget;
pub mod config;
pub mod error;
pub mod events;
pub mod history;
pub mod registry;
pub mod thread;

pub use budget::{estimate_tokens, ConversationBudget};
pub use config::ThreadConfig;
pub use error::ThreadError;
pub use events::{ThreadEvent, ThreadState};
pub use history::History;
pub use registry::{ToolHandler, ToolRegistry};
pub use thread::ChatThread;

// Cancellation threads through every suspension point; re-exported so
// callers don't need a direct tokio-util dependency.
pub use tokio_util::sync::CancellationToken;
