pub mod content;
pub mod message;
pub mod tool;

pub use content::{Content, ContentPart, ImageDetail, ImageUrl};
pub use message::Message;
pub use tool::{Tool, ToolCall, ToolChoice, FunctionDefinition, FunctionCall, ToolChoiceFunction};
