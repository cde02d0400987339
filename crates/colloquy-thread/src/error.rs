use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThreadError {
    #[error("Question must not be empty")]
    EmptyQuestion,

    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    #[error("Model requested unknown tool: {0}")]
    UnknownTool(String),

    #[error("Tool round limit ({0}) reached without a final answer")]
    ToolRoundsExceeded(u32),
}
