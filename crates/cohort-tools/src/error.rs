//! Error types for the cohort-tools crate.

/// Errors that can occur during tool execution.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Invalid parameters passed to tool
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Tool execution failed
    #[error("Execution error: {0}")]
    ExecutionError(String),

    /// No tool registered under this name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// I/O error during tool execution
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
