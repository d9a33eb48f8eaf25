//! Tool-specific error types.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use thiserror::Error;
use tracing::warn;

use crate::domains::prompts::PromptError;

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The prompt operation itself failed.
    #[error(transparent)]
    Prompt(#[from] PromptError),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Convert into the MCP response for a failed tool call.
    ///
    /// Argument errors are protocol errors; everything else is reported as
    /// an error tool result so the client sees the message.
    pub fn into_call_result(self) -> Result<CallToolResult, McpError> {
        match self {
            Self::InvalidArguments(msg) => Err(McpError::invalid_params(msg, None)),
            Self::NotFound(name) => Err(McpError::invalid_params(
                format!("Unknown tool: {}", name),
                None,
            )),
            other => {
                warn!("Tool call failed: {}", other);
                Ok(CallToolResult::error(vec![Content::text(other.to_string())]))
            }
        }
    }
}
