//! Prompt-specific error types.

use thiserror::Error;

use super::hub::HubError;

/// Errors that can occur during prompt lifecycle operations.
///
/// Every transport surfaces these unchanged; only the envelope differs.
#[derive(Debug, Error)]
pub enum PromptError {
    /// No API key could be resolved from any source.
    #[error(
        "Missing API key: pass an explicit API key, send an Authorization bearer token, \
         or set LANGSMITH_API_KEY"
    )]
    MissingCredential,

    /// The target prompt does not exist on the hub.
    #[error("Prompt not found: {0}")]
    NotFound(String),

    /// The remote template is not a plain string and cannot be merged.
    #[error("Unsupported template type for '{0}': only plain string templates are supported")]
    UnsupportedTemplateType(String),

    /// Malformed or conflicting caller input.
    #[error("Invalid input: {0}")]
    InvalidInputFormat(String),

    /// Failure reported by the prompt hub client, passed through unmodified.
    #[error("Prompt hub request failed: {0}")]
    Transport(#[from] HubError),
}

impl PromptError {
    /// Create a new "not found" error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    /// Create a new "unsupported template type" error.
    pub fn unsupported_template(id: impl Into<String>) -> Self {
        Self::UnsupportedTemplateType(id.into())
    }

    /// Create a new "invalid input" error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInputFormat(msg.into())
    }

    /// Stable name of the error class, used in machine-readable envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential => "MissingCredential",
            Self::NotFound(_) => "NotFound",
            Self::UnsupportedTemplateType(_) => "UnsupportedTemplateType",
            Self::InvalidInputFormat(_) => "InvalidInputFormat",
            Self::Transport(_) => "TransportError",
        }
    }
}
