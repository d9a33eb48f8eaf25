//! Prompt hub client.
//!
//! The hub is the remote service that durably stores prompt definitions.
//! [`PromptHub`] is the seam the lifecycle manager talks to; [`HubConnector`]
//! builds a hub client bound to one resolved API key, so no client outlives
//! the credential it was created for.

mod langsmith;
#[cfg(test)]
pub(crate) mod memory;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use super::model::{ListFilter, PromptDefinition, PromptId, PromptRecord, RemoteTemplate};

pub use langsmith::{LangSmithConnector, LangSmithHub};

/// Result type for hub operations.
pub type HubResult<T> = Result<T, HubError>;

/// Errors reported by a prompt hub client.
#[derive(Debug, Error)]
pub enum HubError {
    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The hub answered with a non-success status.
    #[error("hub returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The hub answered with a body this client does not understand.
    #[error("unexpected hub response: {0}")]
    Decode(String),

    /// The client could not be configured.
    #[error("invalid hub client configuration: {0}")]
    Config(String),
}

impl HubError {
    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

/// Remote operations the lifecycle manager depends on.
#[async_trait]
pub trait PromptHub: Send + Sync {
    /// Probe whether a prompt exists.
    async fn prompt_exists(&self, id: &PromptId) -> HubResult<bool>;

    /// Fetch prompt metadata.
    async fn get_prompt(&self, id: &PromptId) -> HubResult<PromptRecord>;

    /// Fetch the serialized template of the latest commit.
    async fn pull_template(&self, id: &PromptId) -> HubResult<RemoteTemplate>;

    /// Publish a full definition, creating the prompt if needed.
    /// Returns the location of the published version.
    async fn push_prompt(&self, id: &PromptId, definition: &PromptDefinition)
    -> HubResult<String>;

    /// Delete a prompt and its history.
    async fn delete_prompt(&self, id: &PromptId) -> HubResult<()>;

    /// List prompts matching the filter, in hub order.
    async fn list_prompts(&self, filter: &ListFilter) -> HubResult<Vec<PromptRecord>>;
}

/// Builds hub clients for a resolved API key.
pub trait HubConnector: Send + Sync {
    fn connect(&self, api_key: &str) -> HubResult<Arc<dyn PromptHub>>;
}
