//! Per-call tool context.
//!
//! Every transport funnels through [`ToolContext::manager`], which resolves
//! the API key and builds a fresh [`PromptManager`] for the call.

use std::sync::Arc;
use tracing::debug;

use crate::core::config::Config;
use crate::domains::prompts::{HubConnector, LangSmithConnector, PromptError, PromptManager};

/// Shared, immutable state handed to every tool call.
#[derive(Clone)]
pub struct ToolContext {
    config: Arc<Config>,
    connector: Arc<dyn HubConnector>,
}

impl ToolContext {
    /// Create a context with an explicit hub connector.
    pub fn new(config: Arc<Config>, connector: Arc<dyn HubConnector>) -> Self {
        Self { config, connector }
    }

    /// Create a context that talks to the configured LangSmith hub.
    pub fn from_config(config: Arc<Config>) -> Self {
        let connector = Arc::new(LangSmithConnector::new(config.hub.clone()));
        Self::new(config, connector)
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Build a manager for one call.
    ///
    /// Fails with `MissingCredential` before any hub client exists when no
    /// API key resolves.
    pub fn manager(
        &self,
        explicit: Option<&str>,
        bearer: Option<&str>,
    ) -> Result<PromptManager, PromptError> {
        let api_key = self.config.credentials.resolve(explicit, bearer)?;
        debug!("Resolved API key for tool call");
        let hub = self.connector.connect(&api_key)?;
        Ok(PromptManager::new(hub))
    }
}
