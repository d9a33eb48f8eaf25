//! Prompt lifecycle manager.
//!
//! Owns the five prompt operations. A manager holds nothing but its hub
//! client; every operation re-reads the remote state it needs.
//!
//! Update, delete and render probe for existence before acting. The probe and
//! the follow-up call are separate requests, so a concurrent writer can slip
//! in between: two updates may both pass the probe and the later publish
//! wins, and a prompt deleted after the probe makes the follow-up fail with a
//! transport error.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::codec;
use super::error::PromptError;
use super::hub::PromptHub;
use super::model::{ListFilter, PromptDraft, PromptId, PromptRecord, PromptUpdate};
use super::templates;

/// Result type for manager operations.
pub type PromptResult<T> = Result<T, PromptError>;

/// Prompt lifecycle manager bound to one hub client.
#[derive(Clone)]
pub struct PromptManager {
    hub: Arc<dyn PromptHub>,
}

impl PromptManager {
    /// Create a manager over the given hub client.
    pub fn new(hub: Arc<dyn PromptHub>) -> Self {
        Self { hub }
    }

    /// List private, non-archived prompts, most recently updated first.
    #[instrument(skip(self))]
    pub async fn list_prompts(&self, query: Option<&str>) -> PromptResult<Vec<PromptRecord>> {
        let filter = ListFilter::private_active(query);
        let mut records = self.hub.list_prompts(&filter).await?;

        // Stable: equal timestamps keep hub order.
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        info!("Listed {} prompts", records.len());
        Ok(records)
    }

    /// Render a prompt, or `None` if it does not exist.
    #[instrument(skip(self, variables), fields(prompt = %id))]
    pub async fn get_prompt(
        &self,
        id: &PromptId,
        variables: Option<&HashMap<String, String>>,
    ) -> PromptResult<Option<String>> {
        if !self.hub.prompt_exists(id).await? {
            info!("Prompt not found");
            return Ok(None);
        }

        let remote = self.hub.pull_template(id).await?;
        let body = remote
            .template
            .as_str()
            .ok_or_else(|| PromptError::unsupported_template(id.to_string()))?;

        let empty = HashMap::new();
        let rendered = templates::render(
            body,
            remote.template_format.unwrap_or_default(),
            variables.unwrap_or(&empty),
        )?;

        Ok(Some(rendered))
    }

    /// Publish a new prompt. An existing prompt with the same id is
    /// overwritten.
    #[instrument(skip(self, draft), fields(prompt = %id))]
    pub async fn create_prompt(&self, id: &PromptId, draft: PromptDraft) -> PromptResult<String> {
        let definition = codec::complete_draft(draft);
        let location = self.hub.push_prompt(id, &definition).await?;
        info!("Created prompt at {}", location);
        Ok(location)
    }

    /// Merge a partial update into an existing prompt and republish it.
    #[instrument(skip(self, update), fields(prompt = %id))]
    pub async fn update_prompt(&self, id: &PromptId, update: PromptUpdate) -> PromptResult<String> {
        self.ensure_exists(id).await?;

        let (record, remote) =
            futures::try_join!(self.hub.get_prompt(id), self.hub.pull_template(id))?;

        let definition = codec::merge_update(id, update, record, remote)?;
        let location = self.hub.push_prompt(id, &definition).await?;
        info!("Updated prompt at {}", location);
        Ok(location)
    }

    /// Delete an existing prompt.
    #[instrument(skip(self), fields(prompt = %id))]
    pub async fn delete_prompt(&self, id: &PromptId) -> PromptResult<()> {
        self.ensure_exists(id).await?;
        self.hub.delete_prompt(id).await?;
        info!("Deleted prompt");
        Ok(())
    }

    async fn ensure_exists(&self, id: &PromptId) -> PromptResult<()> {
        if self.hub.prompt_exists(id).await? {
            Ok(())
        } else {
            warn!("Prompt {} does not exist", id);
            Err(PromptError::not_found(id.to_string()))
        }
    }
}
