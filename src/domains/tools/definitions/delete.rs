//! Delete tool definition.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{PromptTool, non_blank};
use crate::domains::prompts::{PromptError, PromptId, PromptManager};
use crate::domains::tools::registry::Operation;

/// Parameters for the delete tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptDeleteParams {
    /// Prompt identifier, `owner/name`.
    pub prompt_id: String,

    /// API key overriding the bearer token and environment.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Result of a delete operation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptDeleteOutput {
    pub prompt_id: String,
    pub deleted: bool,
}

/// Delete tool.
pub struct PromptDeleteTool;

#[async_trait]
impl PromptTool for PromptDeleteTool {
    const OPERATION: Operation = Operation::Delete;
    type Params = PromptDeleteParams;
    type Output = PromptDeleteOutput;

    fn api_key(params: &Self::Params) -> Option<&str> {
        non_blank(&params.api_key)
    }

    async fn run(
        manager: &PromptManager,
        params: Self::Params,
    ) -> Result<Self::Output, PromptError> {
        let id = PromptId::parse(&params.prompt_id)?;
        manager.delete_prompt(&id).await?;
        Ok(PromptDeleteOutput {
            prompt_id: params.prompt_id,
            deleted: true,
        })
    }

    fn summary(output: &Self::Output) -> String {
        format!("Deleted prompt {}", output.prompt_id)
    }
}
