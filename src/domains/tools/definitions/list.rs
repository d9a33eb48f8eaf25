//! List tool definition.
//!
//! Lists the caller's private, non-archived prompts, newest first.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{PromptTool, non_blank};
use crate::domains::prompts::{PromptError, PromptManager, PromptRecord};
use crate::domains::tools::registry::Operation;

/// Parameters for the list tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptsListParams {
    /// Only return prompts whose handle contains this text.
    #[serde(default)]
    pub query: Option<String>,

    /// API key overriding the bearer token and environment.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Result of a list operation.
#[derive(Debug, Serialize)]
pub struct PromptListOutput {
    pub prompts: Vec<PromptRecord>,
    pub count: usize,
}

/// List tool.
pub struct PromptsListTool;

#[async_trait]
impl PromptTool for PromptsListTool {
    const OPERATION: Operation = Operation::List;
    type Params = PromptsListParams;
    type Output = PromptListOutput;

    fn api_key(params: &Self::Params) -> Option<&str> {
        non_blank(&params.api_key)
    }

    async fn run(
        manager: &PromptManager,
        params: Self::Params,
    ) -> Result<Self::Output, PromptError> {
        let prompts = manager.list_prompts(params.query.as_deref()).await?;
        Ok(PromptListOutput {
            count: prompts.len(),
            prompts,
        })
    }

    fn summary(output: &Self::Output) -> String {
        if output.prompts.is_empty() {
            return "No private prompts found".to_string();
        }

        let mut summary = format!("Found {} prompt(s):", output.count);
        for prompt in &output.prompts {
            summary.push_str(&format!(
                "\n- {} (updated {})",
                prompt.prompt_id,
                prompt.updated_at.format("%Y-%m-%d %H:%M")
            ));
            if let Some(description) = &prompt.description {
                summary.push_str(&format!(": {}", description));
            }
        }
        summary
    }
}
