//! Show tool definition.
//!
//! Renders a prompt with the supplied variables. An absent prompt is a
//! normal outcome reported as `prompt: null`, not an error.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{PromptTool, non_blank};
use crate::domains::prompts::codec;
use crate::domains::prompts::{PromptError, PromptId, PromptManager};
use crate::domains::tools::registry::Operation;

/// Parameters for the show tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptShowParams {
    /// Prompt identifier, `owner/name`.
    pub prompt_id: String,

    /// Values substituted into the template, keyed by variable name.
    #[serde(default)]
    pub variables: Map<String, Value>,

    /// API key overriding the bearer token and environment.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Result of a show operation. Field order is part of the output contract.
#[derive(Debug, Serialize)]
pub struct PromptShowOutput {
    pub id: String,
    pub variables: Map<String, Value>,
    pub prompt: Option<String>,
}

/// Show tool.
pub struct PromptShowTool;

#[async_trait]
impl PromptTool for PromptShowTool {
    const OPERATION: Operation = Operation::Show;
    type Params = PromptShowParams;
    type Output = PromptShowOutput;

    fn api_key(params: &Self::Params) -> Option<&str> {
        non_blank(&params.api_key)
    }

    async fn run(
        manager: &PromptManager,
        params: Self::Params,
    ) -> Result<Self::Output, PromptError> {
        let id = PromptId::parse(&params.prompt_id)?;
        let values = codec::variable_values(&params.variables);
        let prompt = manager.get_prompt(&id, Some(&values)).await?;

        Ok(PromptShowOutput {
            id: params.prompt_id,
            variables: params.variables,
            prompt,
        })
    }

    fn summary(output: &Self::Output) -> String {
        match &output.prompt {
            Some(prompt) => prompt.clone(),
            None => format!("Prompt not found: {}", output.id),
        }
    }
}
