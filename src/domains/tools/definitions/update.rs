//! Update tool definition.
//!
//! Every field is optional; absent fields keep their current remote value.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{PromptTool, TemplateVariables, non_blank, parse_format};
use crate::domains::prompts::codec;
use crate::domains::prompts::{
    PromptError, PromptId, PromptManager, PromptUpdate, TemplateFormat,
};
use crate::domains::tools::registry::Operation;

/// Parameters for the update tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptUpdateParams {
    /// Prompt identifier, `owner/name`.
    pub prompt_id: String,

    /// New template body.
    #[serde(default)]
    pub template: Option<String>,

    /// New template format, `mustache` or `f-string`.
    #[serde(default)]
    #[schemars(with = "Option<TemplateFormat>")]
    pub format: Option<String>,

    /// New variable names, in any accepted shape.
    #[serde(default)]
    #[schemars(with = "Option<TemplateVariables>")]
    pub variables: Option<Value>,

    /// New tags, replacing the current ones.
    #[serde(default)]
    pub tags: Option<Vec<String>>,

    /// New description.
    #[serde(default)]
    pub description: Option<String>,

    /// New readme.
    #[serde(default)]
    pub readme: Option<String>,

    /// New visibility.
    #[serde(default)]
    pub is_public: Option<bool>,

    /// API key overriding the bearer token and environment.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Result of an update operation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptUpdateOutput {
    pub prompt_id: String,
    pub url: String,
}

/// Update tool.
pub struct PromptUpdateTool;

#[async_trait]
impl PromptTool for PromptUpdateTool {
    const OPERATION: Operation = Operation::Update;
    type Params = PromptUpdateParams;
    type Output = PromptUpdateOutput;

    fn api_key(params: &Self::Params) -> Option<&str> {
        non_blank(&params.api_key)
    }

    async fn run(
        manager: &PromptManager,
        params: Self::Params,
    ) -> Result<Self::Output, PromptError> {
        let id = PromptId::parse(&params.prompt_id)?;
        let update = PromptUpdate {
            template_format: parse_format(params.format.as_deref())?,
            template: params.template,
            template_variables: params
                .variables
                .map(codec::normalize_variables)
                .transpose()?,
            description: params.description,
            readme: params.readme,
            tags: params.tags,
            is_public: params.is_public,
        };

        let url = manager.update_prompt(&id, update).await?;
        Ok(PromptUpdateOutput {
            prompt_id: params.prompt_id,
            url,
        })
    }

    fn summary(output: &Self::Output) -> String {
        format!("Updated prompt {} at {}", output.prompt_id, output.url)
    }
}
