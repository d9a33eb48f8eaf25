//! Create tool definition.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{PromptTool, TemplateVariables, non_blank, parse_format};
use crate::domains::prompts::codec;
use crate::domains::prompts::{PromptDraft, PromptError, PromptId, PromptManager, TemplateFormat};
use crate::domains::tools::registry::Operation;

/// Parameters for the create tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptCreateParams {
    /// Prompt identifier, `owner/name`.
    pub prompt_id: String,

    /// Template body.
    pub template: String,

    /// Template format, `mustache` (default) or `f-string`.
    #[serde(default)]
    #[schemars(with = "Option<TemplateFormat>")]
    pub format: Option<String>,

    /// Variable names: an array of strings, an array of `{name}` objects,
    /// or an object whose keys are the names.
    #[serde(default)]
    #[schemars(with = "Option<TemplateVariables>")]
    pub variables: Option<Value>,

    /// Tags attached to the prompt.
    #[serde(default)]
    pub tags: Option<Vec<String>>,

    /// Short description.
    #[serde(default)]
    pub description: Option<String>,

    /// Long-form readme.
    #[serde(default)]
    pub readme: Option<String>,

    /// Publish publicly. Defaults to private.
    #[serde(default)]
    pub is_public: Option<bool>,

    /// API key overriding the bearer token and environment.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Result of a create operation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptCreateOutput {
    pub prompt_id: String,
    pub url: String,
}

/// Create tool.
pub struct PromptCreateTool;

#[async_trait]
impl PromptTool for PromptCreateTool {
    const OPERATION: Operation = Operation::Create;
    type Params = PromptCreateParams;
    type Output = PromptCreateOutput;

    fn api_key(params: &Self::Params) -> Option<&str> {
        non_blank(&params.api_key)
    }

    async fn run(
        manager: &PromptManager,
        params: Self::Params,
    ) -> Result<Self::Output, PromptError> {
        let id = PromptId::parse(&params.prompt_id)?;
        let template_format = parse_format(params.format.as_deref())?;
        let template_variables = params
            .variables
            .map(codec::normalize_variables)
            .transpose()?;

        let draft = PromptDraft {
            template_format,
            template_variables,
            tags: params.tags,
            description: params.description,
            readme: params.readme,
            is_public: params.is_public,
            ..PromptDraft::new(params.template)
        };

        let url = manager.create_prompt(&id, draft).await?;
        Ok(PromptCreateOutput {
            prompt_id: params.prompt_id,
            url,
        })
    }

    fn summary(output: &Self::Output) -> String {
        format!("Created prompt {} at {}", output.prompt_id, output.url)
    }
}
