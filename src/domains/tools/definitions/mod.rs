//! Tool definitions module.
//!
//! Each prompt operation is defined in its own file as a [`PromptTool`]:
//! a params struct (the JSON schema every transport shares), an output
//! struct, and the call into the [`PromptManager`]. The MCP route, the
//! JSON-RPC dispatch and the tool metadata are all derived from that one
//! definition by the generic functions below.

pub mod create;
pub mod delete;
pub mod list;
pub mod show;
pub mod update;

use async_trait::async_trait;
use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Content, Tool},
};
use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::info;

use super::context::ToolContext;
use super::error::ToolError;
use super::registry::Operation;
use crate::domains::prompts::{PromptError, PromptManager, TemplateFormat};

pub use create::{PromptCreateParams, PromptCreateTool};
pub use delete::{PromptDeleteParams, PromptDeleteTool};
pub use list::{PromptsListParams, PromptsListTool};
pub use show::{PromptShowParams, PromptShowTool};
pub use update::{PromptUpdateParams, PromptUpdateTool};

/// A prompt operation exposed as a tool.
#[async_trait]
pub trait PromptTool: Send + Sync + 'static {
    /// Registry entry this tool implements.
    const OPERATION: Operation;

    /// Call arguments, shared by every transport.
    type Params: DeserializeOwned + JsonSchema + Send + Sync + 'static;

    /// Machine-readable result.
    type Output: Serialize + Send + Sync + 'static;

    /// Per-call API key override carried in the arguments.
    fn api_key(params: &Self::Params) -> Option<&str>;

    /// Run the operation.
    async fn run(manager: &PromptManager, params: Self::Params)
    -> Result<Self::Output, PromptError>;

    /// Human-readable summary of the result.
    fn summary(output: &Self::Output) -> String;
}

/// Outcome of a successful tool call, in both renderings.
#[derive(Debug, Clone)]
pub struct ToolReply {
    pub summary: String,
    pub structured: Value,
}

impl ToolReply {
    /// MCP rendering: text summary plus structured content.
    pub fn into_call_result(self) -> CallToolResult {
        CallToolResult {
            content: vec![Content::text(self.summary)],
            structured_content: Some(self.structured),
            is_error: Some(false),
            meta: None,
        }
    }
}

/// MCP tool metadata for `T`.
pub fn to_tool<T: PromptTool>() -> Tool {
    let spec = T::OPERATION.spec();
    Tool {
        name: spec.mcp_tool.into(),
        description: Some(spec.description.into()),
        input_schema: cached_schema_for_type::<T::Params>(),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Decode arguments, resolve credentials and run `T`.
pub async fn dispatch<T: PromptTool>(
    ctx: &ToolContext,
    arguments: Value,
    bearer: Option<&str>,
) -> Result<ToolReply, ToolError> {
    let params: T::Params = serde_json::from_value(arguments)
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;

    let manager = ctx.manager(T::api_key(&params), bearer)?;

    info!("Running {}", T::OPERATION.spec().mcp_tool);
    let output = T::run(&manager, params).await?;

    let structured =
        serde_json::to_value(&output).map_err(|e| ToolError::internal(e.to_string()))?;
    Ok(ToolReply {
        summary: T::summary(&output),
        structured,
    })
}

/// Create a ToolRoute for the rmcp router (STDIO transport).
pub fn create_route<T, S>(ctx: ToolContext) -> ToolRoute<S>
where
    T: PromptTool,
    S: Send + Sync + 'static,
{
    ToolRoute::new_dyn(to_tool::<T>(), move |call: ToolCallContext<'_, S>| {
        let args = call.arguments.clone().unwrap_or_default();
        let ctx = ctx.clone();
        async move {
            match dispatch::<T>(&ctx, Value::Object(args), None).await {
                Ok(reply) => Ok(reply.into_call_result()),
                Err(e) => e.into_call_result(),
            }
        }
        .boxed()
    })
}

/// Published schema of the `variables` argument.
///
/// The argument is decoded as raw JSON so malformed shapes surface as
/// `InvalidInputFormat`; this mirror only describes the accepted shapes.
#[derive(JsonSchema)]
#[serde(untagged)]
#[allow(dead_code)]
pub(crate) enum TemplateVariables {
    /// Variable names.
    Names(Vec<String>),
    /// Objects carrying the name under `name` or `key`.
    Objects(Vec<VariableObject>),
    /// An object whose keys are the names; values are ignored.
    Keyed(Map<String, Value>),
}

#[derive(JsonSchema)]
#[allow(dead_code)]
pub(crate) struct VariableObject {
    name: Option<String>,
    key: Option<String>,
}

/// Parse a `format` argument with the same aliases the CLI accepts.
pub(crate) fn parse_format(raw: Option<&str>) -> Result<Option<TemplateFormat>, PromptError> {
    raw.map(str::parse).transpose()
}

/// Treat blank optional strings as absent.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
