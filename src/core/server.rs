//! MCP Server implementation and lifecycle management.
//!
//! The server exposes the prompt tools only. rmcp routes STDIO calls through
//! the generated [`ToolRouter`]; the HTTP transport dispatches through the
//! [`ToolRegistry`] so it can pass the request's bearer token along.

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use serde_json::Value;
use std::sync::Arc;

use super::config::Config;
use crate::domains::tools::{
    Operation, ToolContext, ToolError, ToolRegistry, ToolReply, build_tool_router,
};

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Registry used by the HTTP transport.
    registry: ToolRegistry,

    /// Tool router for handling MCP tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new server talking to the configured LangSmith hub.
    pub fn new(config: Config) -> Self {
        Self::with_context(ToolContext::from_config(Arc::new(config)))
    }

    /// Create a server over an existing tool context.
    pub fn with_context(ctx: ToolContext) -> Self {
        Self {
            config: ctx.config().clone(),
            tool_router: build_tool_router::<Self>(ctx.clone()),
            registry: ToolRegistry::new(ctx),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools in MCP wire shape.
    pub fn list_tools(&self) -> Vec<Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by MCP tool name or JSON-RPC method name.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
        bearer: Option<&str>,
    ) -> Result<ToolReply, ToolError> {
        self.registry.call_tool(name, arguments, bearer).await
    }

    /// Run an operation resolved ahead of time.
    pub async fn call_operation(
        &self,
        operation: Operation,
        arguments: Value,
        bearer: Option<&str>,
    ) -> Result<ToolReply, ToolError> {
        self.registry.call(operation, arguments, bearer).await
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Manage prompts stored in the LangSmith prompt hub: list, show, create, \
                 update and delete. Pass apiKey in the tool arguments or set \
                 LANGSMITH_API_KEY in the server environment."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}
