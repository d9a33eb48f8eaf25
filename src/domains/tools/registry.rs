//! Tool Registry - central registration and dispatch for the prompt tools.
//!
//! [`OPERATIONS`] is the one table naming each operation on every transport:
//! the CLI subcommand, the MCP tool and the JSON-RPC method. The CLI, the
//! rmcp router and the HTTP transport all look names up here.

use serde_json::Value;
use tracing::warn;

use rmcp::model::Tool;

use super::context::ToolContext;
use super::definitions::{
    PromptCreateTool, PromptDeleteTool, PromptShowTool, PromptsListTool, PromptUpdateTool,
    ToolReply, dispatch, to_tool,
};
use super::error::ToolError;

/// The five prompt operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Show,
    Create,
    Update,
    Delete,
}

/// Names and description of one operation across transports.
#[derive(Debug, Clone, Copy)]
pub struct OperationSpec {
    pub operation: Operation,
    pub cli_command: &'static str,
    pub mcp_tool: &'static str,
    pub rpc_method: &'static str,
    pub description: &'static str,
}

/// Every operation, in display order.
pub const OPERATIONS: &[OperationSpec] = &[
    OperationSpec {
        operation: Operation::List,
        cli_command: "list",
        mcp_tool: "prompts_list",
        rpc_method: "list_prompts",
        description: "List your private prompts on the prompt hub, most recently updated first. \
                      Optionally filter by a search query.",
    },
    OperationSpec {
        operation: Operation::Show,
        cli_command: "show",
        mcp_tool: "prompt_show",
        rpc_method: "get_prompt",
        description: "Render a prompt with the given variables. \
                      Returns a null prompt when it does not exist.",
    },
    OperationSpec {
        operation: Operation::Create,
        cli_command: "create",
        mcp_tool: "prompt_create",
        rpc_method: "create_prompt",
        description: "Create a prompt on the prompt hub. An existing prompt with the same id \
                      is overwritten. Format defaults to mustache and visibility to private.",
    },
    OperationSpec {
        operation: Operation::Update,
        cli_command: "update",
        mcp_tool: "prompt_update",
        rpc_method: "update_prompt",
        description: "Update an existing prompt. Only the given fields change; \
                      everything else keeps its current value.",
    },
    OperationSpec {
        operation: Operation::Delete,
        cli_command: "delete",
        mcp_tool: "prompt_delete",
        rpc_method: "delete_prompt",
        description: "Delete an existing prompt from the prompt hub.",
    },
];

impl Operation {
    /// Registry entry for this operation.
    pub fn spec(self) -> &'static OperationSpec {
        match self {
            Self::List => &OPERATIONS[0],
            Self::Show => &OPERATIONS[1],
            Self::Create => &OPERATIONS[2],
            Self::Update => &OPERATIONS[3],
            Self::Delete => &OPERATIONS[4],
        }
    }

    /// Look up by MCP tool name or JSON-RPC method name.
    pub fn from_tool_name(name: &str) -> Option<Self> {
        OPERATIONS
            .iter()
            .find(|spec| spec.mcp_tool == name || spec.rpc_method == name)
            .map(|spec| spec.operation)
    }

    /// Look up by JSON-RPC method name only.
    pub fn from_rpc_method(method: &str) -> Option<Self> {
        OPERATIONS
            .iter()
            .find(|spec| spec.rpc_method == method)
            .map(|spec| spec.operation)
    }
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - lists and dispatches the prompt tools.
#[derive(Clone)]
pub struct ToolRegistry {
    ctx: ToolContext,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    /// Get all MCP tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        OPERATIONS.iter().map(|spec| spec.mcp_tool).collect()
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for tool metadata on every transport.
    pub fn get_all_tools() -> Vec<Tool> {
        OPERATIONS
            .iter()
            .map(|spec| match spec.operation {
                Operation::List => to_tool::<PromptsListTool>(),
                Operation::Show => to_tool::<PromptShowTool>(),
                Operation::Create => to_tool::<PromptCreateTool>(),
                Operation::Update => to_tool::<PromptUpdateTool>(),
                Operation::Delete => to_tool::<PromptDeleteTool>(),
            })
            .collect()
    }

    /// Run one operation with raw JSON arguments.
    pub async fn call(
        &self,
        operation: Operation,
        arguments: Value,
        bearer: Option<&str>,
    ) -> Result<ToolReply, ToolError> {
        let ctx = &self.ctx;
        match operation {
            Operation::List => dispatch::<PromptsListTool>(ctx, arguments, bearer).await,
            Operation::Show => dispatch::<PromptShowTool>(ctx, arguments, bearer).await,
            Operation::Create => dispatch::<PromptCreateTool>(ctx, arguments, bearer).await,
            Operation::Update => dispatch::<PromptUpdateTool>(ctx, arguments, bearer).await,
            Operation::Delete => dispatch::<PromptDeleteTool>(ctx, arguments, bearer).await,
        }
    }

    /// Dispatch a tool call by MCP tool or JSON-RPC method name.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
        bearer: Option<&str>,
    ) -> Result<ToolReply, ToolError> {
        match Operation::from_tool_name(name) {
            Some(operation) => self.call(operation, arguments, bearer).await,
            None => {
                warn!("Unknown tool requested: {}", name);
                Err(ToolError::not_found(name))
            }
        }
    }
}
