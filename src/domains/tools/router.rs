//! Tool Router - builds the rmcp ToolRouter for the STDIO transport.
//!
//! Routes are generated from the same [`PromptTool`] definitions the
//! registry dispatches, so both transports expose identical tools.
//!
//! [`PromptTool`]: super::definitions::PromptTool

use rmcp::handler::server::tool::ToolRouter;

use super::context::ToolContext;
use super::definitions::{
    PromptCreateTool, PromptDeleteTool, PromptShowTool, PromptUpdateTool, PromptsListTool,
    create_route,
};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(ctx: ToolContext) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(create_route::<PromptsListTool, S>(ctx.clone()))
        .with_route(create_route::<PromptShowTool, S>(ctx.clone()))
        .with_route(create_route::<PromptCreateTool, S>(ctx.clone()))
        .with_route(create_route::<PromptUpdateTool, S>(ctx.clone()))
        .with_route(create_route::<PromptDeleteTool, S>(ctx))
}
