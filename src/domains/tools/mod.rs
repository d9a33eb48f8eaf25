//! Tools domain module.
//!
//! The uniform tool surface: the five prompt operations exposed identically
//! through the CLI, MCP and JSON-RPC.
//!
//! ## Architecture
//!
//! - `definitions/` - One [`PromptTool`] per operation (params, output, run)
//! - `registry.rs` - The operation name table and dispatch by name
//! - `router.rs` - rmcp ToolRouter builder for the STDIO transport
//! - `context.rs` - Per-call credential resolution and manager construction
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Operation
//!
//! 1. Add a variant to `Operation` and a row to `OPERATIONS` in `registry.rs`
//! 2. Create a file in `definitions/` implementing `PromptTool`
//! 3. Add the arm in `ToolRegistry::call` and the route in `router.rs`
//!
//! [`PromptTool`]: definitions::PromptTool

mod context;
pub mod definitions;
mod error;
mod registry;
pub mod router;

pub use context::ToolContext;
pub use definitions::ToolReply;
pub use error::ToolError;
pub use registry::{OPERATIONS, Operation, OperationSpec, ToolRegistry};
pub use router::build_tool_router;
