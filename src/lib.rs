//! Prompt Hub MCP Library
//!
//! Manage prompt templates stored in the LangSmith prompt hub through a CLI,
//! an MCP server (STDIO or HTTP) and a JSON-RPC endpoint. All three surfaces
//! expose the same five operations: list, show, create, update and delete.
//!
//! # Architecture
//!
//! - **cli**: `prompthub` subcommands
//! - **core**: configuration, error handling, the MCP server and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **prompts**: the prompt lifecycle manager, codec, renderer and hub client
//!   - **tools**: the operation registry and tool definitions
//!
//! # Example
//!
//! ```rust,no_run
//! use prompt_hub_mcp::{core::McpServer, core::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config);
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
