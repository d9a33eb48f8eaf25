//! Transport layer for the MCP server.
//!
//! This module provides two transport implementations:
//! - **STDIO**: MCP over standard input/output (default) - feature: `stdio`
//! - **HTTP**: JSON-RPC over POST requests, including the direct prompt
//!   methods (`list_prompts`, `get_prompt`, ...) - feature: `http`
//!
//! Each transport handles the connection lifecycle and delegates
//! message processing to the MCP server handler.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;
