//! STDIO transport implementation.
//!
//! MCP over stdin/stdout. Logs go to stderr so they never corrupt the stream.
//! There is no request header here, so tool calls resolve their API key from
//! the `apiKey` argument or the environment.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Serve one MCP session over stdin/stdout until the client disconnects.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!(
            "Ready - serving {} prompt tools via stdin/stdout",
            server.list_tools().len()
        );

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        service
            .waiting()
            .await
            .map_err(|e| TransportError::ServiceError(e.to_string()))?;

        info!("STDIO session closed");
        Ok(())
    }
}
