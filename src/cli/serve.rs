//! Serve command handler.
//!
//! Runs the MCP server on the configured transport. `--http`, `--port` and
//! `--host` switch to the HTTP transport regardless of `MCP_TRANSPORT`.

use clap::Args;
use tracing::info;

use crate::core::{Config, McpServer, Result, TransportConfig, TransportService};

/// Run the MCP server (STDIO by default)
#[derive(Args, Debug, Default)]
pub struct ServeCommand {
    /// Serve JSON-RPC over HTTP instead of STDIO
    #[arg(long)]
    pub http: bool,

    /// HTTP port (implies --http)
    #[arg(long)]
    pub port: Option<u16>,

    /// HTTP bind address (implies --http)
    #[arg(long)]
    pub host: Option<String>,
}

impl ServeCommand {
    /// Execute the serve command.
    pub async fn execute(&self, mut config: Config) -> Result<()> {
        config.transport = self.transport(config.transport)?;

        info!("Starting {} v{}", config.server.name, config.server.version);

        let transport = TransportService::new(config.transport.clone());
        let server = McpServer::new(config);
        transport.run(server).await?;

        info!("Server shutting down");
        Ok(())
    }

    /// Apply the command-line overrides to the configured transport.
    pub fn transport(&self, configured: TransportConfig) -> Result<TransportConfig> {
        if !self.http && self.port.is_none() && self.host.is_none() {
            return Ok(configured);
        }

        #[cfg(feature = "http")]
        {
            let mut http = match configured {
                TransportConfig::Http(http) => http,
                #[allow(unreachable_patterns)]
                _ => crate::core::transport::HttpConfig::from_env(),
            };
            if let Some(port) = self.port {
                http.port = port;
            }
            if let Some(host) = &self.host {
                http.host = host.clone();
            }
            Ok(TransportConfig::Http(http))
        }

        #[cfg(not(feature = "http"))]
        {
            let _ = configured;
            Err(crate::core::Error::config("this build does not include the http transport"))
        }
    }
}
