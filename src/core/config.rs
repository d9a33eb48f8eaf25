//! Configuration management for the prompt hub server and CLI.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (and a `.env` file) or defaults.

use super::transport::TransportConfig;
use crate::domains::prompts::PromptError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default LangSmith API base URL.
pub const DEFAULT_API_URL: &str = "https://api.smith.langchain.com";

/// Default LangSmith web URL, used to build prompt locations.
pub const DEFAULT_WEB_URL: &str = "https://smith.langchain.com";

/// Main configuration structure.
///
/// This struct contains all configurable aspects of the server, organized
/// by concern for clarity and maintainability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Prompt hub credentials.
    pub credentials: CredentialsConfig,

    /// Prompt hub endpoints.
    pub hub: HubConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Prompt hub credentials.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Environment fallback API key (`LANGSMITH_API_KEY`).
    pub langsmith_api_key: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field(
                "langsmith_api_key",
                &self.langsmith_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl CredentialsConfig {
    /// Resolve the API key for one call.
    ///
    /// Precedence: explicit per-call override, then bearer token, then the
    /// environment fallback. Blank values count as absent.
    pub fn resolve(
        &self,
        explicit: Option<&str>,
        bearer: Option<&str>,
    ) -> Result<String, PromptError> {
        [explicit, bearer, self.langsmith_api_key.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|key| !key.is_empty())
            .map(str::to_string)
            .ok_or(PromptError::MissingCredential)
    }
}

/// Prompt hub endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// REST API base URL.
    pub api_url: String,

    /// Web UI base URL.
    pub web_url: String,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            web_url: DEFAULT_WEB_URL.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "prompt-hub-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            credentials: CredentialsConfig::default(),
            hub: HubConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, `MCP_TRANSPORT`, ...); hub settings use the
    /// LangSmith names (`LANGSMITH_API_KEY`, `LANGSMITH_ENDPOINT`).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();

        match std::env::var("LANGSMITH_API_KEY") {
            Ok(api_key) if !api_key.trim().is_empty() => {
                config.credentials.langsmith_api_key = Some(api_key);
                debug!("LangSmith API key loaded from environment");
            }
            _ => warn!(
                "LANGSMITH_API_KEY not set - every call must supply its own API key"
            ),
        }

        if let Ok(api_url) = std::env::var("LANGSMITH_ENDPOINT") {
            config.hub.api_url = api_url;
        }

        if let Ok(web_url) = std::env::var("LANGSMITH_WEB_URL") {
            config.hub.web_url = web_url;
        }

        config
    }
}
