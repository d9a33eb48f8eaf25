//! Command-line interface.
//!
//! Each prompt subcommand turns its flags into the same JSON arguments the
//! MCP and JSON-RPC transports receive and runs them through the
//! [`ToolRegistry`], so the CLI cannot drift from the other surfaces.
//! Flag-level validation (conflicting sources, unreadable files, malformed
//! JSON) happens here, before any credential or hub access.

pub mod create;
pub mod delete;
pub mod list;
pub mod serve;
pub mod show;
pub mod update;

use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Instrument, info};

use crate::core::{Config, Result};
use crate::domains::prompts::{PromptError, TemplateFormat, codec};
use crate::domains::tools::{ToolContext, ToolRegistry, ToolReply};

pub use create::CreateCommand;
pub use delete::DeleteCommand;
pub use list::ListCommand;
pub use serve::ServeCommand;
pub use show::ShowCommand;
pub use update::UpdateCommand;

/// Manage prompts in the LangSmith prompt hub
#[derive(Parser, Debug)]
#[command(name = "prompthub")]
#[command(about = "Manage prompts in the LangSmith prompt hub", long_about = None)]
#[command(version)]
pub struct Cli {
    /// LangSmith API key (overrides LANGSMITH_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List your private prompts
    List(ListCommand),

    /// Render a prompt
    Show(ShowCommand),

    /// Create a prompt
    Create(CreateCommand),

    /// Update an existing prompt
    Update(UpdateCommand),

    /// Delete a prompt
    Delete(DeleteCommand),

    /// Run the MCP server
    Serve(ServeCommand),
}

impl Cli {
    /// Log level for this invocation.
    ///
    /// `--log-level` wins, then `--verbose`. The server logs at the
    /// configured level; one-shot commands stay quiet unless asked.
    pub fn log_level(&self, config: &Config) -> String {
        if let Some(level) = &self.log_level {
            return level.clone();
        }
        if self.verbose {
            return "debug".to_string();
        }
        match self.command {
            Commands::Serve(_) => config.logging.level.clone(),
            _ => "warn".to_string(),
        }
    }
}

/// Run the parsed command line.
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let command_name = match &cli.command {
        Commands::List(_) => "list",
        Commands::Show(_) => "show",
        Commands::Create(_) => "create",
        Commands::Update(_) => "update",
        Commands::Delete(_) => "delete",
        Commands::Serve(_) => "serve",
    };

    execute(cli, config)
        .instrument(tracing::info_span!("command", name = command_name))
        .await
}

async fn execute(cli: Cli, config: Config) -> Result<()> {
    let registry = ToolRegistry::new(ToolContext::from_config(Arc::new(config.clone())));
    let api_key = cli.api_key.as_deref();

    let result = match &cli.command {
        Commands::Serve(cmd) => return cmd.execute(config).await,
        Commands::List(cmd) => cmd.execute(&registry, api_key).await,
        Commands::Show(cmd) => cmd.execute(&registry, api_key).await,
        Commands::Create(cmd) => cmd.execute(&registry, api_key).await,
        Commands::Update(cmd) => cmd.execute(&registry, api_key).await,
        Commands::Delete(cmd) => cmd.execute(&registry, api_key).await,
    };

    let output = result?;
    info!("Command completed successfully");
    println!("{}", output);
    Ok(())
}

/// Start the argument object for a prompt operation.
pub(crate) fn arguments(prompt_id: Option<&str>, api_key: Option<&str>) -> Map<String, Value> {
    let mut args = Map::new();
    if let Some(prompt_id) = prompt_id {
        args.insert("promptId".to_string(), json!(prompt_id));
    }
    if let Some(api_key) = api_key {
        args.insert("apiKey".to_string(), json!(api_key));
    }
    args
}

/// Render a reply as the summary text or as pretty JSON.
pub(crate) fn render(reply: &ToolReply, as_json: bool) -> Result<String> {
    if as_json {
        Ok(serde_json::to_string_pretty(&reply.structured)?)
    } else {
        Ok(reply.summary.clone())
    }
}

/// Prompt metadata flags shared by `create` and `update`.
#[derive(Args, Debug, Clone, Default)]
pub struct PromptFields {
    /// Template body
    #[arg(long)]
    pub template: Option<String>,

    /// Read the template body from a file
    #[arg(long, value_name = "PATH")]
    pub template_file: Option<PathBuf>,

    /// Template format (mustache, f-string)
    #[arg(long)]
    pub format: Option<String>,

    /// Variable names as JSON: ["a","b"], [{"name":"a"}] or {"a":"..."}
    #[arg(long, value_name = "JSON")]
    pub variables: Option<String>,

    /// Tags as a JSON array of strings
    #[arg(long, value_name = "JSON")]
    pub tags: Option<String>,

    /// Short description
    #[arg(long)]
    pub description: Option<String>,

    /// Readme text
    #[arg(long)]
    pub readme: Option<String>,

    /// Read the readme from a file
    #[arg(long, value_name = "PATH")]
    pub readme_file: Option<PathBuf>,
}

impl PromptFields {
    /// Template body from `--template` or `--template-file`.
    pub fn template(&self) -> std::result::Result<Option<String>, PromptError> {
        codec::resolve_text(
            "template",
            self.template.clone(),
            self.template_file.as_deref(),
        )
    }

    /// Validate every optional flag and add it to `args`.
    pub fn apply(&self, args: &mut Map<String, Value>) -> std::result::Result<(), PromptError> {
        if let Some(format) = &self.format {
            let format: TemplateFormat = format.parse()?;
            args.insert("format".to_string(), json!(format));
        }
        if let Some(raw) = &self.variables {
            args.insert("variables".to_string(), json!(codec::parse_variables(raw)?));
        }
        if let Some(raw) = &self.tags {
            args.insert("tags".to_string(), json!(codec::parse_tags(raw)?));
        }
        if let Some(description) = &self.description {
            args.insert("description".to_string(), json!(description));
        }
        let readme = codec::resolve_text(
            "readme",
            self.readme.clone(),
            self.readme_file.as_deref(),
        )?;
        if let Some(readme) = readme {
            args.insert("readme".to_string(), json!(readme));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::OPERATIONS;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_subcommands_match_registry() {
        let command = Cli::command();
        for spec in OPERATIONS {
            assert!(
                command.find_subcommand(spec.cli_command).is_some(),
                "missing subcommand {}",
                spec.cli_command
            );
        }
    }

    #[test]
    fn test_log_level_resolution() {
        let config = Config::default();

        let cli = Cli::try_parse_from(["prompthub", "list"]).unwrap();
        assert_eq!(cli.log_level(&config), "warn");

        let cli = Cli::try_parse_from(["prompthub", "-v", "list"]).unwrap();
        assert_eq!(cli.log_level(&config), "debug");

        let cli = Cli::try_parse_from(["prompthub", "list", "--log-level", "trace"]).unwrap();
        assert_eq!(cli.log_level(&config), "trace");

        let cli = Cli::try_parse_from(["prompthub", "serve"]).unwrap();
        assert_eq!(cli.log_level(&config), config.logging.level);
    }

    #[test]
    fn test_global_api_key_after_subcommand() {
        let cli = Cli::try_parse_from(["prompthub", "delete", "acme/p", "--api-key", "k"]).unwrap();
        assert_eq!(cli.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn test_fields_apply_normalizes() {
        let fields = PromptFields {
            format: Some("F-String".to_string()),
            variables: Some(r#"{"name":"x","role":"y"}"#.to_string()),
            tags: Some(r#"["a"]"#.to_string()),
            ..Default::default()
        };
        let mut args = Map::new();
        fields.apply(&mut args).unwrap();
        assert_eq!(args["format"], "f-string");
        assert_eq!(args["variables"], json!(["name", "role"]));
        assert_eq!(args["tags"], json!(["a"]));
    }

    #[test]
    fn test_fields_reject_malformed_json() {
        let fields = PromptFields {
            tags: Some("a,b".to_string()),
            ..Default::default()
        };
        let err = fields.apply(&mut Map::new()).unwrap_err();
        assert!(matches!(err, PromptError::InvalidInputFormat(_)));
    }
}
