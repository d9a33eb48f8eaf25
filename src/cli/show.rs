//! Show command handler.
//!
//! Renders a prompt to stdout, or to a file with `--save`. With `--json`
//! the JSON document is what gets printed or saved.

use clap::Args;
use serde_json::{Map, Value, json};
use std::path::PathBuf;
use tracing::info;

use super::{arguments, render};
use crate::core::Result;
use crate::domains::prompts::{PromptError, codec};
use crate::domains::tools::{Operation, ToolRegistry};

/// Render a prompt with variables
#[derive(Args, Debug)]
pub struct ShowCommand {
    /// Prompt identifier (owner/name)
    pub prompt_id: String,

    /// Template variable as key=value (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,

    /// Output as JSON ({id, variables, prompt})
    #[arg(long)]
    pub json: bool,

    /// Write the output (rendered prompt, or JSON with --json) to a file
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,
}

impl ShowCommand {
    /// Execute the show command.
    pub async fn execute(&self, registry: &ToolRegistry, api_key: Option<&str>) -> Result<String> {
        let mut variables = Map::new();
        for raw in &self.vars {
            let (key, value) = codec::parse_variable_pair(raw)?;
            variables.insert(key, json!(value));
        }

        let mut args = arguments(Some(&self.prompt_id), api_key);
        args.insert("variables".to_string(), Value::Object(variables));

        let reply = registry
            .call(Operation::Show, Value::Object(args), None)
            .await?;

        let output = if self.json {
            render(&reply, true)?
        } else {
            reply.structured["prompt"]
                .as_str()
                .ok_or_else(|| PromptError::not_found(self.prompt_id.clone()))?
                .to_string()
        };

        match &self.save {
            Some(path) => {
                std::fs::write(path, &output)?;
                info!("Saved rendered prompt to {}", path.display());
                Ok(format!("Saved {} to {}", self.prompt_id, path.display()))
            }
            None => Ok(output),
        }
    }
}
