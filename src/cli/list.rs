//! List command handler.

use clap::Args;
use serde_json::{Value, json};

use super::{arguments, render};
use crate::core::Result;
use crate::domains::tools::{Operation, ToolRegistry};

/// List your private prompts, most recently updated first
#[derive(Args, Debug)]
pub struct ListCommand {
    /// Only show prompts whose handle contains this text
    #[arg(short, long)]
    pub query: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListCommand {
    /// Execute the list command.
    pub async fn execute(&self, registry: &ToolRegistry, api_key: Option<&str>) -> Result<String> {
        let mut args = arguments(None, api_key);
        if let Some(query) = &self.query {
            args.insert("query".to_string(), json!(query));
        }

        let reply = registry
            .call(Operation::List, Value::Object(args), None)
            .await?;
        render(&reply, self.json)
    }
}
