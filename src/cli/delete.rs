//! Delete command handler.

use clap::Args;
use serde_json::Value;

use super::arguments;
use crate::core::Result;
use crate::domains::tools::{Operation, ToolRegistry};

/// Delete a prompt
#[derive(Args, Debug)]
pub struct DeleteCommand {
    /// Prompt identifier (owner/name)
    pub prompt_id: String,
}

impl DeleteCommand {
    /// Execute the delete command.
    pub async fn execute(&self, registry: &ToolRegistry, api_key: Option<&str>) -> Result<String> {
        let args = arguments(Some(&self.prompt_id), api_key);
        let reply = registry
            .call(Operation::Delete, Value::Object(args), None)
            .await?;
        Ok(reply.summary)
    }
}
