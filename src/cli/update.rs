//! Update command handler.
//!
//! Only flags that are given change; everything else keeps its current
//! value on the hub.

use clap::Args;
use serde_json::{Value, json};

use super::{PromptFields, arguments};
use crate::core::Result;
use crate::domains::prompts::codec;
use crate::domains::tools::{Operation, ToolRegistry};

/// Update an existing prompt
#[derive(Args, Debug)]
pub struct UpdateCommand {
    /// Prompt identifier (owner/name)
    pub prompt_id: String,

    #[command(flatten)]
    pub fields: PromptFields,

    /// Make the prompt public
    #[arg(long)]
    pub public: bool,

    /// Make the prompt private
    #[arg(long)]
    pub private: bool,
}

impl UpdateCommand {
    /// Execute the update command.
    pub async fn execute(&self, registry: &ToolRegistry, api_key: Option<&str>) -> Result<String> {
        let visibility = codec::resolve_visibility(self.public, self.private)?;

        let mut args = arguments(Some(&self.prompt_id), api_key);
        if let Some(template) = self.fields.template()? {
            args.insert("template".to_string(), json!(template));
        }
        self.fields.apply(&mut args)?;
        if let Some(is_public) = visibility {
            args.insert("isPublic".to_string(), json!(is_public));
        }

        let reply = registry
            .call(Operation::Update, Value::Object(args), None)
            .await?;
        Ok(reply.summary)
    }
}
