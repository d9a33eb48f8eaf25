//! Create command handler.

use clap::Args;
use serde_json::{Value, json};

use super::{PromptFields, arguments};
use crate::core::Result;
use crate::domains::prompts::codec;
use crate::domains::tools::{Operation, ToolRegistry};

/// Create a prompt (overwrites an existing prompt with the same id)
#[derive(Args, Debug)]
pub struct CreateCommand {
    /// Prompt identifier (owner/name)
    pub prompt_id: String,

    #[command(flatten)]
    pub fields: PromptFields,

    /// Make the prompt public
    #[arg(long)]
    pub public: bool,
}

impl CreateCommand {
    /// Execute the create command.
    pub async fn execute(&self, registry: &ToolRegistry, api_key: Option<&str>) -> Result<String> {
        let template = codec::require_text(
            "template",
            self.fields.template.clone(),
            self.fields.template_file.as_deref(),
        )?;

        let mut args = arguments(Some(&self.prompt_id), api_key);
        args.insert("template".to_string(), json!(template));
        self.fields.apply(&mut args)?;
        if self.public {
            args.insert("isPublic".to_string(), json!(true));
        }

        let reply = registry
            .call(Operation::Create, Value::Object(args), None)
            .await?;
        Ok(reply.summary)
    }
}
