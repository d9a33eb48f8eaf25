//! Prompts domain module.
//!
//! This module manages prompt templates stored in a remote prompt hub.
//!
//! ## Architecture
//!
//! - `model.rs` - Prompt definitions, updates, records and identifiers
//! - `codec.rs` - Input normalization and merge-on-update
//! - `templates.rs` - Mustache and f-string rendering
//! - `hub/` - The prompt hub seam and its LangSmith client
//! - `manager.rs` - The lifecycle manager owning list/show/create/update/delete

pub mod codec;
mod error;
pub mod hub;
mod manager;
pub mod model;
pub mod templates;

pub use error::PromptError;
pub use hub::{HubConnector, HubError, LangSmithConnector, PromptHub};
pub use manager::{PromptManager, PromptResult};
pub use model::{
    PromptDefinition, PromptDraft, PromptId, PromptRecord, PromptUpdate, TemplateFormat,
};
