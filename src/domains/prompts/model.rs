//! Prompt data model.
//!
//! - [`PromptDefinition`]: the complete desired state of a prompt
//! - [`PromptDraft`]: create-time input, template required, rest defaulted
//! - [`PromptUpdate`]: partial state, absent fields are left untouched
//! - [`PromptRecord`]: read-only metadata projection returned by the hub

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::PromptError;

/// Owner segment the hub resolves to the caller's own workspace.
pub const SELF_OWNER: &str = "-";

/// Substitution syntax of a template body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum TemplateFormat {
    /// `{{variable}}` placeholders.
    #[default]
    #[serde(rename = "mustache")]
    Mustache,

    /// `{variable}` placeholders.
    #[serde(rename = "f-string")]
    FString,
}

impl TemplateFormat {
    /// Wire name of the format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mustache => "mustache",
            Self::FString => "f-string",
        }
    }
}

impl fmt::Display for TemplateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateFormat {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mustache" => Ok(Self::Mustache),
            "f-string" | "fstring" | "f_string" => Ok(Self::FString),
            other => Err(PromptError::invalid_input(format!(
                "unknown template format '{}' (expected 'mustache' or 'f-string')",
                other
            ))),
        }
    }
}

/// Identity of a prompt on the hub: `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PromptId {
    owner: String,
    name: String,
}

impl PromptId {
    /// Parse `owner/name`. A bare `name` targets the caller's own workspace.
    pub fn parse(raw: &str) -> Result<Self, PromptError> {
        let raw = raw.trim();
        let (owner, name) = match raw.split_once('/') {
            Some((owner, name)) => (owner, name),
            None => (SELF_OWNER, raw),
        };

        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(PromptError::invalid_input(format!(
                "prompt id '{}' must have the form 'owner/name'",
                raw
            )));
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// The complete desired state of a prompt, as published to the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptDefinition {
    pub template: String,
    pub template_format: TemplateFormat,
    pub template_variables: Vec<String>,
    pub description: Option<String>,
    pub readme: Option<String>,
    pub tags: Vec<String>,
    pub is_public: bool,
}

/// Input for creating a prompt. Missing fields take codec defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptDraft {
    pub template: String,
    pub template_format: Option<TemplateFormat>,
    pub template_variables: Option<Vec<String>>,
    pub description: Option<String>,
    pub readme: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
}

impl PromptDraft {
    /// Create a draft with only a template body.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            ..Default::default()
        }
    }
}

/// A partial definition. `None` means "keep the remote value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptUpdate {
    pub template: Option<String>,
    pub template_format: Option<TemplateFormat>,
    pub template_variables: Option<Vec<String>>,
    pub description: Option<String>,
    pub readme: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
}

/// Read-only prompt metadata as reported by the hub.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRecord {
    pub prompt_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_public: bool,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub readme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_commits: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_commit_hash: Option<String>,
}

/// Serialized template state pulled from the hub's latest commit.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteTemplate {
    /// Only a JSON string is a usable template body; chat templates and
    /// other structured manifests arrive as non-string values.
    pub template: serde_json::Value,
    pub template_format: Option<TemplateFormat>,
    pub input_variables: Vec<String>,
}

/// Hub-side listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub query: Option<String>,
    pub is_public: Option<bool>,
    pub is_archived: bool,
}

impl ListFilter {
    /// Private, non-archived prompts, optionally narrowed by a handle query.
    pub fn private_active(query: Option<&str>) -> Self {
        Self {
            query: query
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(str::to_string),
            is_public: Some(false),
            is_archived: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prompt_id() {
        let id = PromptId::parse("acme/greeting").unwrap();
        assert_eq!(id.owner(), "acme");
        assert_eq!(id.name(), "greeting");
        assert_eq!(id.to_string(), "acme/greeting");
    }

    #[test]
    fn test_parse_bare_name_targets_own_workspace() {
        let id = PromptId::parse("greeting").unwrap();
        assert_eq!(id.owner(), SELF_OWNER);
        assert_eq!(id.to_string(), "-/greeting");
    }

    #[test]
    fn test_parse_prompt_id_rejects_malformed() {
        for raw in ["", "/greeting", "acme/", "a/b/c"] {
            let err = PromptId::parse(raw).unwrap_err();
            assert!(matches!(err, PromptError::InvalidInputFormat(_)), "{raw}");
        }
    }

    #[test]
    fn test_template_format_parsing() {
        assert_eq!("mustache".parse::<TemplateFormat>().unwrap(), TemplateFormat::Mustache);
        assert_eq!("F-String".parse::<TemplateFormat>().unwrap(), TemplateFormat::FString);
        assert_eq!("fstring".parse::<TemplateFormat>().unwrap(), TemplateFormat::FString);
        assert!("jinja2".parse::<TemplateFormat>().is_err());
    }

    #[test]
    fn test_template_format_wire_names() {
        assert_eq!(serde_json::to_value(TemplateFormat::FString).unwrap(), "f-string");
        assert_eq!(TemplateFormat::default(), TemplateFormat::Mustache);
    }

    #[test]
    fn test_private_active_filter() {
        let filter = ListFilter::private_active(Some("  "));
        assert_eq!(filter.query, None);
        assert_eq!(filter.is_public, Some(false));
        assert!(!filter.is_archived);

        let filter = ListFilter::private_active(Some("greet"));
        assert_eq!(filter.query.as_deref(), Some("greet"));
    }
}
