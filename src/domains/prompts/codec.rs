//! Template codec.
//!
//! Normalizes the loosely shaped input accepted by the transports into the
//! canonical definition shape, and merges partial updates with remote state.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

use super::error::PromptError;
use super::model::{
    PromptDefinition, PromptDraft, PromptId, PromptRecord, PromptUpdate, RemoteTemplate,
};

/// The accepted shapes of template variable input.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableInput {
    /// `["name", "role"]`
    StringList(Vec<String>),
    /// `[{"name": "name"}, {"key": "role"}]`
    ObjectList(Vec<Map<String, Value>>),
    /// `{"name": "Ava", "role": "admin"}`, values discarded.
    KeyedMap(Map<String, Value>),
}

impl VariableInput {
    /// Classify a JSON value. Mixed or scalar input is rejected.
    pub fn from_json(value: Value) -> Result<Self, PromptError> {
        match value {
            Value::Object(map) => Ok(Self::KeyedMap(map)),
            Value::Array(items) if items.iter().all(Value::is_string) => Ok(Self::StringList(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            )),
            Value::Array(items) if items.iter().all(Value::is_object) => Ok(Self::ObjectList(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::Object(map) => Some(map),
                        _ => None,
                    })
                    .collect(),
            )),
            Value::Array(_) => Err(PromptError::invalid_input(
                "variables array must contain only strings or only objects",
            )),
            other => Err(PromptError::invalid_input(format!(
                "variables must be an array or an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Canonical ordered variable names.
    pub fn into_names(self) -> Result<Vec<String>, PromptError> {
        match self {
            Self::StringList(names) => Ok(names),
            Self::KeyedMap(map) => Ok(map.into_iter().map(|(key, _)| key).collect()),
            Self::ObjectList(objects) => objects
                .iter()
                .enumerate()
                .map(|(index, object)| {
                    object
                        .get("name")
                        .or_else(|| object.get("key"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .ok_or_else(|| {
                            PromptError::invalid_input(format!(
                                "variable object at index {} has no string 'name' or 'key' field",
                                index
                            ))
                        })
                })
                .collect(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Normalize an already-parsed variables value.
pub fn normalize_variables(value: Value) -> Result<Vec<String>, PromptError> {
    VariableInput::from_json(value)?.into_names()
}

/// Parse and normalize variables given as JSON text.
pub fn parse_variables(raw: &str) -> Result<Vec<String>, PromptError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| PromptError::invalid_input(format!("variables is not valid JSON: {}", e)))?;
    normalize_variables(value)
}

/// Parse tags given as a JSON array of strings.
pub fn parse_tags(raw: &str) -> Result<Vec<String>, PromptError> {
    serde_json::from_str::<Vec<String>>(raw).map_err(|e| {
        PromptError::invalid_input(format!("tags must be a JSON array of strings: {}", e))
    })
}

/// Split a `key=value` pair on the first `=`.
pub fn parse_variable_pair(raw: &str) -> Result<(String, String), PromptError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(PromptError::invalid_input(format!(
            "variable '{}' must have the form key=value",
            raw
        ))),
    }
}

/// Render-time variable values. Non-string JSON values use their JSON text.
pub fn variable_values(variables: &Map<String, Value>) -> HashMap<String, String> {
    variables
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), value)
        })
        .collect()
}

/// Resolve a text field supplied either inline or by file path.
///
/// `field` names the flag pair (`template` for `--template`/`--template-file`).
pub fn resolve_text(
    field: &str,
    inline: Option<String>,
    file: Option<&Path>,
) -> Result<Option<String>, PromptError> {
    match (inline, file) {
        (Some(_), Some(_)) => Err(PromptError::invalid_input(format!(
            "provide either --{field} or --{field}-file, not both"
        ))),
        (Some(text), None) => Ok(Some(text)),
        (None, Some(path)) => std::fs::read_to_string(path).map(Some).map_err(|e| {
            PromptError::invalid_input(format!(
                "cannot read {} file '{}': {}",
                field,
                path.display(),
                e
            ))
        }),
        (None, None) => Ok(None),
    }
}

/// Like [`resolve_text`], but one of the two sources is mandatory.
pub fn require_text(
    field: &str,
    inline: Option<String>,
    file: Option<&Path>,
) -> Result<String, PromptError> {
    resolve_text(field, inline, file)?.ok_or_else(|| {
        PromptError::invalid_input(format!("either --{field} or --{field}-file is required"))
    })
}

/// Resolve independent public/private flags into a visibility opinion.
pub fn resolve_visibility(public: bool, private: bool) -> Result<Option<bool>, PromptError> {
    match (public, private) {
        (true, true) => Err(PromptError::invalid_input(
            "a prompt cannot be both --public and --private",
        )),
        (true, false) => Ok(Some(true)),
        (false, true) => Ok(Some(false)),
        (false, false) => Ok(None),
    }
}

/// Fill create-time defaults into a draft.
pub fn complete_draft(draft: PromptDraft) -> PromptDefinition {
    PromptDefinition {
        template: draft.template,
        template_format: draft.template_format.unwrap_or_default(),
        template_variables: draft.template_variables.unwrap_or_default(),
        description: draft.description,
        readme: draft.readme,
        tags: draft.tags.unwrap_or_default(),
        is_public: draft.is_public.unwrap_or(false),
    }
}

/// Merge a partial update over the current remote state.
///
/// Precedence per field: update value, then remote value, then the codec
/// default (format only). The remote template is only consulted when the
/// update does not replace it, and then it must be a plain string.
pub fn merge_update(
    id: &PromptId,
    update: PromptUpdate,
    record: PromptRecord,
    remote: RemoteTemplate,
) -> Result<PromptDefinition, PromptError> {
    let template = match update.template {
        Some(template) => template,
        None => match remote.template {
            Value::String(template) => template,
            _ => return Err(PromptError::unsupported_template(id.to_string())),
        },
    };

    Ok(PromptDefinition {
        template,
        template_format: update
            .template_format
            .or(remote.template_format)
            .unwrap_or_default(),
        template_variables: update
            .template_variables
            .unwrap_or(remote.input_variables),
        description: update.description.or(record.description),
        readme: update.readme.or(record.readme),
        tags: update.tags.unwrap_or(record.tags),
        is_public: update.is_public.unwrap_or(record.is_public),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::prompts::model::TemplateFormat;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn record() -> PromptRecord {
        PromptRecord {
            prompt_id: "acme/greeting".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
            is_public: true,
            tags: vec!["greeting".to_string()],
            description: Some("Says hello".to_string()),
            readme: Some("# Greeting".to_string()),
            num_commits: Some(3),
            last_commit_hash: None,
        }
    }

    fn remote() -> RemoteTemplate {
        RemoteTemplate {
            template: json!("Hi {name}"),
            template_format: Some(TemplateFormat::FString),
            input_variables: vec!["name".to_string()],
        }
    }

    fn id() -> PromptId {
        PromptId::parse("acme/greeting").unwrap()
    }

    #[test]
    fn test_parse_string_list_variables() {
        assert_eq!(parse_variables(r#"["name","role"]"#).unwrap(), vec!["name", "role"]);
    }

    #[test]
    fn test_parse_keyed_map_variables_keeps_key_order() {
        assert_eq!(parse_variables(r#"{"name":"x"}"#).unwrap(), vec!["name"]);
        assert_eq!(
            parse_variables(r#"{"zeta":1,"alpha":2,"mid":3}"#).unwrap(),
            vec!["zeta", "alpha", "mid"]
        );
    }

    #[test]
    fn test_parse_object_list_variables() {
        let names = parse_variables(r#"[{"name":"topic"},{"key":"tone","default":"dry"}]"#);
        assert_eq!(names.unwrap(), vec!["topic", "tone"]);
    }

    #[test]
    fn test_object_list_without_name_is_rejected() {
        let err = parse_variables(r#"[{"name":"ok"},{"label":"nope"}]"#).unwrap_err();
        assert!(matches!(err, PromptError::InvalidInputFormat(ref m) if m.contains("index 1")));
    }

    #[test]
    fn test_other_variable_shapes_are_rejected() {
        for raw in [r#""name""#, "42", "null", r#"["a", {"name":"b"}]"#, "not json"] {
            let err = parse_variables(raw).unwrap_err();
            assert!(matches!(err, PromptError::InvalidInputFormat(_)), "{raw}");
        }
    }

    #[test]
    fn test_variable_input_classification() {
        assert_eq!(
            VariableInput::from_json(json!([])).unwrap(),
            VariableInput::StringList(vec![])
        );
        assert!(matches!(
            VariableInput::from_json(json!([{"name": "a"}])).unwrap(),
            VariableInput::ObjectList(_)
        ));
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags(r#"["a","b"]"#).unwrap(), vec!["a", "b"]);
        assert!(parse_tags(r#"{"a":1}"#).is_err());
        assert!(parse_tags("[1,2]").is_err());
    }

    #[test]
    fn test_parse_variable_pair() {
        assert_eq!(
            parse_variable_pair("name=Ava").unwrap(),
            ("name".to_string(), "Ava".to_string())
        );
        assert_eq!(parse_variable_pair("expr=a=b").unwrap().1, "a=b");
        assert_eq!(parse_variable_pair("empty=").unwrap().1, "");
        assert!(parse_variable_pair("novalue").is_err());
        assert!(parse_variable_pair("=x").is_err());
    }

    #[test]
    fn test_variable_values_stringify_non_strings() {
        let map = json!({"name": "Ava", "count": 3, "ok": true});
        let values = variable_values(map.as_object().unwrap());
        assert_eq!(values["name"], "Ava");
        assert_eq!(values["count"], "3");
        assert_eq!(values["ok"], "true");
    }

    #[test]
    fn test_resolve_text_inline_and_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "Hello from file").unwrap();

        assert_eq!(
            resolve_text("template", Some("inline".to_string()), None).unwrap(),
            Some("inline".to_string())
        );
        assert_eq!(
            resolve_text("template", None, Some(file.path())).unwrap(),
            Some("Hello from file".to_string())
        );
        assert_eq!(resolve_text("readme", None, None).unwrap(), None);
    }

    #[test]
    fn test_resolve_text_rejects_both_sources() {
        let file = NamedTempFile::new().unwrap();
        let err = resolve_text("template", Some("x".to_string()), Some(file.path())).unwrap_err();
        assert!(matches!(err, PromptError::InvalidInputFormat(ref m) if m.contains("not both")));
    }

    #[test]
    fn test_require_text_and_missing_file() {
        assert!(require_text("template", None, None).is_err());
        let err = require_text("template", None, Some(Path::new("/nonexistent/prompt.txt")));
        assert!(matches!(err, Err(PromptError::InvalidInputFormat(ref m)) if m.contains("/nonexistent")));
    }

    #[test]
    fn test_resolve_visibility() {
        assert_eq!(resolve_visibility(false, false).unwrap(), None);
        assert_eq!(resolve_visibility(true, false).unwrap(), Some(true));
        assert_eq!(resolve_visibility(false, true).unwrap(), Some(false));
        assert!(matches!(
            resolve_visibility(true, true),
            Err(PromptError::InvalidInputFormat(_))
        ));
    }

    #[test]
    fn test_complete_draft_defaults() {
        let definition = complete_draft(PromptDraft::new("Hello"));
        assert_eq!(definition.template_format, TemplateFormat::Mustache);
        assert!(definition.template_variables.is_empty());
        assert!(definition.tags.is_empty());
        assert!(!definition.is_public);
    }

    #[test]
    fn test_empty_update_preserves_remote_state() {
        let merged = merge_update(&id(), PromptUpdate::default(), record(), remote()).unwrap();
        assert_eq!(
            merged,
            PromptDefinition {
                template: "Hi {name}".to_string(),
                template_format: TemplateFormat::FString,
                template_variables: vec!["name".to_string()],
                description: Some("Says hello".to_string()),
                readme: Some("# Greeting".to_string()),
                tags: vec!["greeting".to_string()],
                is_public: true,
            }
        );
    }

    #[test]
    fn test_update_fields_take_precedence() {
        let update = PromptUpdate {
            description: Some("New".to_string()),
            is_public: Some(false),
            tags: Some(vec![]),
            ..Default::default()
        };
        let merged = merge_update(&id(), update, record(), remote()).unwrap();
        assert_eq!(merged.description.as_deref(), Some("New"));
        assert!(!merged.is_public);
        assert!(merged.tags.is_empty());
        assert_eq!(merged.readme.as_deref(), Some("# Greeting"));
    }

    #[test]
    fn test_missing_remote_format_falls_back_to_mustache() {
        let remote = RemoteTemplate {
            template_format: None,
            ..remote()
        };
        let merged = merge_update(&id(), PromptUpdate::default(), record(), remote).unwrap();
        assert_eq!(merged.template_format, TemplateFormat::Mustache);
    }

    #[test]
    fn test_structured_remote_template_is_unsupported() {
        let remote = RemoteTemplate {
            template: json!([{"role": "system", "content": "hi"}]),
            ..remote()
        };
        let err = merge_update(&id(), PromptUpdate::default(), record(), remote.clone()).unwrap_err();
        assert!(matches!(err, PromptError::UnsupportedTemplateType(ref p) if p == "acme/greeting"));

        // A replacement template does not need the remote body.
        let update = PromptUpdate {
            template: Some("Fresh".to_string()),
            ..Default::default()
        };
        assert_eq!(merge_update(&id(), update, record(), remote).unwrap().template, "Fresh");
    }
}
