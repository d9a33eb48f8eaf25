//! In-memory prompt hub for tests.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::sync::{Arc, Mutex};

use super::{HubConnector, HubError, HubResult, PromptHub};
use crate::domains::prompts::model::{
    ListFilter, PromptDefinition, PromptId, PromptRecord, RemoteTemplate,
};

struct StoredPrompt {
    record: PromptRecord,
    remote: RemoteTemplate,
}

/// Hub double that keeps prompts in insertion order and logs every call.
#[derive(Default)]
pub struct InMemoryHub {
    prompts: Mutex<Vec<StoredPrompt>>,
    calls: Mutex<Vec<&'static str>>,
    published: Mutex<Vec<PromptDefinition>>,
}

/// Build a record with a fixed timestamp offset, in seconds since 2024-01-01.
pub fn record(id: &str, updated_offset_secs: i64) -> PromptRecord {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    PromptRecord {
        prompt_id: id.to_string(),
        created_at: base,
        updated_at: base + chrono::Duration::seconds(updated_offset_secs),
        is_public: false,
        tags: Vec::new(),
        description: None,
        readme: None,
        num_commits: Some(1),
        last_commit_hash: None,
    }
}

impl InMemoryHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a prompt.
    pub fn with_prompt(self, record: PromptRecord, remote: RemoteTemplate) -> Self {
        self.prompts
            .lock()
            .unwrap()
            .push(StoredPrompt { record, remote });
        self
    }

    /// Seed a prompt with a plain string template.
    pub fn with_template(self, record: PromptRecord, template: &str) -> Self {
        let remote = RemoteTemplate {
            template: Value::String(template.to_string()),
            template_format: None,
            input_variables: Vec::new(),
        };
        self.with_prompt(record, remote)
    }

    /// Names of the hub calls made so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    /// Every definition published so far, in order.
    pub fn published(&self) -> Vec<PromptDefinition> {
        self.published.lock().unwrap().clone()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.record.prompt_id == id)
    }

    fn log(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn missing(id: &PromptId) -> HubError {
        HubError::Status {
            status: 404,
            body: format!("{} not found", id),
        }
    }
}

#[async_trait]
impl PromptHub for InMemoryHub {
    async fn prompt_exists(&self, id: &PromptId) -> HubResult<bool> {
        self.log("exists");
        Ok(self.contains(&id.to_string()))
    }

    async fn get_prompt(&self, id: &PromptId) -> HubResult<PromptRecord> {
        self.log("get");
        let key = id.to_string();
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.record.prompt_id == key)
            .map(|p| p.record.clone())
            .ok_or_else(|| Self::missing(id))
    }

    async fn pull_template(&self, id: &PromptId) -> HubResult<RemoteTemplate> {
        self.log("pull");
        let key = id.to_string();
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.record.prompt_id == key)
            .map(|p| p.remote.clone())
            .ok_or_else(|| Self::missing(id))
    }

    async fn push_prompt(
        &self,
        id: &PromptId,
        definition: &PromptDefinition,
    ) -> HubResult<String> {
        self.log("push");
        self.published.lock().unwrap().push(definition.clone());

        let key = id.to_string();
        let now: DateTime<Utc> = Utc::now();
        let remote = RemoteTemplate {
            template: Value::String(definition.template.clone()),
            template_format: Some(definition.template_format),
            input_variables: definition.template_variables.clone(),
        };

        let mut prompts = self.prompts.lock().unwrap();
        match prompts.iter_mut().find(|p| p.record.prompt_id == key) {
            Some(existing) => {
                existing.record.updated_at = now;
                existing.record.description = definition.description.clone();
                existing.record.readme = definition.readme.clone();
                existing.record.tags = definition.tags.clone();
                existing.record.is_public = definition.is_public;
                existing.remote = remote;
            }
            None => prompts.push(StoredPrompt {
                record: PromptRecord {
                    prompt_id: key.clone(),
                    created_at: now,
                    updated_at: now,
                    is_public: definition.is_public,
                    tags: definition.tags.clone(),
                    description: definition.description.clone(),
                    readme: definition.readme.clone(),
                    num_commits: Some(1),
                    last_commit_hash: None,
                },
                remote,
            }),
        }

        Ok(format!("memory://prompts/{}", key))
    }

    async fn delete_prompt(&self, id: &PromptId) -> HubResult<()> {
        self.log("delete");
        let key = id.to_string();
        let mut prompts = self.prompts.lock().unwrap();
        let before = prompts.len();
        prompts.retain(|p| p.record.prompt_id != key);
        if prompts.len() == before {
            return Err(Self::missing(id));
        }
        Ok(())
    }

    async fn list_prompts(&self, filter: &ListFilter) -> HubResult<Vec<PromptRecord>> {
        self.log("list");
        Ok(self
            .prompts
            .lock()
            .unwrap()
            .iter()
            .map(|p| &p.record)
            .filter(|r| filter.is_public.is_none_or(|public| r.is_public == public))
            .filter(|r| {
                filter
                    .query
                    .as_deref()
                    .is_none_or(|q| r.prompt_id.contains(q))
            })
            .cloned()
            .collect())
    }
}

/// Connector handing out one shared [`InMemoryHub`] and recording keys.
pub struct InMemoryConnector {
    hub: Arc<InMemoryHub>,
    keys: Mutex<Vec<String>>,
}

impl InMemoryConnector {
    pub fn new(hub: Arc<InMemoryHub>) -> Self {
        Self {
            hub,
            keys: Mutex::new(Vec::new()),
        }
    }

    /// API keys used to connect so far.
    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

impl HubConnector for InMemoryConnector {
    fn connect(&self, api_key: &str) -> HubResult<Arc<dyn PromptHub>> {
        self.keys.lock().unwrap().push(api_key.to_string());
        Ok(self.hub.clone())
    }
}
