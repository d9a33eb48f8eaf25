//! LangSmith prompt hub client.
//!
//! Talks to the LangSmith REST API: prompts are "repos" addressed as
//! `/repos/{owner}/{name}`, and template content lives in commits whose
//! manifest is a serialized LangChain `PromptTemplate`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{HubConnector, HubError, HubResult, PromptHub};
use crate::core::config::HubConfig;
use crate::domains::prompts::model::{
    ListFilter, PromptDefinition, PromptId, PromptRecord, RemoteTemplate, TemplateFormat,
};

/// Page size used when listing repos.
const PAGE_SIZE: usize = 100;

/// Length of the commit hash prefix used in prompt URLs.
const SHORT_HASH_LEN: usize = 8;

/// LangSmith hub client bound to one API key.
pub struct LangSmithHub {
    client: reqwest::Client,
    api_url: String,
    web_url: String,
}

#[derive(Debug, Deserialize)]
struct RepoEnvelope {
    repo: RepoRecord,
}

#[derive(Debug, Deserialize)]
struct RepoPage {
    #[serde(default)]
    repos: Vec<RepoRecord>,
    #[serde(default)]
    total: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RepoRecord {
    repo_handle: String,
    #[serde(default)]
    owner: Option<String>,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    readme: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    is_public: bool,
    created_at: String,
    updated_at: String,
    #[serde(default)]
    num_commits: Option<u64>,
    #[serde(default)]
    last_commit_hash: Option<String>,
}

impl RepoRecord {
    fn into_record(self) -> HubResult<PromptRecord> {
        let prompt_id = match (self.full_name, self.owner) {
            (Some(full_name), _) if full_name.contains('/') => full_name,
            (_, Some(owner)) => format!("{}/{}", owner, self.repo_handle),
            _ => format!("-/{}", self.repo_handle),
        };

        Ok(PromptRecord {
            prompt_id,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            is_public: self.is_public,
            tags: self.tags.unwrap_or_default(),
            description: self.description,
            readme: self.readme,
            num_commits: self.num_commits,
            last_commit_hash: self.last_commit_hash,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CommitManifest {
    manifest: Value,
}

#[derive(Debug, Deserialize)]
struct CommitPage {
    #[serde(default)]
    commits: Vec<CommitHash>,
}

#[derive(Debug, Deserialize)]
struct CommitHash {
    commit_hash: String,
}

#[derive(Debug, Deserialize)]
struct CommitEnvelope {
    commit: CommitHash,
}

/// Parse a hub timestamp. Offset-less timestamps are taken as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> HubResult<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| HubError::decode(format!("invalid timestamp '{}': {}", raw, e)))
}

/// Decode a commit manifest into its template state.
///
/// Chat prompts carry `messages` instead of a `template` string; they come
/// back as a non-string template so callers can refuse to rewrite them.
pub(crate) fn decode_manifest(manifest: &Value) -> HubResult<RemoteTemplate> {
    let kwargs = manifest
        .get("kwargs")
        .ok_or_else(|| HubError::decode("manifest has no 'kwargs'"))?;

    let template = kwargs
        .get("template")
        .or_else(|| kwargs.get("messages"))
        .cloned()
        .unwrap_or(Value::Null);

    let template_format = kwargs
        .get("template_format")
        .and_then(Value::as_str)
        .map(|raw| {
            raw.parse::<TemplateFormat>()
                .map_err(|e| HubError::decode(e.to_string()))
        })
        .transpose()?;

    let input_variables = kwargs
        .get("input_variables")
        .and_then(Value::as_array)
        .map(|vars| {
            vars.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    Ok(RemoteTemplate {
        template,
        template_format,
        input_variables,
    })
}

/// Serialize a definition as a LangChain `PromptTemplate` manifest.
pub(crate) fn encode_manifest(definition: &PromptDefinition) -> Value {
    json!({
        "lc": 1,
        "type": "constructor",
        "id": ["langchain", "prompts", "prompt", "PromptTemplate"],
        "kwargs": {
            "input_variables": definition.template_variables,
            "template_format": definition.template_format.as_str(),
            "template": definition.template,
        }
    })
}

fn repo_metadata(definition: &PromptDefinition) -> Value {
    json!({
        "description": definition.description,
        "readme": definition.readme,
        "tags": definition.tags,
        "is_public": definition.is_public,
    })
}

impl LangSmithHub {
    /// Create a client authenticated with `api_key`.
    pub fn new(api_key: &str, config: &HubConfig) -> HubResult<Self> {
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| HubError::Config(format!("API key is not a valid header value: {}", e)))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("prompthub/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            web_url: config.web_url.trim_end_matches('/').to_string(),
        })
    }

    fn repo_url(&self, id: &PromptId) -> String {
        format!("{}/repos/{}/{}", self.api_url, id.owner(), id.name())
    }

    fn commits_url(&self, id: &PromptId) -> String {
        format!("{}/commits/{}/{}", self.api_url, id.owner(), id.name())
    }

    /// Web location of a published commit.
    pub fn commit_url(&self, id: &PromptId, commit_hash: &str) -> String {
        let short = commit_hash.get(..SHORT_HASH_LEN).unwrap_or(commit_hash);
        format!("{}/prompts/{}/{}", self.web_url, id.name(), short)
    }

    async fn check(response: Response) -> HubResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(HubError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn latest_commit_hash(&self, id: &PromptId) -> HubResult<Option<String>> {
        let response = self
            .client
            .get(format!("{}/", self.commits_url(id)))
            .query(&[("limit", "1"), ("offset", "0")])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let page: CommitPage = Self::check(response).await?.json().await?;
        Ok(page.commits.into_iter().next().map(|c| c.commit_hash))
    }
}

#[async_trait]
impl PromptHub for LangSmithHub {
    #[instrument(skip(self), fields(prompt = %id))]
    async fn prompt_exists(&self, id: &PromptId) -> HubResult<bool> {
        let response = self.client.get(self.repo_url(id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("Prompt does not exist");
            return Ok(false);
        }
        Self::check(response).await?;
        Ok(true)
    }

    #[instrument(skip(self), fields(prompt = %id))]
    async fn get_prompt(&self, id: &PromptId) -> HubResult<PromptRecord> {
        let response = self.client.get(self.repo_url(id)).send().await?;
        let envelope: RepoEnvelope = Self::check(response).await?.json().await?;
        envelope.repo.into_record()
    }

    #[instrument(skip(self), fields(prompt = %id))]
    async fn pull_template(&self, id: &PromptId) -> HubResult<RemoteTemplate> {
        let response = self
            .client
            .get(format!("{}/latest", self.commits_url(id)))
            .send()
            .await?;
        let commit: CommitManifest = Self::check(response).await?.json().await?;
        decode_manifest(&commit.manifest)
    }

    #[instrument(skip(self, definition), fields(prompt = %id))]
    async fn push_prompt(
        &self,
        id: &PromptId,
        definition: &PromptDefinition,
    ) -> HubResult<String> {
        let mut metadata = repo_metadata(definition);

        if self.prompt_exists(id).await? {
            debug!("Updating prompt metadata");
            let response = self
                .client
                .patch(self.repo_url(id))
                .json(&metadata)
                .send()
                .await?;
            Self::check(response).await?;
        } else {
            debug!("Creating prompt repo");
            metadata["repo_handle"] = json!(id.name());
            let response = self
                .client
                .post(format!("{}/repos/", self.api_url))
                .json(&metadata)
                .send()
                .await?;
            Self::check(response).await?;
        }

        let parent_commit = self.latest_commit_hash(id).await?;
        let response = self
            .client
            .post(self.commits_url(id))
            .json(&json!({
                "manifest": encode_manifest(definition),
                "parent_commit": parent_commit,
            }))
            .send()
            .await?;

        // The hub rejects a commit identical to its parent; the prompt is
        // already in the requested state.
        if response.status() == StatusCode::CONFLICT {
            if let Some(parent) = parent_commit {
                info!("Template unchanged, keeping commit {}", parent);
                return Ok(self.commit_url(id, &parent));
            }
        }

        let envelope: CommitEnvelope = Self::check(response).await?.json().await?;
        info!("Published commit {}", envelope.commit.commit_hash);
        Ok(self.commit_url(id, &envelope.commit.commit_hash))
    }

    #[instrument(skip(self), fields(prompt = %id))]
    async fn delete_prompt(&self, id: &PromptId) -> HubResult<()> {
        let response = self.client.delete(self.repo_url(id)).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_prompts(&self, filter: &ListFilter) -> HubResult<Vec<PromptRecord>> {
        let mut records = Vec::new();
        let mut offset = 0usize;

        loop {
            let mut query = vec![
                ("limit", PAGE_SIZE.to_string()),
                ("offset", offset.to_string()),
                ("is_archived", filter.is_archived.to_string()),
            ];
            if let Some(is_public) = filter.is_public {
                query.push(("is_public", is_public.to_string()));
            }
            if let Some(q) = &filter.query {
                query.push(("query", q.clone()));
            }

            let response = self
                .client
                .get(format!("{}/repos/", self.api_url))
                .query(&query)
                .send()
                .await?;
            let page: RepoPage = Self::check(response).await?.json().await?;

            let count = page.repos.len();
            for repo in page.repos {
                records.push(repo.into_record()?);
            }
            offset += count;

            if count < PAGE_SIZE || page.total.is_some_and(|total| offset >= total) {
                break;
            }
        }

        debug!("Fetched {} prompts", records.len());
        Ok(records)
    }
}

/// Connector producing [`LangSmithHub`] clients.
#[derive(Debug, Clone)]
pub struct LangSmithConnector {
    config: HubConfig,
}

impl LangSmithConnector {
    pub fn new(config: HubConfig) -> Self {
        Self { config }
    }
}

impl HubConnector for LangSmithConnector {
    fn connect(&self, api_key: &str) -> HubResult<Arc<dyn PromptHub>> {
        Ok(Arc::new(LangSmithHub::new(api_key, &self.config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn hub() -> LangSmithHub {
        let config = HubConfig {
            api_url: "https://api.example.test/".to_string(),
            web_url: "https://web.example.test".to_string(),
        };
        LangSmithHub::new("lsv2_test", &config).unwrap()
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-05-01T12:30:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-05-01T14:30:00+02:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-05-01T12:30:00.000000").unwrap(), expected);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_decode_string_manifest() {
        let manifest = json!({
            "lc": 1,
            "type": "constructor",
            "id": ["langchain", "prompts", "prompt", "PromptTemplate"],
            "kwargs": {
                "template": "Hello {{name}}",
                "template_format": "mustache",
                "input_variables": ["name"]
            }
        });
        let remote = decode_manifest(&manifest).unwrap();
        assert_eq!(remote.template, json!("Hello {{name}}"));
        assert_eq!(remote.template_format, Some(TemplateFormat::Mustache));
        assert_eq!(remote.input_variables, vec!["name"]);
    }

    #[test]
    fn test_decode_chat_manifest_yields_structured_template() {
        let manifest = json!({
            "kwargs": {
                "messages": [{"lc": 1, "kwargs": {"prompt": {}}}],
                "input_variables": ["question"]
            }
        });
        let remote = decode_manifest(&manifest).unwrap();
        assert!(!remote.template.is_string());
        assert_eq!(remote.template_format, None);
    }

    #[test]
    fn test_decode_manifest_errors() {
        assert!(decode_manifest(&json!({"lc": 1})).is_err());
        let jinja = json!({"kwargs": {"template": "x", "template_format": "jinja2"}});
        assert!(matches!(decode_manifest(&jinja), Err(HubError::Decode(_))));
    }

    #[test]
    fn test_encode_manifest_round_trips_through_decode() {
        let definition = PromptDefinition {
            template: "Hi {name}".to_string(),
            template_format: TemplateFormat::FString,
            template_variables: vec!["name".to_string()],
            description: None,
            readme: None,
            tags: vec![],
            is_public: false,
        };
        let manifest = encode_manifest(&definition);
        assert_eq!(manifest["kwargs"]["template_format"], "f-string");

        let remote = decode_manifest(&manifest).unwrap();
        assert_eq!(remote.template, json!("Hi {name}"));
        assert_eq!(remote.template_format, Some(TemplateFormat::FString));
    }

    #[test]
    fn test_repo_record_projection() {
        let repo: RepoRecord = serde_json::from_value(json!({
            "repo_handle": "greeting",
            "owner": "acme",
            "full_name": "acme/greeting",
            "description": "Says hello",
            "readme": null,
            "tags": null,
            "is_public": false,
            "is_archived": false,
            "created_at": "2024-01-01T00:00:00.000000",
            "updated_at": "2024-02-01T00:00:00.000000",
            "num_commits": 2,
            "last_commit_hash": "abcdef0123456789"
        }))
        .unwrap();
        let record = repo.into_record().unwrap();
        assert_eq!(record.prompt_id, "acme/greeting");
        assert!(record.tags.is_empty());
        assert_eq!(record.num_commits, Some(2));
    }

    #[test]
    fn test_repo_record_without_full_name_uses_owner() {
        let repo: RepoRecord = serde_json::from_value(json!({
            "repo_handle": "greeting",
            "owner": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(repo.into_record().unwrap().prompt_id, "-/greeting");
    }

    #[test]
    fn test_urls() {
        let hub = hub();
        let id = PromptId::parse("acme/greeting").unwrap();
        assert_eq!(hub.repo_url(&id), "https://api.example.test/repos/acme/greeting");
        assert_eq!(
            hub.commit_url(&id, "abcdef0123456789"),
            "https://web.example.test/prompts/greeting/abcdef01"
        );
        assert_eq!(hub.commit_url(&id, "abc"), "https://web.example.test/prompts/greeting/abc");
    }

    #[test]
    fn test_invalid_api_key_header_is_rejected() {
        let config = HubConfig::default();
        assert!(matches!(
            LangSmithHub::new("bad\nkey", &config),
            Err(HubError::Config(_))
        ));
    }

    // ------------------------------------------------------------------
    // HTTP behaviour against a mock hub
    // ------------------------------------------------------------------

    fn mock_hub(server: &MockServer) -> LangSmithHub {
        let config = HubConfig {
            api_url: server.uri(),
            web_url: "https://web.example.test".to_string(),
        };
        LangSmithHub::new("lsv2_test", &config).unwrap()
    }

    fn definition() -> PromptDefinition {
        PromptDefinition {
            template: "Hi {name}".to_string(),
            template_format: TemplateFormat::FString,
            template_variables: vec!["name".to_string()],
            description: Some("Greets".to_string()),
            readme: None,
            tags: vec!["hello".to_string()],
            is_public: false,
        }
    }

    fn repo_json(handle: &str) -> Value {
        json!({
            "repo_handle": handle,
            "owner": "acme",
            "full_name": format!("acme/{}", handle),
            "is_public": false,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z"
        })
    }

    fn repo_page(start: usize, count: usize, total: usize) -> Value {
        let repos: Vec<Value> = (start..start + count)
            .map(|i| repo_json(&format!("p{}", i)))
            .collect();
        json!({"repos": repos, "total": total})
    }

    #[tokio::test]
    async fn test_prompt_exists_maps_404_to_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/missing"))
            .and(header("x-api-key", "lsv2_test"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/greet"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"repo": repo_json("greet")})))
            .mount(&server)
            .await;

        let hub = mock_hub(&server);
        assert!(!hub.prompt_exists(&PromptId::parse("acme/missing").unwrap()).await.unwrap());
        assert!(hub.prompt_exists(&PromptId::parse("acme/greet").unwrap()).await.unwrap());
    }

    #[tokio::test]
    async fn test_push_new_prompt_creates_repo_then_commits() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/greet"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/repos/"))
            .and(body_partial_json(json!({"repo_handle": "greet", "tags": ["hello"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"repo": repo_json("greet")})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/commits/acme/greet/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/commits/acme/greet"))
            .and(body_partial_json(json!({
                "manifest": {"kwargs": {"template": "Hi {name}", "template_format": "f-string"}},
                "parent_commit": null
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"commit": {"commit_hash": "abcdef0123456789"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let url = mock_hub(&server)
            .push_prompt(&PromptId::parse("acme/greet").unwrap(), &definition())
            .await
            .unwrap();
        assert_eq!(url, "https://web.example.test/prompts/greet/abcdef01");
    }

    #[tokio::test]
    async fn test_push_existing_prompt_patches_and_keeps_parent_on_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/greet"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"repo": repo_json("greet")})))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/repos/acme/greet"))
            .and(body_partial_json(json!({"description": "Greets", "is_public": false})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/repos/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/commits/acme/greet/"))
            .and(query_param("limit", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"commits": [{"commit_hash": "1111222233334444"}]})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/commits/acme/greet"))
            .and(body_partial_json(json!({"parent_commit": "1111222233334444"})))
            .respond_with(ResponseTemplate::new(409).set_body_string("Nothing to commit"))
            .expect(1)
            .mount(&server)
            .await;

        let url = mock_hub(&server)
            .push_prompt(&PromptId::parse("acme/greet").unwrap(), &definition())
            .await
            .unwrap();
        assert_eq!(url, "https://web.example.test/prompts/greet/11112222");
    }

    #[tokio::test]
    async fn test_list_pages_until_short_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/"))
            .and(query_param("offset", "0"))
            .and(query_param("limit", "100"))
            .and(query_param("is_archived", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_page(0, 100, 150)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/"))
            .and(query_param("offset", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_page(100, 50, 150)))
            .expect(1)
            .mount(&server)
            .await;

        let records = mock_hub(&server)
            .list_prompts(&ListFilter::default())
            .await
            .unwrap();
        assert_eq!(records.len(), 150);
        assert_eq!(records[0].prompt_id, "acme/p0");
        assert_eq!(records[149].prompt_id, "acme/p149");
    }

    #[tokio::test]
    async fn test_list_stops_at_reported_total() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_page(0, 100, 100)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/"))
            .and(query_param("offset", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_page(100, 0, 100)))
            .expect(0)
            .mount(&server)
            .await;

        let records = mock_hub(&server)
            .list_prompts(&ListFilter::default())
            .await
            .unwrap();
        assert_eq!(records.len(), 100);
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/repos/acme/greet"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = mock_hub(&server)
            .delete_prompt(&PromptId::parse("acme/greet").unwrap())
            .await
            .unwrap_err();
        match err {
            HubError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }
}
