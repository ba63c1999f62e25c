use std::collections::HashMap;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::core::label::Label;
use crate::core::project::Project;
use crate::core::task::Task;
use crate::error::Error;

const DEFAULT_BASE_URL: &str = "https://api.todoist.com/api/v1";

/// Resource kinds the delta endpoint can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Items,
    Labels,
    Projects,
}

/// All three kinds, the default for a routine sync.
pub const ALL_KINDS: [ResourceKind; 3] = [
    ResourceKind::Items,
    ResourceKind::Labels,
    ResourceKind::Projects,
];

/// Response from the delta endpoint. A list is `None` when that kind was not
/// requested or unchanged — distinct from an empty list of changes.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncResponse {
    pub sync_token: String,
    #[serde(default)]
    pub full_sync: bool,
    #[serde(default)]
    pub items: Option<Vec<Task>>,
    #[serde(default)]
    pub labels: Option<Vec<Label>>,
    #[serde(default)]
    pub projects: Option<Vec<Project>>,
}

/// A one-shot mutation sent to the remote. The uuid is client-generated so
/// the server can report per-command status and deduplicate retries.
#[derive(Debug, Clone, Serialize)]
pub struct Command {
    #[serde(rename = "type")]
    pub kind: String,
    pub uuid: Uuid,
    pub args: serde_json::Value,
}

impl Command {
    pub fn new(kind: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            uuid: Uuid::new_v4(),
            args,
        }
    }

    /// Mark a task complete on the server.
    pub fn complete_item(task_id: &str) -> Self {
        Self::new("item_complete", json!({ "id": task_id }))
    }
}

/// Response to a command batch. `sync_status` maps command uuid to `"ok"` or
/// an error object; its presence signals the batch was accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandResponse {
    #[serde(default)]
    pub sync_status: Option<HashMap<String, serde_json::Value>>,
}

impl CommandResponse {
    pub fn accepted(&self) -> bool {
        self.sync_status.is_some()
    }
}

/// The delta endpoint as seen by the replica: pull changes since a token,
/// push a command batch. Implemented over HTTP by [`DeltaClient`] and by
/// scripted stubs in tests.
pub trait DeltaTransport {
    fn pull(
        &self,
        sync_token: &str,
        kinds: &[ResourceKind],
    ) -> impl Future<Output = Result<SyncResponse, Error>>;

    fn push(&self, commands: &[Command]) -> impl Future<Output = Result<CommandResponse, Error>>;
}

/// HTTP client for the delta-sync endpoint. The token is an opaque bearer
/// credential; acquiring it is the host application's problem.
#[derive(Clone)]
pub struct DeltaClient {
    base_url: String,
    token: String,
    http: Client,
}

impl DeltaClient {
    pub fn new(token: &str) -> Result<Self, Error> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(token: &str, base_url: &str) -> Result<Self, Error> {
        let http = Client::builder().build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            http,
        })
    }

    async fn post_sync(&self, form: &[(&str, String)]) -> Result<reqwest::Response, Error> {
        let resp = self
            .http
            .post(format!("{}/sync", self.base_url))
            .bearer_auth(&self.token)
            .form(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                endpoint: "sync",
                status,
            });
        }
        Ok(resp)
    }
}

impl DeltaTransport for DeltaClient {
    async fn pull(
        &self,
        sync_token: &str,
        kinds: &[ResourceKind],
    ) -> Result<SyncResponse, Error> {
        let form = [
            ("sync_token", sync_token.to_string()),
            ("resource_types", serde_json::to_string(kinds)?),
        ];
        let resp = self.post_sync(&form).await?;
        Ok(resp.json().await?)
    }

    async fn push(&self, commands: &[Command]) -> Result<CommandResponse, Error> {
        let form = [("commands", serde_json::to_string(commands)?)];
        let resp = self.post_sync(&form).await?;
        Ok(resp.json().await?)
    }
}
