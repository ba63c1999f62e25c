pub mod client;
pub mod merge;
pub mod view;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::storage::Storage;
use client::{ALL_KINDS, Command, CommandResponse, DeltaTransport, ResourceKind, SyncResponse};
use merge::merge_records;
use view::TaskView;

/// Resumption token value that requests a full snapshot.
pub const FULL_SYNC_TOKEN: &str = "*";

const TOKEN_KEY: &str = "todoist_sync_token";
const DATA_KEY: &str = "todoist_data";

/// The three mirrored collections. Insertion order carries no meaning; the
/// display order is always re-derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplicaData {
    #[serde(default)]
    pub items: Vec<crate::core::task::Task>,
    #[serde(default)]
    pub labels: Vec<crate::core::label::Label>,
    #[serde(default)]
    pub projects: Vec<crate::core::project::Project>,
}

/// Local mirror of the remote task list, kept consistent through the delta
/// protocol. State is reloaded from storage at construction and persisted
/// after every successful merge; callers serialize `synchronize` invocations
/// per instance.
pub struct TaskReplica<T, S> {
    transport: T,
    storage: S,
    sync_token: String,
    data: ReplicaData,
}

impl<T: DeltaTransport, S: Storage> TaskReplica<T, S> {
    pub fn new(transport: T, storage: S) -> Self {
        let sync_token = storage
            .get(TOKEN_KEY)
            .unwrap_or_else(|| FULL_SYNC_TOKEN.to_string());

        let mut storage = storage;
        let data = match storage.get(DATA_KEY) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(data) => data,
                Err(e) => {
                    // Corrupt slot: purge and start empty rather than fail
                    log::warn!("Malformed replica state, resetting: {}", e);
                    storage.remove(DATA_KEY);
                    ReplicaData::default()
                }
            },
            None => ReplicaData::default(),
        };

        Self {
            transport,
            storage,
            sync_token,
            data,
        }
    }

    /// Pull and apply changes since the current resumption token.
    ///
    /// A transport failure with a non-sentinel token resets the token and
    /// retries exactly once as a full sync — the token may have expired
    /// server-side, and a full snapshot is the only guaranteed recovery.
    /// A second failure, or a failure that was already a full sync,
    /// propagates to the caller.
    pub async fn synchronize(&mut self, kinds: &[ResourceKind]) -> Result<SyncResponse, Error> {
        let mut retried = false;
        loop {
            log::debug!(
                "Syncing {} kinds from token {:?}",
                kinds.len(),
                self.sync_token
            );
            match self.transport.pull(&self.sync_token, kinds).await {
                Ok(response) => {
                    self.apply_delta(&response);
                    log::info!(
                        "Sync complete: full={}, {} items, {} labels, {} projects",
                        response.full_sync,
                        self.data.items.len(),
                        self.data.labels.len(),
                        self.data.projects.len(),
                    );
                    return Ok(response);
                }
                Err(e) if !retried && self.sync_token != FULL_SYNC_TOKEN => {
                    log::warn!("Sync failed ({}), retrying with full sync", e);
                    self.sync_token = FULL_SYNC_TOKEN.to_string();
                    self.storage.set(TOKEN_KEY, FULL_SYNC_TOKEN);
                    retried = true;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Apply a sync response to the mirror and persist the result.
    fn apply_delta(&mut self, response: &SyncResponse) {
        if response.full_sync {
            // Full resynchronization: wholesale replacement, not a diff
            self.data = ReplicaData {
                items: response.items.clone().unwrap_or_default(),
                labels: response.labels.clone().unwrap_or_default(),
                projects: response.projects.clone().unwrap_or_default(),
            };
        } else {
            if let Some(items) = &response.items {
                merge_records(&mut self.data.items, items);
            }
            if let Some(labels) = &response.labels {
                merge_records(&mut self.data.labels, labels);
            }
            if let Some(projects) = &response.projects {
                merge_records(&mut self.data.projects, projects);
            }
        }

        self.sync_token = response.sync_token.clone();
        self.persist();
    }

    fn persist(&mut self) {
        self.storage.set(TOKEN_KEY, &self.sync_token);
        match serde_json::to_string(&self.data) {
            Ok(json) => self.storage.set(DATA_KEY, &json),
            Err(e) => log::warn!("Failed to serialize replica state: {}", e),
        }
    }

    /// Send a command batch to the mutation endpoint. Commands do not touch
    /// local state directly; when the batch is accepted, a fresh incremental
    /// sync absorbs the server-side effects.
    pub async fn issue_commands(
        &mut self,
        commands: Vec<Command>,
    ) -> Result<CommandResponse, Error> {
        let response = self.transport.push(&commands).await?;
        if response.accepted() {
            self.synchronize(&ALL_KINDS).await?;
        } else {
            log::warn!("Command batch of {} was not accepted", commands.len());
        }
        Ok(response)
    }

    /// Complete a single task on the server.
    pub async fn complete_task(&mut self, task_id: &str) -> Result<CommandResponse, Error> {
        self.issue_commands(vec![Command::complete_item(task_id)])
            .await
    }

    /// Display-ready tasks, recomputed from the mirror on every call.
    pub fn derived_tasks(&self) -> Vec<TaskView> {
        view::build_task_views(&self.data)
    }

    /// Drop all local state, e.g. when the credential changes.
    pub fn reset(&mut self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(DATA_KEY);
        self.sync_token = FULL_SYNC_TOKEN.to_string();
        self.data = ReplicaData::default();
        log::info!("Replica state cleared");
    }

    pub fn sync_token(&self) -> &str {
        &self.sync_token
    }

    pub fn data(&self) -> &ReplicaData {
        &self.data
    }
}
