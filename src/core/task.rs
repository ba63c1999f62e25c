use serde::{Deserialize, Serialize};

use super::temporal::{DueMoment, resolve_due};

/// Due metadata as sent by the server. `date` is either a plain date
/// (`YYYY-MM-DD`) or a date-time (`YYYY-MM-DDTHH:MM:SS`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Due {
    pub date: String,
    #[serde(default)]
    pub is_recurring: bool,
}

/// A task record as held in the local replica. Field names follow the wire
/// format so records round-trip through storage unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub project_id: Option<String>,
    /// Label identifiers; resolved to display names in the derived view.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Manual ordering within a project, ascending.
    #[serde(default)]
    pub child_order: i64,
    #[serde(default)]
    pub priority: u8,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub due: Option<Due>,
}

impl Task {
    /// Resolve the due moment for chronological sorting. Date-only values are
    /// pushed to end of day so "due today" compares after any timed task.
    pub fn due_moment(&self) -> Option<DueMoment> {
        self.due.as_ref().and_then(|due| resolve_due(&due.date))
    }
}
