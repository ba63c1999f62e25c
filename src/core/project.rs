use serde::{Deserialize, Serialize};

/// A project record from the project collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub child_order: i64,
    #[serde(default)]
    pub is_deleted: bool,
}
