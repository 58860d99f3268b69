use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A hierarchical section of a framework. `parent_id = None` marks a root.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Clause {
    pub id: String,
    pub framework_id: String,
    pub parent_id: Option<String>,
    pub number: String,
    pub title: String,
    pub description: Option<String>,
    pub is_annex: bool,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
