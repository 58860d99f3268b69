use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A leaf-level requirement attached to a clause.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    pub id: String,
    pub clause_id: String,
    pub number: String,
    pub title: String,
    pub category: Option<String>,
    pub objective: Option<String>,
    pub guidance: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
