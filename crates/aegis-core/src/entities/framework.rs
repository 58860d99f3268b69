use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::FrameworkStatus;

/// A named, versioned compliance standard. `code` is the stable cache key.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Framework {
    pub id: String,
    pub code: String,
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub status: FrameworkStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
