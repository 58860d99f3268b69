use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::AssessmentStatus;

/// An evaluation run of one organization against one framework.
///
/// `overall_score` is written once on completion and never recomputed on read.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: String,
    pub org_id: String,
    pub framework_id: String,
    pub name: String,
    pub status: AssessmentStatus,
    pub overall_score: Option<u8>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
