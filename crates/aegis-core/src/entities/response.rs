use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ComplianceStatus;
use crate::errors::CoreError;

/// The single target of a response: a clause, a control, or an external
/// requirement. Exactly one is set by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Locator {
    Clause(String),
    Control(String),
    Requirement(String),
}

impl Locator {
    /// The unique storage key, e.g. `control:ctl-a3f8b2c1`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}:{}", self.kind(), self.id())
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Clause(_) => "clause",
            Self::Control(_) => "control",
            Self::Requirement(_) => "requirement",
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Clause(id) | Self::Control(id) | Self::Requirement(id) => id,
        }
    }

    #[must_use]
    pub fn clause_id(&self) -> Option<&str> {
        match self {
            Self::Clause(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn control_id(&self) -> Option<&str> {
        match self {
            Self::Control(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn requirement_id(&self) -> Option<&str> {
        match self {
            Self::Requirement(id) => Some(id),
            _ => None,
        }
    }

    /// Rebuild a locator from its three nullable storage columns.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` unless exactly one column is set.
    pub fn from_columns(
        clause_id: Option<String>,
        control_id: Option<String>,
        requirement_id: Option<String>,
    ) -> Result<Self, CoreError> {
        match (clause_id, control_id, requirement_id) {
            (Some(id), None, None) => Ok(Self::Clause(id)),
            (None, Some(id), None) => Ok(Self::Control(id)),
            (None, None, Some(id)) => Ok(Self::Requirement(id)),
            _ => Err(CoreError::field(
                "locator",
                "exactly one of clauseId, controlId, requirementId must be set",
            )),
        }
    }

    /// Parse the `kind:id` form produced by [`Locator::key`].
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for an unknown kind or empty id.
    pub fn parse_key(key: &str) -> Result<Self, CoreError> {
        let (kind, id) = key
            .split_once(':')
            .ok_or_else(|| CoreError::field("locator", format!("'{key}' is not kind:id")))?;
        if id.is_empty() {
            return Err(CoreError::field("locator", "empty id"));
        }
        match kind {
            "clause" => Ok(Self::Clause(id.to_string())),
            "control" => Ok(Self::Control(id.to_string())),
            "requirement" => Ok(Self::Requirement(id.to_string())),
            other => Err(CoreError::field(
                "locator",
                format!("unknown locator kind '{other}'"),
            )),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

/// The recorded compliance status and notes for one locator in one assessment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub id: String,
    pub assessment_id: String,
    pub locator: Locator,
    pub compliance_status: ComplianceStatus,
    pub maturity_level: Option<u8>,
    pub gaps: Option<String>,
    pub recommendations: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
