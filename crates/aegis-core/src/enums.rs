//! Status enums for frameworks, assessments, and responses.
//!
//! All enums use `SCREAMING_SNAKE_CASE` serialization, which is both the SQL
//! storage form and the snapshot wire form. Status enums with state machines
//! provide `allowed_next_states()` to enforce valid transitions at the
//! application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// FrameworkStatus
// ---------------------------------------------------------------------------

/// Publication status of a framework. Only `Published` frameworks are
/// snapshot-eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FrameworkStatus {
    Draft,
    Published,
    Deprecated,
}

impl FrameworkStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Published => "PUBLISHED",
            Self::Deprecated => "DEPRECATED",
        }
    }

    #[must_use]
    pub const fn is_snapshot_eligible(self) -> bool {
        matches!(self, Self::Published)
    }
}

impl fmt::Display for FrameworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AssessmentStatus
// ---------------------------------------------------------------------------

/// Lifecycle of an assessment.
///
/// ```text
/// NOT_STARTED → IN_PROGRESS → COMPLETED → ARCHIVED
/// NOT_STARTED → ARCHIVED
/// IN_PROGRESS → ARCHIVED
/// COMPLETED   → IN_PROGRESS (reopened by a save)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssessmentStatus {
    NotStarted,
    InProgress,
    Completed,
    Archived,
}

impl AssessmentStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::NotStarted => &[Self::InProgress, Self::Archived],
            Self::InProgress => &[Self::Completed, Self::Archived],
            Self::Completed => &[Self::InProgress, Self::Archived],
            Self::Archived => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "NOT_STARTED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ComplianceStatus
// ---------------------------------------------------------------------------

/// Compliance verdict recorded on a response.
///
/// `NotAssessed` responses carry no points and are excluded from scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    NotAssessed,
    NonCompliant,
    PartiallyCompliant,
    Compliant,
}

impl ComplianceStatus {
    pub const ALL: [Self; 4] = [
        Self::NotAssessed,
        Self::NonCompliant,
        Self::PartiallyCompliant,
        Self::Compliant,
    ];

    /// Point value contributed to the overall score, `None` when unscored.
    #[must_use]
    pub const fn points(self) -> Option<u32> {
        match self {
            Self::NotAssessed => None,
            Self::NonCompliant => Some(0),
            Self::PartiallyCompliant => Some(50),
            Self::Compliant => Some(100),
        }
    }

    #[must_use]
    pub const fn is_assessed(self) -> bool {
        !matches!(self, Self::NotAssessed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotAssessed => "NOT_ASSESSED",
            Self::NonCompliant => "NON_COMPLIANT",
            Self::PartiallyCompliant => "PARTIALLY_COMPLIANT",
            Self::Compliant => "COMPLIANT",
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplianceStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::field(
                    "complianceStatus",
                    format!(
                        "'{s}' is not one of NOT_ASSESSED, NON_COMPLIANT, PARTIALLY_COMPLIANT, COMPLIANT"
                    ),
                )
            })
    }
}
