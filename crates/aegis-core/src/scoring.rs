//! Score and maturity aggregation.
//!
//! Both are computed synchronously from a set of responses; nothing here is
//! cached. Rounding is half-up on exact integer arithmetic so a score never
//! depends on floating-point representation.

use std::collections::HashMap;

use serde::Serialize;

use crate::entities::Response;
use crate::enums::ComplianceStatus;
use crate::errors::CoreError;
use crate::tree::{FrameworkTree, NodeId};

/// Count of responses per compliance status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBreakdown {
    pub not_assessed: usize,
    pub non_compliant: usize,
    pub partially_compliant: usize,
    pub compliant: usize,
}

impl StatusBreakdown {
    #[must_use]
    pub fn from_statuses(statuses: impl IntoIterator<Item = ComplianceStatus>) -> Self {
        let mut out = Self::default();
        for status in statuses {
            match status {
                ComplianceStatus::NotAssessed => out.not_assessed += 1,
                ComplianceStatus::NonCompliant => out.non_compliant += 1,
                ComplianceStatus::PartiallyCompliant => out.partially_compliant += 1,
                ComplianceStatus::Compliant => out.compliant += 1,
            }
        }
        out
    }

    /// Responses that carry points.
    #[must_use]
    pub const fn scored(&self) -> usize {
        self.non_compliant + self.partially_compliant + self.compliant
    }

    /// `round(sum(points) / scored)`, or `None` with no scored responses.
    #[must_use]
    pub fn score(&self) -> Option<u8> {
        let scored = self.scored();
        if scored == 0 {
            return None;
        }
        let points = self.compliant * 100 + self.partially_compliant * 50;
        let rounded = (2 * points + scored) / (2 * scored);
        u8::try_from(rounded).ok()
    }
}

/// Overall score for a set of statuses.
///
/// # Errors
///
/// Returns `CoreError::NoScoredResponses` when every status is
/// `NOT_ASSESSED` (or there are none).
pub fn overall_score(
    statuses: impl IntoIterator<Item = ComplianceStatus>,
) -> Result<u8, CoreError> {
    StatusBreakdown::from_statuses(statuses)
        .score()
        .ok_or(CoreError::NoScoredResponses)
}

/// Average maturity of one clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClauseMaturity {
    pub clause_id: String,
    pub number: String,
    pub title: String,
    pub average: f64,
    pub rated: usize,
}

/// `sum / count` rounded half-up to one decimal.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_one_decimal(sum: u64, count: u64) -> Option<f64> {
    if count == 0 {
        return None;
    }
    let tenths = (20 * sum + count) / (2 * count);
    Some(tenths as f64 / 10.0)
}

/// Per-clause maturity averages in tree order.
///
/// A response counts toward a clause when it targets the clause itself or a
/// control directly under it. Clauses without any rated response are left
/// out. Requirement responses and responses for nodes missing from the tree
/// are ignored.
#[must_use]
pub fn maturity_by_clause(tree: &FrameworkTree, responses: &[Response]) -> Vec<ClauseMaturity> {
    let mut sums: HashMap<NodeId, (u64, u64)> = HashMap::new();
    for response in responses {
        let Some(level) = response.maturity_level else {
            continue;
        };
        let Some(clause) = tree.owning_clause(&response.locator) else {
            continue;
        };
        let entry = sums.entry(clause).or_default();
        entry.0 += u64::from(level);
        entry.1 += 1;
    }

    tree.iter()
        .filter_map(|(id, node)| {
            let clause = node.as_clause()?;
            let &(sum, count) = sums.get(&id)?;
            Some(ClauseMaturity {
                clause_id: clause.id.clone(),
                number: clause.number.clone(),
                title: clause.title.clone(),
                average: average_one_decimal(sum, count)?,
                rated: usize::try_from(count).ok()?,
            })
        })
        .collect()
}
