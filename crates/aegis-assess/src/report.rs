//! Read-only assessment reports.

use serde::Serialize;

use aegis_core::entities::{Assessment, Response};
use aegis_core::enums::AssessmentStatus;
use aegis_core::projection::Projection;
use aegis_core::scoring::{ClauseMaturity, StatusBreakdown};
use aegis_snapshot::TreeOrigin;

/// Where an assessment stands against its framework tree.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub assessment_id: String,
    pub framework_code: String,
    pub status: AssessmentStatus,
    /// Whether the tree came from the snapshot cache or the content store.
    pub origin: TreeOrigin,
    /// Leaf items in the projection.
    pub total: usize,
    /// Leaf items with a response other than `NOT_ASSESSED`.
    pub assessed: usize,
    /// Status counts over every response, requirement responses included.
    pub breakdown: StatusBreakdown,
    pub score_preview: Option<u8>,
    pub projection: Projection,
}

impl ProgressReport {
    /// Whole-percent share of leaf items assessed, rounded half-up.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn percent_assessed(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let pct = (200 * self.assessed + self.total) / (2 * self.total);
        if pct > 100 { 100 } else { pct as u8 }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaturityReport {
    pub assessment_id: String,
    pub framework_code: String,
    /// Rated clauses in tree order.
    pub clauses: Vec<ClauseMaturity>,
}

/// An assessment with its responses and a live score preview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentOverview {
    pub assessment: Assessment,
    pub framework_code: String,
    pub responses: Vec<Response>,
    pub breakdown: StatusBreakdown,
    pub score_preview: Option<u8>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn report(total: usize, assessed: usize) -> ProgressReport {
        ProgressReport {
            assessment_id: "asm-1".into(),
            framework_code: "ISO27001".into(),
            status: AssessmentStatus::InProgress,
            origin: TreeOrigin::Cache,
            total,
            assessed,
            breakdown: StatusBreakdown::default(),
            score_preview: None,
            projection: Projection {
                items: Vec::new(),
                clause_counts: std::collections::BTreeMap::new(),
            },
        }
    }

    #[rstest]
    #[case(0, 0, 0)]
    #[case(4, 0, 0)]
    #[case(4, 4, 100)]
    #[case(3, 1, 33)]
    #[case(3, 2, 67)]
    #[case(8, 1, 13)]
    fn percent_assessed_rounds_half_up(
        #[case] total: usize,
        #[case] assessed: usize,
        #[case] expected: u8,
    ) {
        assert_eq!(report(total, assessed).percent_assessed(), expected);
    }
}
