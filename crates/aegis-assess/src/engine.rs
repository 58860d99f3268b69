//! Assessment engine.
//!
//! Writes go through [`AegisService`]; the framework tree comes from a
//! [`TreeReader`], so locator checks and reports see the published snapshot
//! when one exists and the live content store otherwise.

use std::collections::HashSet;
use std::sync::Arc;

use aegis_config::CacheConfig;
use aegis_core::entities::{Assessment, Locator};
use aegis_core::errors::{CoreError, ValidationErrors};
use aegis_core::fields::{ResponseDraft, ResponseFields};
use aegis_core::projection::flatten_with;
use aegis_core::scoring::{StatusBreakdown, maturity_by_clause};
use aegis_db::repos::response::ResponseSave;
use aegis_db::service::AegisService;
use aegis_snapshot::{SnapshotCache, TreeRead, TreeReader};

use crate::error::AssessError;
use crate::report::{AssessmentOverview, MaturityReport, ProgressReport};

pub struct AssessmentEngine {
    service: Arc<AegisService>,
    reader: TreeReader<Arc<AegisService>>,
}

impl AssessmentEngine {
    #[must_use]
    pub fn new(service: Arc<AegisService>, cache: SnapshotCache, config: &CacheConfig) -> Self {
        let reader = TreeReader::new(Arc::clone(&service), cache, config);
        Self { service, reader }
    }

    #[must_use]
    pub fn service(&self) -> &AegisService {
        &self.service
    }

    #[must_use]
    pub const fn reader(&self) -> &TreeReader<Arc<AegisService>> {
        &self.reader
    }

    /// Create a NOT_STARTED assessment against an existing framework.
    ///
    /// # Errors
    ///
    /// Validation errors for a blank org or name, not-found for an unknown
    /// framework.
    pub async fn create_assessment(
        &self,
        org_id: &str,
        framework_id: &str,
        name: &str,
    ) -> Result<Assessment, AssessError> {
        Ok(self
            .service
            .create_assessment(org_id, framework_id, name)
            .await?)
    }

    /// # Errors
    ///
    /// Not-found for an unknown id.
    pub async fn get_assessment(&self, id: &str) -> Result<Assessment, AssessError> {
        Ok(self.service.get_assessment(id).await?)
    }

    /// Save typed fields for one locator.
    ///
    /// Clause and control locators must name a node in the assessment's
    /// framework tree. Field and locator errors are reported together and
    /// nothing is written when there are any.
    ///
    /// # Errors
    ///
    /// `CoreError::Validation` for rejected fields or an unknown locator,
    /// not-found for an unknown assessment, invalid-transition for an
    /// ARCHIVED assessment (or COMPLETED with reopening disabled).
    pub async fn save_response(
        &self,
        assessment_id: &str,
        locator: &Locator,
        fields: &ResponseFields,
    ) -> Result<ResponseSave, AssessError> {
        let assessment = self.service.get_assessment(assessment_id).await?;
        let mut errors = match fields.check(self.service.policy().max_text_len) {
            Ok(()) => ValidationErrors::default(),
            Err(CoreError::Validation(errors)) => errors,
            Err(other) => return Err(other.into()),
        };
        self.check_locator(&assessment, locator, &mut errors).await?;
        errors.into_result()?;

        Ok(self
            .service
            .save_response(assessment_id, locator, fields)
            .await?)
    }

    /// Parse an untyped draft, then save it like [`Self::save_response`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::save_response`]; an unparseable compliance status is
    /// rejected on `complianceStatus`.
    pub async fn save_draft(
        &self,
        assessment_id: &str,
        locator: &Locator,
        draft: ResponseDraft,
    ) -> Result<ResponseSave, AssessError> {
        match draft.validate(self.service.policy().max_text_len) {
            Ok(fields) => self.save_response(assessment_id, locator, &fields).await,
            Err(CoreError::Validation(mut errors)) => {
                let assessment = self.service.get_assessment(assessment_id).await?;
                self.check_locator(&assessment, locator, &mut errors).await?;
                Err(CoreError::Validation(errors).into())
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Score and close the assessment.
    ///
    /// # Errors
    ///
    /// `CoreError::NoScoredResponses` when nothing is scored (state is left
    /// unchanged), invalid-transition when the assessment cannot complete.
    pub async fn complete_assessment(&self, id: &str) -> Result<Assessment, AssessError> {
        Ok(self.service.complete_assessment(id).await?)
    }

    /// # Errors
    ///
    /// Invalid-transition when already ARCHIVED, not-found for an unknown id.
    pub async fn archive_assessment(&self, id: &str) -> Result<Assessment, AssessError> {
        Ok(self.service.archive_assessment(id).await?)
    }

    /// Projection of the framework tree with this assessment's answers.
    ///
    /// # Errors
    ///
    /// Not-found for an unknown assessment, or a content store error while
    /// rebuilding the tree.
    pub async fn progress(&self, id: &str) -> Result<ProgressReport, AssessError> {
        let assessment = self.service.get_assessment(id).await?;
        let read = self.tree_for(&assessment).await?;
        let responses = self.service.list_responses(id).await?;

        let answered: HashSet<Locator> = responses
            .iter()
            .filter(|r| r.compliance_status.is_assessed())
            .map(|r| r.locator.clone())
            .collect();
        let projection = flatten_with(&read.tree, &answered);
        tracing::debug!(assessment_id = id, origin = ?read.origin, items = projection.len(), "progress projected");
        let breakdown =
            StatusBreakdown::from_statuses(responses.iter().map(|r| r.compliance_status));

        Ok(ProgressReport {
            assessment_id: assessment.id,
            framework_code: read.tree.code().to_string(),
            status: assessment.status,
            origin: read.origin,
            total: projection.len(),
            assessed: projection.assessed(),
            breakdown,
            score_preview: breakdown.score(),
            projection,
        })
    }

    /// The score completion would record right now.
    ///
    /// # Errors
    ///
    /// Not-found for an unknown assessment.
    pub async fn score_preview(&self, id: &str) -> Result<Option<u8>, AssessError> {
        self.service.get_assessment(id).await?;
        let statuses = self.service.response_statuses(id).await?;
        Ok(StatusBreakdown::from_statuses(statuses).score())
    }

    /// Average maturity per rated clause, in tree order.
    ///
    /// # Errors
    ///
    /// Not-found for an unknown assessment, or a content store error while
    /// rebuilding the tree.
    pub async fn maturity_report(&self, id: &str) -> Result<MaturityReport, AssessError> {
        let assessment = self.service.get_assessment(id).await?;
        let read = self.tree_for(&assessment).await?;
        let responses = self.service.list_responses(id).await?;

        Ok(MaturityReport {
            assessment_id: assessment.id,
            framework_code: read.tree.code().to_string(),
            clauses: maturity_by_clause(&read.tree, &responses),
        })
    }

    /// # Errors
    ///
    /// Not-found for an unknown assessment.
    pub async fn overview(&self, id: &str) -> Result<AssessmentOverview, AssessError> {
        let assessment = self.service.get_assessment(id).await?;
        let framework = self.service.get_framework(&assessment.framework_id).await?;
        let responses = self.service.list_responses(id).await?;
        let breakdown =
            StatusBreakdown::from_statuses(responses.iter().map(|r| r.compliance_status));

        Ok(AssessmentOverview {
            assessment,
            framework_code: framework.code,
            responses,
            breakdown,
            score_preview: breakdown.score(),
        })
    }

    async fn tree_for(&self, assessment: &Assessment) -> Result<TreeRead, AssessError> {
        let framework = self.service.get_framework(&assessment.framework_id).await?;
        Ok(self.reader.read(&framework.code).await?)
    }

    /// Push a `locator` error when a clause or control is not in the tree.
    async fn check_locator(
        &self,
        assessment: &Assessment,
        locator: &Locator,
        errors: &mut ValidationErrors,
    ) -> Result<(), AssessError> {
        if matches!(locator, Locator::Requirement(_)) {
            return Ok(());
        }
        let read = self.tree_for(assessment).await?;
        if read.tree.resolve(locator).is_none() {
            tracing::debug!(locator = %locator.key(), code = read.tree.code(), "locator not in tree");
            errors.push(
                "locator",
                format!(
                    "{} is not part of framework {}",
                    locator.key(),
                    read.tree.code()
                ),
            );
        }
        Ok(())
    }
}
