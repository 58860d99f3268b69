//! Assessment repository: create, lifecycle transitions, completion scoring.

use chrono::Utc;

use aegis_core::entities::Assessment;
use aegis_core::enums::{AssessmentStatus, ComplianceStatus};
use aegis_core::errors::CoreError;
use aegis_core::ids::PREFIX_ASSESSMENT;
use aegis_core::scoring::overall_score;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_u8, parse_datetime, parse_enum, parse_optional_datetime};
use crate::service::AegisService;

pub(crate) const SELECT_COLS: &str = "id, org_id, framework_id, name, status, overall_score, \
     start_date, end_date, created_at, updated_at";

pub(crate) fn row_to_assessment(row: &libsql::Row) -> Result<Assessment, DatabaseError> {
    Ok(Assessment {
        id: row.get(0)?,
        org_id: row.get(1)?,
        framework_id: row.get(2)?,
        name: row.get(3)?,
        status: parse_enum(&row.get::<String>(4)?)?,
        overall_score: get_opt_u8(row, 5)?,
        start_date: parse_optional_datetime(row.get::<Option<String>>(6)?.as_deref())?,
        end_date: parse_optional_datetime(row.get::<Option<String>>(7)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        updated_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

pub(crate) fn invalid_transition(
    assessment: &Assessment,
    to: AssessmentStatus,
) -> DatabaseError {
    CoreError::InvalidTransition {
        entity_type: "assessment".into(),
        id: assessment.id.clone(),
        from: assessment.status.as_str().into(),
        to: to.as_str().into(),
    }
    .into()
}

impl AegisService {
    /// Create a NOT_STARTED assessment of an existing framework.
    pub async fn create_assessment(
        &self,
        org_id: &str,
        framework_id: &str,
        name: &str,
    ) -> Result<Assessment, DatabaseError> {
        if org_id.trim().is_empty() {
            return Err(CoreError::field("orgId", "must not be empty").into());
        }
        if name.trim().is_empty() {
            return Err(CoreError::field("name", "must not be empty").into());
        }
        self.get_framework(framework_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ASSESSMENT).await?;
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO assessments ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, NULL, NULL, NULL, ?6, ?7)"
                ),
                libsql::params![
                    id.as_str(),
                    org_id,
                    framework_id,
                    name,
                    AssessmentStatus::NotStarted.as_str(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        tracing::info!(assessment_id = %id, framework_id, "assessment created");
        Ok(Assessment {
            id,
            org_id: org_id.to_string(),
            framework_id: framework_id.to_string(),
            name: name.to_string(),
            status: AssessmentStatus::NotStarted,
            overall_score: None,
            start_date: None,
            end_date: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_assessment(&self, id: &str) -> Result<Assessment, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM assessments WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("assessment", id))?;
        row_to_assessment(&row)
    }

    pub async fn list_assessments(&self, org_id: &str) -> Result<Vec<Assessment>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM assessments WHERE org_id = ?1 ORDER BY created_at, id"
                ),
                [org_id],
            )
            .await?;

        let mut assessments = Vec::new();
        while let Some(row) = rows.next().await? {
            assessments.push(row_to_assessment(&row)?);
        }
        Ok(assessments)
    }

    /// Compliance statuses of every response in an assessment.
    pub async fn response_statuses(
        &self,
        assessment_id: &str,
    ) -> Result<Vec<ComplianceStatus>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT compliance_status FROM responses WHERE assessment_id = ?1",
                [assessment_id],
            )
            .await?;

        let mut statuses = Vec::new();
        while let Some(row) = rows.next().await? {
            statuses.push(parse_enum(&row.get::<String>(0)?)?);
        }
        Ok(statuses)
    }

    /// Score the assessment and mark it COMPLETED.
    ///
    /// The score is computed from the stored responses and persisted once; it
    /// is not recomputed on later reads.
    ///
    /// # Errors
    ///
    /// `CoreError::NoScoredResponses` when every response is `NOT_ASSESSED`,
    /// `CoreError::InvalidTransition` from a state that cannot complete. The
    /// assessment is unchanged in both cases.
    pub async fn complete_assessment(&self, id: &str) -> Result<Assessment, DatabaseError> {
        let current = self.get_assessment(id).await?;
        let score = overall_score(self.response_statuses(id).await?)?;

        if !current.status.can_transition_to(AssessmentStatus::Completed) {
            return Err(invalid_transition(&current, AssessmentStatus::Completed));
        }

        let now = Utc::now();
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE assessments
                 SET status = ?1, overall_score = ?2, end_date = ?3, updated_at = ?3
                 WHERE id = ?4 AND status = ?5",
                libsql::params![
                    AssessmentStatus::Completed.as_str(),
                    i64::from(score),
                    now.to_rfc3339(),
                    id,
                    current.status.as_str()
                ],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::InvalidState(format!(
                "assessment {id} changed while completing"
            )));
        }

        tracing::info!(assessment_id = id, score, "assessment completed");
        Ok(Assessment {
            status: AssessmentStatus::Completed,
            overall_score: Some(score),
            end_date: Some(now),
            updated_at: now,
            ..current
        })
    }

    /// Move any non-archived assessment to ARCHIVED.
    pub async fn archive_assessment(&self, id: &str) -> Result<Assessment, DatabaseError> {
        let current = self.get_assessment(id).await?;
        if !current.status.can_transition_to(AssessmentStatus::Archived) {
            return Err(invalid_transition(&current, AssessmentStatus::Archived));
        }

        let now = Utc::now();
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE assessments SET status = ?1, updated_at = ?2
                 WHERE id = ?3 AND status != ?1",
                libsql::params![AssessmentStatus::Archived.as_str(), now.to_rfc3339(), id],
            )
            .await?;
        if changed == 0 {
            return Err(invalid_transition(
                &self.get_assessment(id).await?,
                AssessmentStatus::Archived,
            ));
        }

        tracing::info!(assessment_id = id, "assessment archived");
        Ok(Assessment {
            status: AssessmentStatus::Archived,
            updated_at: now,
            ..current
        })
    }
}
