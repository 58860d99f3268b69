//! Response repository: atomic upsert keyed by (assessment, locator).
//!
//! A save is two statements. The upsert inserts or overwrites the single row
//! for the locator, guarded by the assessment's status. The lifecycle update
//! then moves NOT_STARTED or COMPLETED assessments to IN_PROGRESS. Each
//! statement is atomic on its own, so concurrent first saves never create
//! two rows and never set the start date twice.

use chrono::Utc;
use serde::Serialize;

use aegis_core::entities::{Assessment, Locator, Response};
use aegis_core::enums::AssessmentStatus;
use aegis_core::fields::ResponseFields;
use aegis_core::ids::PREFIX_RESPONSE;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, get_opt_u8, parse_datetime, parse_enum};
use crate::repos::assessment::invalid_transition;
use crate::service::AegisService;

const SELECT_COLS: &str = "id, assessment_id, clause_id, control_id, requirement_id, \
     compliance_status, maturity_level, gaps, recommendations, notes, created_at, updated_at";

fn row_to_response(row: &libsql::Row) -> Result<Response, DatabaseError> {
    Ok(Response {
        id: row.get(0)?,
        assessment_id: row.get(1)?,
        locator: Locator::from_columns(
            get_opt_string(row, 2)?,
            get_opt_string(row, 3)?,
            get_opt_string(row, 4)?,
        )?,
        compliance_status: parse_enum(&row.get::<String>(5)?)?,
        maturity_level: get_opt_u8(row, 6)?,
        gaps: get_opt_string(row, 7)?,
        recommendations: get_opt_string(row, 8)?,
        notes: get_opt_string(row, 9)?,
        created_at: parse_datetime(&row.get::<String>(10)?)?,
        updated_at: parse_datetime(&row.get::<String>(11)?)?,
    })
}

/// Result of a save: the stored row and the assessment after any transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSave {
    pub response: Response,
    pub assessment: Assessment,
}

impl AegisService {
    /// Insert or overwrite the response for `locator` (last write wins).
    ///
    /// Locators are stored as given; resolving them against the framework
    /// tree is the caller's job.
    ///
    /// # Errors
    ///
    /// `CoreError::Validation` for out-of-range fields (nothing is written),
    /// `CoreError::NotFound` for an unknown assessment, and
    /// `CoreError::InvalidTransition` when the assessment is ARCHIVED, or
    /// COMPLETED with reopening disabled.
    pub async fn save_response(
        &self,
        assessment_id: &str,
        locator: &Locator,
        fields: &ResponseFields,
    ) -> Result<ResponseSave, DatabaseError> {
        let policy = self.policy();
        fields.check(policy.max_text_len)?;

        let now = Utc::now().to_rfc3339();
        let id = self.db().generate_id(PREFIX_RESPONSE).await?;
        let key = locator.key();

        let written = self
            .db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO responses ({SELECT_COLS}, locator_key)
                     SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11, ?12
                     WHERE EXISTS (
                         SELECT 1 FROM assessments
                         WHERE id = ?2
                           AND (status IN ('NOT_STARTED', 'IN_PROGRESS')
                                OR (?13 AND status = 'COMPLETED'))
                     )
                     ON CONFLICT(assessment_id, locator_key) DO UPDATE SET
                         compliance_status = excluded.compliance_status,
                         maturity_level = excluded.maturity_level,
                         gaps = excluded.gaps,
                         recommendations = excluded.recommendations,
                         notes = excluded.notes,
                         updated_at = excluded.updated_at"
                ),
                libsql::params![
                    id.as_str(),
                    assessment_id,
                    locator.clause_id(),
                    locator.control_id(),
                    locator.requirement_id(),
                    fields.compliance_status.as_str(),
                    fields.maturity_level.map(i64::from),
                    fields.gaps.as_deref(),
                    fields.recommendations.as_deref(),
                    fields.notes.as_deref(),
                    now.as_str(),
                    key.as_str(),
                    i64::from(policy.reopen_on_save)
                ],
            )
            .await?;

        if written == 0 {
            let current = self.get_assessment(assessment_id).await?;
            return Err(match current.status {
                AssessmentStatus::Archived | AssessmentStatus::Completed => {
                    invalid_transition(&current, AssessmentStatus::InProgress)
                }
                _ => DatabaseError::InvalidState(format!(
                    "response for {key} on {assessment_id} was not written"
                )),
            });
        }

        let moved = self
            .db()
            .conn()
            .execute(
                "UPDATE assessments
                 SET status = 'IN_PROGRESS',
                     start_date = COALESCE(start_date, ?2),
                     end_date = NULL,
                     updated_at = ?2
                 WHERE id = ?1 AND status IN ('NOT_STARTED', 'COMPLETED')",
                libsql::params![assessment_id, now.as_str()],
            )
            .await?;
        if moved > 0 {
            tracing::info!(assessment_id, "assessment moved to IN_PROGRESS");
        }
        tracing::debug!(assessment_id, locator = %key, "response saved");

        let response = self
            .get_response(assessment_id, locator)
            .await?
            .ok_or(DatabaseError::NoResult)?;
        let assessment = self.get_assessment(assessment_id).await?;
        Ok(ResponseSave {
            response,
            assessment,
        })
    }

    pub async fn get_response(
        &self,
        assessment_id: &str,
        locator: &Locator,
    ) -> Result<Option<Response>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM responses
                     WHERE assessment_id = ?1 AND locator_key = ?2"
                ),
                libsql::params![assessment_id, locator.key()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_response(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_responses(&self, assessment_id: &str) -> Result<Vec<Response>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM responses
                     WHERE assessment_id = ?1 ORDER BY created_at, id"
                ),
                [assessment_id],
            )
            .await?;

        let mut responses = Vec::new();
        while let Some(row) = rows.next().await? {
            responses.push(row_to_response(&row)?);
        }
        Ok(responses)
    }
}
