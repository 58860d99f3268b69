//! Bulk import of a nested framework definition into the content store.
//!
//! The import format mirrors the snapshot document without ids: clauses nest
//! their controls and children inline. Rows are inserted parents first, so
//! every clause lands under an already-existing parent.

use serde::{Deserialize, Serialize};

use aegis_core::entities::Framework;
use aegis_core::enums::FrameworkStatus;

use crate::error::DatabaseError;
use crate::repos::framework::{NewClause, NewControl, NewFramework};
use crate::service::AegisService;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkImport {
    pub code: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Status to leave the framework in. Defaults to DRAFT.
    #[serde(default)]
    pub status: Option<FrameworkStatus>,
    #[serde(default)]
    pub clauses: Vec<ClauseImport>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClauseImport {
    pub number: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_annex: bool,
    /// Explicit sibling order; 1-based position when omitted.
    #[serde(default)]
    pub sort_order: Option<i64>,
    #[serde(default)]
    pub controls: Vec<NewControl>,
    #[serde(default)]
    pub children: Vec<ClauseImport>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub framework: Framework,
    pub clauses: usize,
    pub controls: usize,
}

impl AegisService {
    /// Create a framework with its whole clause/control tree.
    ///
    /// Not transactional: a failure part-way leaves a DRAFT framework with
    /// the rows inserted so far, which is never snapshot-eligible.
    pub async fn import_framework(
        &self,
        input: &FrameworkImport,
    ) -> Result<ImportReport, DatabaseError> {
        let mut framework = self
            .create_framework(&NewFramework {
                code: input.code.clone(),
                name: input.name.clone(),
                version: input.version.clone(),
                description: input.description.clone(),
            })
            .await?;

        let mut clauses = 0usize;
        let mut controls = 0usize;
        // stack of (parent, 1-based position, clause); popped in input order
        let mut pending: Vec<(Option<String>, i64, &ClauseImport)> = input
            .clauses
            .iter()
            .zip(1_i64..)
            .map(|(clause, position)| (None, position, clause))
            .collect();
        pending.reverse();

        while let Some((parent_id, position, clause)) = pending.pop() {
            let row = self
                .create_clause(
                    &framework.id,
                    &NewClause {
                        parent_id,
                        number: clause.number.clone(),
                        title: clause.title.clone(),
                        description: clause.description.clone(),
                        is_annex: clause.is_annex,
                        sort_order: clause.sort_order.unwrap_or(position),
                    },
                )
                .await?;
            clauses += 1;

            for control in &clause.controls {
                self.create_control(&row.id, control).await?;
                controls += 1;
            }

            let first_child = pending.len();
            pending.extend(
                clause
                    .children
                    .iter()
                    .zip(1_i64..)
                    .map(|(child, position)| (Some(row.id.clone()), position, child)),
            );
            pending[first_child..].reverse();
        }

        if let Some(status) = input.status.filter(|s| *s != FrameworkStatus::Draft) {
            framework = self.set_framework_status(&framework.id, status).await?;
        }

        tracing::info!(code = %framework.code, clauses, controls, "framework imported");
        Ok(ImportReport {
            framework,
            clauses,
            controls,
        })
    }
}
