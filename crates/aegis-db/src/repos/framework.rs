//! Content store repository: frameworks, clauses, controls.
//!
//! Reads are ordered the way snapshots are: sibling clauses by `sort_order`
//! then `id`, controls by `number` then `id`.

use chrono::Utc;
use serde::Deserialize;

use aegis_core::entities::{Clause, Control, Framework};
use aegis_core::enums::FrameworkStatus;
use aegis_core::errors::CoreError;
use aegis_core::ids::{PREFIX_CLAUSE, PREFIX_CONTROL, PREFIX_FRAMEWORK};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum};
use crate::service::AegisService;

const FRAMEWORK_COLS: &str =
    "id, code, name, version, description, status, created_at, updated_at";

const CLAUSE_COLS: &str = "id, framework_id, parent_id, number, title, description, is_annex, \
     sort_order, created_at, updated_at";

const CONTROL_COLS: &str =
    "id, clause_id, number, title, category, objective, guidance, created_at, updated_at";

#[derive(Debug, Clone, Deserialize)]
pub struct NewFramework {
    pub code: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewClause {
    pub parent_id: Option<String>,
    pub number: String,
    pub title: String,
    pub description: Option<String>,
    pub is_annex: bool,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewControl {
    pub number: String,
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default)]
    pub guidance: Option<String>,
}

fn row_to_framework(row: &libsql::Row) -> Result<Framework, DatabaseError> {
    Ok(Framework {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        version: row.get(3)?,
        description: get_opt_string(row, 4)?,
        status: parse_enum(&row.get::<String>(5)?)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

fn row_to_clause(row: &libsql::Row) -> Result<Clause, DatabaseError> {
    Ok(Clause {
        id: row.get(0)?,
        framework_id: row.get(1)?,
        parent_id: get_opt_string(row, 2)?,
        number: row.get(3)?,
        title: row.get(4)?,
        description: get_opt_string(row, 5)?,
        is_annex: row.get::<i64>(6)? != 0,
        sort_order: row.get(7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        updated_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

fn row_to_control(row: &libsql::Row) -> Result<Control, DatabaseError> {
    Ok(Control {
        id: row.get(0)?,
        clause_id: row.get(1)?,
        number: row.get(2)?,
        title: row.get(3)?,
        category: get_opt_string(row, 4)?,
        objective: get_opt_string(row, 5)?,
        guidance: get_opt_string(row, 6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl AegisService {
    // -----------------------------------------------------------------------
    // Frameworks
    // -----------------------------------------------------------------------

    /// Create a DRAFT framework.
    ///
    /// # Errors
    ///
    /// Returns a validation error on `code` if the code is blank or taken.
    pub async fn create_framework(&self, input: &NewFramework) -> Result<Framework, DatabaseError> {
        if input.code.trim().is_empty() {
            return Err(CoreError::field("code", "must not be empty").into());
        }
        if self.framework_by_code(&input.code).await?.is_some() {
            return Err(
                CoreError::field("code", format!("'{}' already exists", input.code)).into(),
            );
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_FRAMEWORK).await?;
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO frameworks ({FRAMEWORK_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
                ),
                libsql::params![
                    id.as_str(),
                    input.code.as_str(),
                    input.name.as_str(),
                    input.version.as_str(),
                    input.description.as_deref(),
                    FrameworkStatus::Draft.as_str(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        tracing::debug!(framework_id = %id, code = %input.code, "framework created");
        Ok(Framework {
            id,
            code: input.code.clone(),
            name: input.name.clone(),
            version: input.version.clone(),
            description: input.description.clone(),
            status: FrameworkStatus::Draft,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn set_framework_status(
        &self,
        framework_id: &str,
        status: FrameworkStatus,
    ) -> Result<Framework, DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE frameworks SET status = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![status.as_str(), Utc::now().to_rfc3339(), framework_id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::not_found("framework", framework_id));
        }
        tracing::info!(framework_id, status = %status, "framework status changed");
        self.get_framework(framework_id).await
    }

    pub async fn get_framework(&self, id: &str) -> Result<Framework, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {FRAMEWORK_COLS} FROM frameworks WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("framework", id))?;
        row_to_framework(&row)
    }

    /// Look up a framework by its stable code. `None` when no such code exists.
    pub async fn framework_by_code(&self, code: &str) -> Result<Option<Framework>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {FRAMEWORK_COLS} FROM frameworks WHERE code = ?1"),
                [code],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_framework(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_frameworks(
        &self,
        status: Option<FrameworkStatus>,
    ) -> Result<Vec<Framework>, DatabaseError> {
        let mut rows = match status {
            Some(status) => {
                self.db()
                    .conn()
                    .query(
                        &format!(
                            "SELECT {FRAMEWORK_COLS} FROM frameworks WHERE status = ?1 ORDER BY code"
                        ),
                        [status.as_str()],
                    )
                    .await?
            }
            None => {
                self.db()
                    .conn()
                    .query(
                        &format!("SELECT {FRAMEWORK_COLS} FROM frameworks ORDER BY code"),
                        (),
                    )
                    .await?
            }
        };

        let mut frameworks = Vec::new();
        while let Some(row) = rows.next().await? {
            frameworks.push(row_to_framework(&row)?);
        }
        Ok(frameworks)
    }

    // -----------------------------------------------------------------------
    // Clauses
    // -----------------------------------------------------------------------

    /// Insert a clause under an existing parent (or as a root).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown framework, and a validation error on
    /// `parentId` when the parent is missing or belongs to another framework.
    pub async fn create_clause(
        &self,
        framework_id: &str,
        input: &NewClause,
    ) -> Result<Clause, DatabaseError> {
        self.get_framework(framework_id).await?;
        if let Some(parent_id) = input.parent_id.as_deref() {
            match self.get_clause(parent_id).await {
                Ok(parent) if parent.framework_id == framework_id => {}
                Ok(_) => {
                    return Err(CoreError::field(
                        "parentId",
                        format!("{parent_id} belongs to another framework"),
                    )
                    .into());
                }
                Err(e) if e.is_not_found() => {
                    return Err(
                        CoreError::field("parentId", format!("{parent_id} does not exist")).into(),
                    );
                }
                Err(e) => return Err(e),
            }
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_CLAUSE).await?;
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO clauses ({CLAUSE_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
                ),
                libsql::params![
                    id.as_str(),
                    framework_id,
                    input.parent_id.as_deref(),
                    input.number.as_str(),
                    input.title.as_str(),
                    input.description.as_deref(),
                    i64::from(input.is_annex),
                    input.sort_order,
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(Clause {
            id,
            framework_id: framework_id.to_string(),
            parent_id: input.parent_id.clone(),
            number: input.number.clone(),
            title: input.title.clone(),
            description: input.description.clone(),
            is_annex: input.is_annex,
            sort_order: input.sort_order,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_clause(&self, id: &str) -> Result<Clause, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {CLAUSE_COLS} FROM clauses WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("clause", id))?;
        row_to_clause(&row)
    }

    /// Direct children of `parent_id` (roots when `None`), in sibling order.
    pub async fn list_clauses(
        &self,
        framework_id: &str,
        parent_id: Option<&str>,
    ) -> Result<Vec<Clause>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {CLAUSE_COLS} FROM clauses
                     WHERE framework_id = ?1 AND parent_id IS ?2
                     ORDER BY sort_order, id"
                ),
                libsql::params![framework_id, parent_id],
            )
            .await?;

        let mut clauses = Vec::new();
        while let Some(row) = rows.next().await? {
            clauses.push(row_to_clause(&row)?);
        }
        Ok(clauses)
    }

    // -----------------------------------------------------------------------
    // Controls
    // -----------------------------------------------------------------------

    pub async fn create_control(
        &self,
        clause_id: &str,
        input: &NewControl,
    ) -> Result<Control, DatabaseError> {
        self.get_clause(clause_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_CONTROL).await?;
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO controls ({CONTROL_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
                ),
                libsql::params![
                    id.as_str(),
                    clause_id,
                    input.number.as_str(),
                    input.title.as_str(),
                    input.category.as_deref(),
                    input.objective.as_deref(),
                    input.guidance.as_deref(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(Control {
            id,
            clause_id: clause_id.to_string(),
            number: input.number.clone(),
            title: input.title.clone(),
            category: input.category.clone(),
            objective: input.objective.clone(),
            guidance: input.guidance.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Controls of one clause ordered by number, then id.
    pub async fn list_controls(&self, clause_id: &str) -> Result<Vec<Control>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {CONTROL_COLS} FROM controls WHERE clause_id = ?1 ORDER BY number, id"
                ),
                [clause_id],
            )
            .await?;

        let mut controls = Vec::new();
        while let Some(row) = rows.next().await? {
            controls.push(row_to_control(&row)?);
        }
        Ok(controls)
    }
}
