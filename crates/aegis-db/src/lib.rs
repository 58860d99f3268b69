//! # aegis-db
//!
//! libSQL database operations for Aegis.
//!
//! Holds the content store (frameworks, clauses, controls) that snapshots are
//! built from, and the assessment state (assessments, responses) mutated by
//! the assessment engine. Repository methods live on
//! [`service::AegisService`] in the `repos` modules.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle for all Aegis state.
///
/// Wraps a libSQL database and connection and provides ID generation.
pub struct AegisDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl AegisDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let aegis_db = Self { db, conn };
        aegis_db.run_migrations().await?;
        tracing::debug!(path, "database opened");
        Ok(aegis_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"fwk-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> AegisDb {
        AegisDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        for table in ["frameworks", "clauses", "controls", "assessments", "responses"] {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("fwk").await.unwrap();
        assert!(id.starts_with("fwk-"), "ID should start with 'fwk-': {id}");
        assert_eq!(id.len(), 12, "ID should be 12 chars: {id}");
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn generate_id_all_prefixes() {
        let db = test_db().await;
        for prefix in aegis_core::ids::ALL_PREFIXES {
            let id = db.generate_id(prefix).await.unwrap();
            assert!(id.starts_with(&format!("{prefix}-")));
        }
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = db.generate_id("tst").await.unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn response_locator_check_rejects_two_targets() {
        let db = test_db().await;
        db.conn()
            .execute_batch(
                "INSERT INTO frameworks (id, code, name, version) VALUES ('fwk-1', 'F', 'F', '1');
                 INSERT INTO assessments (id, org_id, framework_id, name) VALUES ('asm-1', 'org', 'fwk-1', 'a');",
            )
            .await
            .unwrap();

        let result = db
            .conn()
            .execute(
                "INSERT INTO responses (id, assessment_id, clause_id, control_id, locator_key, compliance_status)
                 VALUES ('rsp-1', 'asm-1', 'cls-1', 'ctl-1', 'clause:cls-1', 'COMPLIANT')",
                (),
            )
            .await;
        assert!(result.is_err(), "two locator columns must be rejected");
    }

    #[tokio::test]
    async fn foreign_keys_enforced() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO clauses (id, framework_id, number, title) VALUES ('cls-1', 'fwk-missing', '1', 'x')",
                (),
            )
            .await;
        assert!(result.is_err());
    }
}
