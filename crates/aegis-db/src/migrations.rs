//! Embedded schema migrations.
//!
//! Each migration runs once per database file; the highest applied number is
//! kept in `PRAGMA user_version`. The SQL itself is also idempotent, so a
//! database created before version tracking upgrades cleanly.

use crate::AegisDb;
use crate::error::DatabaseError;

/// `(number, name, sql)` in application order.
const MIGRATIONS: &[(i64, &str, &str)] = &[(
    1,
    "001_initial",
    include_str!("../migrations/001_initial.sql"),
)];

impl AegisDb {
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        let applied = self.schema_version().await?;
        for &(number, name, sql) in MIGRATIONS.iter().filter(|(n, _, _)| *n > applied) {
            self.conn
                .execute_batch(sql)
                .await
                .map_err(|e| DatabaseError::Migration(format!("{name}: {e}")))?;
            self.conn
                .execute(&format!("PRAGMA user_version = {number}"), ())
                .await
                .map_err(|e| DatabaseError::Migration(format!("{name}: record version: {e}")))?;
            tracing::debug!(migration = name, "migration applied");
        }
        Ok(())
    }

    /// Highest migration number applied to this database.
    pub(crate) async fn schema_version(&self) -> Result<i64, DatabaseError> {
        let mut rows = self.conn.query("PRAGMA user_version", ()).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }
}
