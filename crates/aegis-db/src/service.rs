//! Service layer wrapping the database handle with response-write policy.
//!
//! `AegisService` wraps `AegisDb`. All repo methods are implemented as
//! `impl AegisService` blocks under `repos/`.

use std::path::Path;

use aegis_config::{AegisConfig, AssessmentConfig};

use crate::AegisDb;
use crate::error::DatabaseError;

/// Limits and switches applied by `save_response`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponsePolicy {
    /// Character limit for gaps, recommendations, and notes.
    pub max_text_len: usize,
    /// Saving to a COMPLETED assessment reopens it instead of failing.
    pub reopen_on_save: bool,
}

impl Default for ResponsePolicy {
    fn default() -> Self {
        Self::from(&AssessmentConfig::default())
    }
}

impl From<&AssessmentConfig> for ResponsePolicy {
    fn from(config: &AssessmentConfig) -> Self {
        Self {
            max_text_len: config.max_text_len,
            reopen_on_save: config.reopen_on_save,
        }
    }
}

pub struct AegisService {
    db: AegisDb,
    policy: ResponsePolicy,
}

impl AegisService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    /// * `policy` - Response validation and reopen behavior.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str, policy: ResponsePolicy) -> Result<Self, DatabaseError> {
        let db = AegisDb::open_local(db_path).await?;
        Ok(Self { db, policy })
    }

    /// Open the database named by `config`, creating its directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory cannot be created or the
    /// database cannot be opened.
    pub async fn open(config: &AegisConfig) -> Result<Self, DatabaseError> {
        if !config.database.is_in_memory() {
            if let Some(parent) = Path::new(&config.database.path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        DatabaseError::Other(anyhow::anyhow!(
                            "create {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
            }
        }
        Self::new_local(&config.database.path, ResponsePolicy::from(&config.assessment)).await
    }

    /// Create from an existing `AegisDb` (for testing).
    #[must_use]
    pub const fn from_db(db: AegisDb, policy: ResponsePolicy) -> Self {
        Self { db, policy }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &AegisDb {
        &self.db
    }

    #[must_use]
    pub const fn policy(&self) -> ResponsePolicy {
        self.policy
    }
}
