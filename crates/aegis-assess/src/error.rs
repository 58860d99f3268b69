//! Assessment engine error types.

use aegis_core::errors::CoreError;
use aegis_db::error::DatabaseError;
use aegis_snapshot::SnapshotError;

/// Errors from assessment operations across the content store and snapshot cache.
#[derive(Debug, thiserror::Error)]
pub enum AssessError {
    /// Domain rule violation raised by the engine itself.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Error from the libSQL content store.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// Error reading the framework tree.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

impl AssessError {
    /// The domain error underneath, wherever it was raised.
    #[must_use]
    pub const fn as_core(&self) -> Option<&CoreError> {
        match self {
            Self::Core(e) => Some(e),
            Self::Database(e) => e.as_core(),
            Self::Snapshot(SnapshotError::Database(e)) => e.as_core(),
            Self::Snapshot(_) => None,
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.as_core(), Some(CoreError::NotFound { .. }))
            || matches!(self, Self::Snapshot(SnapshotError::FrameworkNotFound { .. }))
    }

    /// Whether this is a validation failure rejecting `field`.
    #[must_use]
    pub fn rejects_field(&self, field: &str) -> bool {
        matches!(self.as_core(), Some(CoreError::Validation(errors)) if errors.has(field))
    }
}
