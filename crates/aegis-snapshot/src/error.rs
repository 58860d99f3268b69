//! Snapshot error types.

use aegis_config::ConfigError;
use aegis_core::enums::FrameworkStatus;
use aegis_db::error::DatabaseError;

/// Errors from building, storing, or reading framework snapshots.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// No framework has this code.
    #[error("Framework not found: {code}")]
    FrameworkNotFound { code: String },

    /// Only PUBLISHED frameworks are written to the cache.
    #[error("Framework {code} is {status}; only PUBLISHED frameworks are snapshotted")]
    NotPublished {
        code: String,
        status: FrameworkStatus,
    },

    /// The clause tree nests deeper than the cache serves.
    #[error("Framework {code} nests clauses deeper than {max_depth} levels")]
    TooDeep { code: String, max_depth: usize },

    /// A clause was reached twice while walking (corrupt parent links).
    #[error("Cycle detected in clause tree at {clause_id}")]
    CycleDetected { clause_id: String },

    /// Object storage operation failed.
    #[error("Object store error: {0}")]
    Store(#[from] object_store::Error),

    /// Snapshot document could not be encoded or decoded.
    #[error("Snapshot encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// Content store query failed.
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Storage backend is misconfigured.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// I/O error (creating the local snapshot root).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
