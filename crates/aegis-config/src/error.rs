//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A provider could not be read or a value has the wrong type.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A section selected for use is missing required keys.
    #[error("[{section}] is selected but missing: {}", missing.join(", "))]
    NotConfigured {
        section: String,
        missing: Vec<String>,
    },

    /// A key is present but out of range.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, reason: &str) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}
