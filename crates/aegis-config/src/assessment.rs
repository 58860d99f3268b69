//! Assessment engine policy.

use serde::{Deserialize, Serialize};

const fn default_max_text_len() -> usize {
    10_000
}

const fn default_reopen_on_save() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssessmentConfig {
    /// Character limit for gaps, recommendations, and notes.
    #[serde(default = "default_max_text_len")]
    pub max_text_len: usize,

    /// Whether saving a response to a COMPLETED assessment reopens it.
    /// When false the save is rejected instead.
    #[serde(default = "default_reopen_on_save")]
    pub reopen_on_save: bool,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            max_text_len: default_max_text_len(),
            reopen_on_save: default_reopen_on_save(),
        }
    }
}
