//! Snapshot object storage selection.

use serde::{Deserialize, Serialize};

/// Where snapshot documents are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process-local, lost on exit. Tests and dry runs.
    Memory,
    /// A directory on the local filesystem.
    #[default]
    Local,
    /// An S3-compatible bucket (configured under `[r2]`).
    R2,
}

fn default_local_root() -> String {
    String::from(".aegis/snapshots")
}

fn default_prefix() -> String {
    String::from("frameworks")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Root directory for the `local` backend.
    #[serde(default = "default_local_root")]
    pub local_root: String,

    /// Key prefix under which one document per framework code is stored.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            local_root: default_local_root(),
            prefix: default_prefix(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = StorageConfig::default();
        assert_eq!(config.backend, StorageBackend::Local);
        assert_eq!(config.local_root, ".aegis/snapshots");
        assert_eq!(config.prefix, "frameworks");
    }
}
