//! Snapshot cache read settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_fetch_timeout_ms() -> u64 {
    2_000
}

const fn default_max_depth() -> usize {
    8
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Upper bound on one snapshot fetch before the reader falls back.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Deepest clause level the cache serves. Publishing a deeper framework
    /// is refused, and the fallback walk stops at the same level.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: default_fetch_timeout_ms(),
            max_depth: default_max_depth(),
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = CacheConfig::default();
        assert_eq!(config.fetch_timeout(), Duration::from_secs(2));
        assert_eq!(config.max_depth, 8);
    }
}
