//! # aegis-config
//!
//! Layered configuration loading for Aegis using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`AEGIS_*` prefix, `__` as separator)
//! 2. Project-level `.aegis/config.toml`
//! 3. User-level `~/.config/aegis/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `AEGIS_CACHE__FETCH_TIMEOUT_MS` -> `cache.fetch_timeout_ms`,
//! `AEGIS_R2__ACCOUNT_ID` -> `r2.account_id`, etc. The `__` (double
//! underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use aegis_config::AegisConfig;
//!
//! let config = AegisConfig::load_with_dotenv().expect("config");
//! println!("database at {}", config.database.path);
//! ```

mod assessment;
mod cache;
mod database;
mod error;
mod r2;
mod storage;

pub use assessment::AssessmentConfig;
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use r2::R2Config;
pub use storage::{StorageBackend, StorageConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AegisConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub r2: R2Config,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub assessment: AssessmentConfig,
}

impl AegisConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`AegisConfig::load_with_dotenv`] for
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or the result is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or the result is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".aegis/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("AEGIS_").split("__"))
    }

    /// Cross-section checks that serde defaults cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when the `r2` backend is selected
    /// without credentials, or `ConfigError::InvalidValue` for zero limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.backend == StorageBackend::R2 {
            self.r2.require()?;
        }
        if self.cache.max_depth == 0 {
            return Err(ConfigError::invalid("cache.max_depth", "must be at least 1"));
        }
        if self.assessment.max_text_len == 0 {
            return Err(ConfigError::invalid(
                "assessment.max_text_len",
                "must be at least 1",
            ));
        }
        if self.storage.prefix.trim_matches('/').is_empty() {
            return Err(ConfigError::invalid("storage.prefix", "must not be empty"));
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("aegis").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir looking
    /// for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
