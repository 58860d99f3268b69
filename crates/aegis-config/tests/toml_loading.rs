//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var and cwd manipulation.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use aegis_config::{AegisConfig, ConfigError, StorageBackend};

#[test]
fn loads_storage_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[storage]
backend = "memory"
local_root = "/var/lib/aegis"
prefix = "fw"
"#,
        )?;

        let config: AegisConfig = Figment::from(Serialized::defaults(AegisConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.local_root, "/var/lib/aegis");
        assert_eq!(config.storage.prefix, "fw");
        Ok(())
    });
}

#[test]
fn loads_r2_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[storage]
backend = "r2"

[r2]
account_id = "toml-account"
access_key_id = "toml-key"
secret_access_key = "toml-secret"
bucket_name = "toml-bucket"
endpoint = "http://localhost:9000"
"#,
        )?;

        let config: AegisConfig = Figment::from(Serialized::defaults(AegisConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.storage.backend, StorageBackend::R2);
        assert_eq!(config.r2.account_id, "toml-account");
        assert_eq!(config.r2.bucket_name, "toml-bucket");
        assert_eq!(config.r2.endpoint_url(), "http://localhost:9000");
        assert!(config.r2.is_configured());
        assert!(config.validate().is_ok());
        Ok(())
    });
}

#[test]
fn partial_sections_keep_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[cache]
fetch_timeout_ms = 500

[assessment]
reopen_on_save = false
"#,
        )?;

        let config: AegisConfig = Figment::from(Serialized::defaults(AegisConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.cache.fetch_timeout_ms, 500);
        assert_eq!(config.cache.max_depth, 8);
        assert!(!config.assessment.reopen_on_save);
        assert_eq!(config.assessment.max_text_len, 10_000);
        assert_eq!(config.database.path, ".aegis/aegis.db");
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".aegis"))
            .map_err(|e| e.to_string())?;
        jail.create_file(
            ".aegis/config.toml",
            r#"
[database]
path = "project.db"
"#,
        )?;

        let config = AegisConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config.database.path, "project.db");
        Ok(())
    });
}

#[test]
fn load_rejects_r2_without_credentials() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".aegis"))
            .map_err(|e| e.to_string())?;
        jail.create_file(
            ".aegis/config.toml",
            r#"
[storage]
backend = "r2"
"#,
        )?;

        let err = AegisConfig::load().expect_err("r2 without credentials");
        assert!(matches!(err, ConfigError::NotConfigured { .. }));
        Ok(())
    });
}

#[test]
fn unknown_backend_is_an_extraction_error() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[storage]
backend = "ftp"
"#,
        )?;

        let result: Result<AegisConfig, _> =
            Figment::from(Serialized::defaults(AegisConfig::default()))
                .merge(Toml::file("config.toml"))
                .extract();
        assert!(result.is_err());
        Ok(())
    });
}
