use figment::Jail;
use aegis_config::{AegisConfig, StorageBackend};

#[test]
fn env_vars_map_to_nested_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("AEGIS_CACHE__FETCH_TIMEOUT_MS", "750");
        jail.set_env("AEGIS_STORAGE__BACKEND", "memory");
        jail.set_env("AEGIS_ASSESSMENT__MAX_TEXT_LEN", "256");

        let config = AegisConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config.cache.fetch_timeout_ms, 750);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.assessment.max_text_len, 256);
        Ok(())
    });
}

#[test]
fn env_beats_project_toml() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".aegis"))
            .map_err(|e| e.to_string())?;
        jail.create_file(
            ".aegis/config.toml",
            r#"
[database]
path = "from-toml.db"
"#,
        )?;
        jail.set_env("AEGIS_DATABASE__PATH", "from-env.db");

        let config = AegisConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config.database.path, "from-env.db");
        Ok(())
    });
}

#[test]
fn r2_credentials_from_env_satisfy_validation() {
    Jail::expect_with(|jail| {
        jail.set_env("AEGIS_STORAGE__BACKEND", "r2");
        jail.set_env("AEGIS_R2__ACCOUNT_ID", "acc");
        jail.set_env("AEGIS_R2__ACCESS_KEY_ID", "key");
        jail.set_env("AEGIS_R2__SECRET_ACCESS_KEY", "secret");

        let config = AegisConfig::load().map_err(|e| e.to_string())?;
        assert!(config.r2.is_configured());
        assert_eq!(
            config.r2.endpoint_url(),
            "https://acc.r2.cloudflarestorage.com"
        );
        Ok(())
    });
}
