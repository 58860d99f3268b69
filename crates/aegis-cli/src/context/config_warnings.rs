use aegis_config::{AegisConfig, StorageBackend};

/// Emit warnings for settings that are valid but probably not intended.
pub fn warn_unconfigured(config: &AegisConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &AegisConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if config.storage.backend == StorageBackend::Memory {
        warnings.push(
            "storage.backend is 'memory': snapshots published by this command are discarded on exit."
                .to_string(),
        );
    }

    if config.storage.backend != StorageBackend::R2 && config.r2.is_configured() {
        warnings.push(
            "R2 credentials are set but storage.backend is not 'r2'. Set AEGIS_STORAGE__BACKEND=r2 to use them."
                .to_string(),
        );
    }

    if !config.r2.is_configured() && has_env_prefix(&env_keys, "AEGIS_R2_") {
        warnings.push(
            "R2 config appears default while AEGIS_R2_* env vars exist. Use double underscores (example: AEGIS_R2__ACCOUNT_ID)."
                .to_string(),
        );
    }

    if has_env_prefix(&env_keys, "AEGIS_CACHE_") {
        warnings.push(
            "AEGIS_CACHE_* env vars are ignored. Use double underscores (example: AEGIS_CACHE__FETCH_TIMEOUT_MS)."
                .to_string(),
        );
    }

    warnings
}

/// Keys under `prefix` that are missing the `__` section separator.
fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter()
        .any(|key| key.starts_with(prefix) && !key.starts_with(&format!("{prefix}_")))
}

#[cfg(test)]
mod tests {
    use aegis_config::R2Config;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn default_config_has_no_warnings() {
        let warnings = collect_unconfigured_warnings(&AegisConfig::default(), env(&[]));
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn single_underscore_r2_vars_are_flagged() {
        let warnings = collect_unconfigured_warnings(
            &AegisConfig::default(),
            env(&[("AEGIS_R2_ACCOUNT_ID", "acct")]),
        );
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("AEGIS_R2__ACCOUNT_ID"));
    }

    #[test]
    fn double_underscore_vars_are_not_flagged() {
        let warnings = collect_unconfigured_warnings(
            &AegisConfig::default(),
            env(&[
                ("AEGIS_R2__ACCOUNT_ID", "acct"),
                ("AEGIS_CACHE__FETCH_TIMEOUT_MS", "500"),
            ]),
        );
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn memory_backend_and_unused_r2_are_flagged() {
        let mut config = AegisConfig::default();
        config.storage.backend = StorageBackend::Memory;
        config.r2 = R2Config {
            account_id: "acct".into(),
            access_key_id: "key".into(),
            secret_access_key: "secret".into(),
            ..R2Config::default()
        };

        let warnings = collect_unconfigured_warnings(&config, env(&[]));
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("memory"));
        assert!(warnings[1].contains("AEGIS_STORAGE__BACKEND"));
    }
}
