//! Cloudflare R2 (S3-compatible) credentials for the snapshot bucket.
//!
//! Any S3-compatible endpoint works: set `endpoint` (for example a local
//! `MinIO` at `http://localhost:9000`) and `account_id` may stay empty.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_bucket_name() -> String {
    String::from("aegis-snapshots")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct R2Config {
    #[serde(default)]
    pub account_id: String,

    #[serde(default)]
    pub access_key_id: String,

    #[serde(default)]
    pub secret_access_key: String,

    #[serde(default = "default_bucket_name")]
    pub bucket_name: String,

    /// Overrides the endpoint derived from `account_id`.
    #[serde(default)]
    pub endpoint: String,
}

impl Default for R2Config {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            bucket_name: default_bucket_name(),
            endpoint: String::new(),
        }
    }
}

impl R2Config {
    /// Keys that must still be set before the bucket can be opened.
    #[must_use]
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.account_id.is_empty() && self.endpoint.is_empty() {
            missing.push("account_id");
        }
        for (key, value) in [
            ("access_key_id", &self.access_key_id),
            ("secret_access_key", &self.secret_access_key),
            ("bucket_name", &self.bucket_name),
        ] {
            if value.is_empty() {
                missing.push(key);
            }
        }
        missing
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.missing_keys().is_empty()
    }

    /// `Ok` when every required key is set.
    ///
    /// # Errors
    ///
    /// `ConfigError::NotConfigured` listing the missing keys.
    pub fn require(&self) -> Result<(), ConfigError> {
        let missing = self.missing_keys();
        if missing.is_empty() {
            return Ok(());
        }
        Err(ConfigError::NotConfigured {
            section: "r2".into(),
            missing: missing.into_iter().map(String::from).collect(),
        })
    }

    #[must_use]
    pub fn endpoint_url(&self) -> String {
        if self.endpoint.is_empty() {
            format!("https://{}.r2.cloudflarestorage.com", self.account_id)
        } else {
            self.endpoint.clone()
        }
    }

    /// Whether the endpoint is plain HTTP (local S3 emulators).
    #[must_use]
    pub fn is_plain_http(&self) -> bool {
        self.endpoint_url().starts_with("http://")
    }
}
