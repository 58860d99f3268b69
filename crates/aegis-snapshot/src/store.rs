//! Object store construction from configuration.

use std::sync::Arc;

use object_store::ObjectStore;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;

use aegis_config::{R2Config, StorageBackend, StorageConfig};

use crate::error::SnapshotError;

/// Open the object store selected by `storage.backend`.
///
/// The local backend writes through a temporary file and rename, so each put
/// replaces the previous object atomically.
///
/// # Errors
///
/// Returns `SnapshotError::Config` when `r2` is selected without credentials,
/// `SnapshotError::Io` if the local root cannot be created, or
/// `SnapshotError::Store` if the backend rejects its settings.
pub fn open_object_store(
    storage: &StorageConfig,
    r2: &R2Config,
) -> Result<Arc<dyn ObjectStore>, SnapshotError> {
    match storage.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemory::new())),
        StorageBackend::Local => {
            std::fs::create_dir_all(&storage.local_root)?;
            Ok(Arc::new(LocalFileSystem::new_with_prefix(&storage.local_root)?))
        }
        StorageBackend::R2 => {
            r2.require()?;
            let s3 = AmazonS3Builder::new()
                .with_allow_http(r2.is_plain_http())
                .with_endpoint(r2.endpoint_url())
                .with_region("auto")
                .with_bucket_name(&r2.bucket_name)
                .with_access_key_id(&r2.access_key_id)
                .with_secret_access_key(&r2.secret_access_key)
                .build()?;
            Ok(Arc::new(s3))
        }
    }
}

#[cfg(test)]
mod tests {
    use aegis_config::ConfigError;

    use super::*;

    #[test]
    fn r2_without_credentials_is_not_configured() {
        let storage = StorageConfig {
            backend: StorageBackend::R2,
            ..StorageConfig::default()
        };
        let err = open_object_store(&storage, &R2Config::default()).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::Config(ConfigError::NotConfigured { .. })
        ));
    }

    #[test]
    fn r2_with_credentials_builds() {
        let storage = StorageConfig {
            backend: StorageBackend::R2,
            ..StorageConfig::default()
        };
        let r2 = R2Config {
            account_id: String::new(),
            access_key_id: "key".into(),
            secret_access_key: "secret".into(),
            bucket_name: "snapshots".into(),
            endpoint: "http://localhost:9000".into(),
        };
        assert!(open_object_store(&storage, &r2).is_ok());
    }

    #[test]
    fn local_backend_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("snapshots");
        let storage = StorageConfig {
            backend: StorageBackend::Local,
            local_root: root.to_string_lossy().into_owned(),
            ..StorageConfig::default()
        };
        open_object_store(&storage, &R2Config::default()).unwrap();
        assert!(root.is_dir());
    }
}
