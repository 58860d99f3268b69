//! Snapshot cache: one JSON document per framework code at a fixed key.
//!
//! Keys are `{prefix}/{code}.json`, with the code percent-encoded as a single
//! path segment so that distinct codes never share a key. Republishing
//! overwrites the same key with a single put, so readers see either the old
//! or the new document and never a partial one. No history is kept.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use object_store::path::{Path, PathPart};
use object_store::{ObjectMeta, ObjectStore, PutPayload};
use serde::Serialize;

use aegis_config::AegisConfig;
use aegis_core::snapshot::FrameworkDocument;

use crate::error::SnapshotError;
use crate::store::open_object_store;

const SUFFIX: &str = ".json";

/// Listing entry for one cached snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    pub key: String,
    /// Code decoded from the key.
    pub code: String,
    pub size: u64,
    /// Object modification time, i.e. when the snapshot was built.
    pub built_at: DateTime<Utc>,
}

impl SnapshotMeta {
    fn from_object(meta: &ObjectMeta) -> Self {
        let key = meta.location.to_string();
        let code = meta
            .location
            .filename()
            .map(|name| {
                let stem = name.strip_suffix(SUFFIX).unwrap_or(name);
                urlencoding::decode(stem).map_or_else(|_| stem.to_string(), |code| code.into_owned())
            })
            .unwrap_or_default();
        Self {
            key,
            code,
            size: meta.size,
            built_at: meta.last_modified,
        }
    }
}

/// A document read back from the cache.
#[derive(Debug, Clone)]
pub struct CachedSnapshot {
    pub document: FrameworkDocument,
    pub meta: SnapshotMeta,
}

#[derive(Debug, Clone)]
pub struct SnapshotCache {
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl SnapshotCache {
    pub fn new(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into().trim_matches('/').to_string(),
        }
    }

    /// Cache backed by the configured storage backend.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the object store cannot be opened.
    pub fn from_config(config: &AegisConfig) -> Result<Self, SnapshotError> {
        let store = open_object_store(&config.storage, &config.r2)?;
        Ok(Self::new(store, config.storage.prefix.clone()))
    }

    /// Process-local cache (tests, dry runs).
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(object_store::memory::InMemory::new()), "frameworks")
    }

    #[must_use]
    pub const fn object_store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// The fixed key for `code`. Distinct codes never share a key.
    #[must_use]
    pub fn key_for(&self, code: &str) -> Path {
        Path::from(self.prefix.as_str()).child(PathPart::from(format!("{code}{SUFFIX}")))
    }

    /// Read and decode the snapshot for `code`. `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Store` on storage failure and
    /// `SnapshotError::Json` when the stored bytes are not a document.
    pub async fn fetch(&self, code: &str) -> Result<Option<CachedSnapshot>, SnapshotError> {
        let key = self.key_for(code);
        let result = match self.store.get(&key).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let meta = SnapshotMeta::from_object(&result.meta);
        let bytes = result.bytes().await?;
        let document = serde_json::from_slice(&bytes)?;
        Ok(Some(CachedSnapshot { document, meta }))
    }

    /// Overwrite the snapshot for `code` with `bytes` in one put.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Store` if the put fails; the previous object
    /// is left in place.
    pub async fn store(&self, code: &str, bytes: Vec<u8>) -> Result<Path, SnapshotError> {
        let key = self.key_for(code);
        self.store.put(&key, PutPayload::from(bytes)).await?;
        Ok(key)
    }

    /// Every cached snapshot under the prefix, ordered by key.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Store` if listing fails.
    pub async fn list(&self) -> Result<Vec<SnapshotMeta>, SnapshotError> {
        let prefix = Path::from(self.prefix.as_str());
        let objects: Vec<ObjectMeta> = self.store.list(Some(&prefix)).try_collect().await?;
        let mut metas: Vec<SnapshotMeta> = objects
            .iter()
            .filter(|meta| {
                meta.location
                    .filename()
                    .is_some_and(|name| name.ends_with(SUFFIX))
            })
            .map(SnapshotMeta::from_object)
            .collect();
        metas.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(metas)
    }

    /// Remove the snapshot for `code`. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Store` on storage failure.
    pub async fn evict(&self, code: &str) -> Result<bool, SnapshotError> {
        let key = self.key_for(code);
        match self.store.head(&key).await {
            Ok(_) => {}
            Err(object_store::Error::NotFound { .. }) => return Ok(false),
            Err(e) => return Err(e.into()),
        }
        match self.store.delete(&key).await {
            Ok(()) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use aegis_core::enums::FrameworkStatus;

    fn document(code: &str) -> FrameworkDocument {
        FrameworkDocument {
            id: "fwk-00000001".into(),
            code: code.into(),
            name: "Test".into(),
            version: "1".into(),
            description: None,
            status: FrameworkStatus::Published,
            clauses: vec![],
        }
    }

    fn cache_at(prefix: &str) -> SnapshotCache {
        SnapshotCache::new(Arc::new(object_store::memory::InMemory::new()), prefix)
    }

    #[test]
    fn key_layout() {
        let cache = cache_at("/fw/");
        assert_eq!(cache.key_for("SOC2").to_string(), "fw/SOC2.json");
        assert_eq!(cache.key_for("nist-csf_2.0").to_string(), "fw/nist-csf_2.0.json");
        assert_eq!(cache.key_for("a/b").to_string(), "fw/a%2Fb.json");
        assert_eq!(cache.key_for("..").to_string(), "fw/...json");
    }

    #[test]
    fn distinct_codes_get_distinct_keys() {
        let cache = cache_at("frameworks");
        let codes = [
            "ISO 27001", "ISO_27001", "ISO%2027001", "../etc", "etc", "a/b", "a%2Fb", "a_b",
        ];
        let keys: std::collections::HashSet<String> =
            codes.iter().map(|c| cache.key_for(c).to_string()).collect();
        assert_eq!(keys.len(), codes.len());
        for key in &keys {
            assert_eq!(key.matches('/').count(), 1, "{key}");
        }
    }

    #[tokio::test]
    async fn listing_decodes_codes() {
        let cache = SnapshotCache::in_memory();
        for code in ["a/b", "ISO 27001", "50%"] {
            cache
                .store(code, serde_json::to_vec(&document(code)).unwrap())
                .await
                .unwrap();
        }
        let codes: Vec<String> = cache
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.code)
            .collect();
        assert_eq!(codes, vec!["50%", "ISO 27001", "a/b"]);
        assert_eq!(cache.fetch("a/b").await.unwrap().unwrap().document.code, "a/b");
    }

    #[tokio::test]
    async fn store_fetch_list_evict() {
        let cache = SnapshotCache::in_memory();
        assert!(cache.fetch("SOC2").await.unwrap().is_none());

        let bytes = serde_json::to_vec(&document("SOC2")).unwrap();
        let size = bytes.len() as u64;
        let key = cache.store("SOC2", bytes).await.unwrap();
        assert_eq!(key.to_string(), "frameworks/SOC2.json");

        let cached = cache.fetch("SOC2").await.unwrap().unwrap();
        assert_eq!(cached.document, document("SOC2"));
        assert_eq!(cached.meta.size, size);

        cache
            .store("ISO27001", serde_json::to_vec(&document("ISO27001")).unwrap())
            .await
            .unwrap();
        let codes: Vec<String> = cache
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.code)
            .collect();
        assert_eq!(codes, vec!["ISO27001", "SOC2"]);

        assert!(cache.evict("SOC2").await.unwrap());
        assert!(!cache.evict("SOC2").await.unwrap());
        assert!(cache.fetch("SOC2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_bytes_are_a_decode_error() {
        let cache = SnapshotCache::in_memory();
        cache.store("BAD", b"{not json".to_vec()).await.unwrap();
        let err = cache.fetch("BAD").await.unwrap_err();
        assert!(matches!(err, SnapshotError::Json(_)));
    }

    #[tokio::test]
    async fn overwrite_replaces_whole_document() {
        let cache = SnapshotCache::in_memory();
        let mut doc = document("SOC2");
        cache
            .store("SOC2", serde_json::to_vec(&doc).unwrap())
            .await
            .unwrap();
        doc.name = "Renamed".into();
        cache
            .store("SOC2", serde_json::to_vec(&doc).unwrap())
            .await
            .unwrap();
        let cached = cache.fetch("SOC2").await.unwrap().unwrap();
        assert_eq!(cached.document.name, "Renamed");
        assert_eq!(cache.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn local_backend_writes_under_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(object_store::local::LocalFileSystem::new_with_prefix(dir.path()).unwrap());
        let cache = SnapshotCache::new(store, "frameworks");
        cache
            .store("ISO27001", serde_json::to_vec(&document("ISO27001")).unwrap())
            .await
            .unwrap();
        assert!(dir.path().join("frameworks/ISO27001.json").is_file());
        assert!(cache.evict("ISO27001").await.unwrap());
        assert!(!dir.path().join("frameworks/ISO27001.json").exists());
    }
}
