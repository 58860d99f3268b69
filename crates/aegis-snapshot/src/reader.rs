//! Read-through tree reader.
//!
//! A cache hit is decoded and returned. Any miss (absent entry, storage
//! error, undecodable bytes, timeout) is logged and answered by walking the
//! content store to the same depth limit the builder enforces, so every
//! cached document is reproduced exactly.

use std::time::Duration;

use serde::Serialize;

use aegis_config::CacheConfig;
use aegis_core::tree::FrameworkTree;

use crate::cache::SnapshotCache;
use crate::error::SnapshotError;
use crate::source::ContentSource;
use crate::walk::Walker;

/// Where a tree came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeOrigin {
    Cache,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct TreeRead {
    pub tree: FrameworkTree,
    pub origin: TreeOrigin,
}

pub struct TreeReader<S> {
    source: S,
    cache: SnapshotCache,
    fetch_timeout: Duration,
    walker: Walker,
}

impl<S: ContentSource> TreeReader<S> {
    pub fn new(source: S, cache: SnapshotCache, config: &CacheConfig) -> Self {
        Self {
            source,
            cache,
            fetch_timeout: config.fetch_timeout(),
            walker: Walker::bounded(config.max_depth),
        }
    }

    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// The tree for `code`, together with its origin.
    ///
    /// # Errors
    ///
    /// `FrameworkNotFound` when no framework has this code, or a content
    /// store error during fallback. Cache errors are never returned.
    pub async fn read(&self, code: &str) -> Result<TreeRead, SnapshotError> {
        match tokio::time::timeout(self.fetch_timeout, self.cache.fetch(code)).await {
            Ok(Ok(Some(cached))) if cached.document.code == code => {
                tracing::debug!(code, key = %cached.meta.key, "snapshot cache hit");
                return Ok(TreeRead {
                    tree: FrameworkTree::from_document(&cached.document),
                    origin: TreeOrigin::Cache,
                });
            }
            Ok(Ok(Some(cached))) => {
                tracing::warn!(
                    code,
                    cached_code = %cached.document.code,
                    "snapshot key holds another framework; falling back"
                );
            }
            Ok(Ok(None)) => tracing::debug!(code, "snapshot cache miss"),
            Ok(Err(e)) => tracing::warn!(code, error = %e, "snapshot fetch failed; falling back"),
            Err(_) => tracing::warn!(
                code,
                timeout_ms = u64::try_from(self.fetch_timeout.as_millis()).unwrap_or(u64::MAX),
                "snapshot fetch timed out; falling back"
            ),
        }

        let framework = self
            .source
            .framework_by_code(code)
            .await?
            .ok_or_else(|| SnapshotError::FrameworkNotFound {
                code: code.to_string(),
            })?;
        let document = self.walker.document(&self.source, &framework).await?;
        Ok(TreeRead {
            tree: FrameworkTree::from_document(&document),
            origin: TreeOrigin::Fallback,
        })
    }

    /// The tree for `code`.
    ///
    /// # Errors
    ///
    /// See [`TreeReader::read`].
    pub async fn get_tree(&self, code: &str) -> Result<FrameworkTree, SnapshotError> {
        Ok(self.read(code).await?.tree)
    }
}
