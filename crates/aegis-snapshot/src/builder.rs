//! Snapshot builder: walk a published framework and overwrite its cache entry.

use serde::Serialize;

use aegis_config::CacheConfig;

use crate::cache::SnapshotCache;
use crate::error::SnapshotError;
use crate::source::ContentSource;
use crate::walk::Walker;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishReport {
    pub code: String,
    pub key: String,
    pub clauses: usize,
    pub controls: usize,
    pub bytes: usize,
}

/// Outcome of one framework within [`SnapshotBuilder::publish_all`].
#[derive(Debug)]
pub struct PublishOutcome {
    pub code: String,
    pub result: Result<PublishReport, SnapshotError>,
}

pub struct SnapshotBuilder<S> {
    source: S,
    cache: SnapshotCache,
    walker: Walker,
}

impl<S: ContentSource> SnapshotBuilder<S> {
    /// Builder that refuses frameworks deeper than `config.max_depth`, the
    /// same limit the reader's fallback walks to.
    pub const fn new(source: S, cache: SnapshotCache, config: &CacheConfig) -> Self {
        Self {
            source,
            cache,
            walker: Walker::bounded(config.max_depth).strict(),
        }
    }

    #[must_use]
    pub const fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// Build the snapshot for `code` and write it to its fixed key.
    ///
    /// The document is assembled and serialized in memory first; the cache
    /// is touched only by the single put at the end, so a failed walk leaves
    /// the previous snapshot in place.
    ///
    /// # Errors
    ///
    /// `FrameworkNotFound` for an unknown code, `NotPublished` for a
    /// framework that is not PUBLISHED, `TooDeep` past the depth limit
    /// (nothing is written in either case), or any walk, encoding, or
    /// storage error.
    pub async fn publish(&self, code: &str) -> Result<PublishReport, SnapshotError> {
        let framework = self
            .source
            .framework_by_code(code)
            .await?
            .ok_or_else(|| SnapshotError::FrameworkNotFound {
                code: code.to_string(),
            })?;
        if !framework.status.is_snapshot_eligible() {
            return Err(SnapshotError::NotPublished {
                code: framework.code,
                status: framework.status,
            });
        }

        let document = self.walker.document(&self.source, &framework).await?;
        let bytes = serde_json::to_vec(&document)?;
        let size = bytes.len();
        let key = self.cache.store(&framework.code, bytes).await?;

        let report = PublishReport {
            code: framework.code,
            key: key.to_string(),
            clauses: document.clause_count(),
            controls: document.control_count(),
            bytes: size,
        };
        tracing::info!(
            code = %report.code,
            key = %report.key,
            clauses = report.clauses,
            controls = report.controls,
            "snapshot published"
        );
        Ok(report)
    }

    /// Publish every PUBLISHED framework. One failure does not stop the rest.
    ///
    /// # Errors
    ///
    /// Only listing the frameworks can fail the whole call; per-framework
    /// failures are reported in each [`PublishOutcome`].
    pub async fn publish_all(&self) -> Result<Vec<PublishOutcome>, SnapshotError> {
        let frameworks = self.source.published_frameworks().await?;
        let mut outcomes = Vec::with_capacity(frameworks.len());
        for framework in frameworks {
            let result = self.publish(&framework.code).await;
            if let Err(e) = &result {
                tracing::warn!(code = %framework.code, error = %e, "snapshot publish failed");
            }
            outcomes.push(PublishOutcome {
                code: framework.code,
                result,
            });
        }
        Ok(outcomes)
    }

    /// Drop the cached snapshot for `code`. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Store` on storage failure.
    pub async fn retire(&self, code: &str) -> Result<bool, SnapshotError> {
        let existed = self.cache.evict(code).await?;
        tracing::info!(code, existed, "snapshot retired");
        Ok(existed)
    }
}
