use std::sync::Arc;

use anyhow::Context;

use aegis_assess::AssessmentEngine;
use aegis_config::AegisConfig;
use aegis_db::service::AegisService;
use aegis_snapshot::{SnapshotBuilder, SnapshotCache};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: Arc<AegisService>,
    pub cache: SnapshotCache,
    pub builder: SnapshotBuilder<Arc<AegisService>>,
    pub engine: AssessmentEngine,
}

impl AppContext {
    /// Open the database and the snapshot store named by `config`.
    pub async fn init(config: AegisConfig) -> anyhow::Result<Self> {
        let service = AegisService::open(&config)
            .await
            .with_context(|| format!("failed to open database at {}", config.database.path))?;
        let service = Arc::new(service);

        let cache =
            SnapshotCache::from_config(&config).context("failed to open snapshot store")?;
        tracing::debug!(
            backend = ?config.storage.backend,
            prefix = %config.storage.prefix,
            "snapshot store ready"
        );

        let builder = SnapshotBuilder::new(Arc::clone(&service), cache.clone(), &config.cache);
        let engine = AssessmentEngine::new(Arc::clone(&service), cache.clone(), &config.cache);

        Ok(Self {
            service,
            cache,
            builder,
            engine,
        })
    }
}
