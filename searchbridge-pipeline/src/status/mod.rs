//! Status reporter.
//!
//! Read-only diagnostics: engine version and per-index document counts.

use std::sync::Arc;

use tracing::instrument;

use searchbridge_repository::{EngineInfo, SearchEngineClient};
use searchbridge_shared::EntityRegistry;

use crate::errors::PipelineError;

/// One row of the status table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRow {
    /// Index name.
    pub index: String,
    /// Document kind of the registered entity backing the index, or `-`
    /// when the index is not known to the registry.
    pub kind: String,
    /// Document count.
    pub count: u64,
    /// Shard success over total, e.g. `2/2`.
    pub shards: String,
}

/// Collects engine diagnostics.
pub struct StatusReporter {
    engine: Arc<dyn SearchEngineClient>,
    registry: Arc<EntityRegistry>,
}

impl StatusReporter {
    /// Create a new status reporter.
    pub fn new(engine: Arc<dyn SearchEngineClient>, registry: Arc<EntityRegistry>) -> Self {
        Self { engine, registry }
    }

    /// Engine identification.
    pub async fn version(&self) -> Result<EngineInfo, PipelineError> {
        Ok(self.engine.info().await?)
    }

    /// One row per live index, with per-index counts and shard stats.
    #[instrument(skip(self))]
    pub async fn status(&self) -> Result<Vec<StatusRow>, PipelineError> {
        let mut rows = Vec::new();

        for index in self.engine.live_indices().await? {
            let stats = self.engine.count(&index).await?;
            let kind = self
                .registry
                .iter()
                .find(|entity| entity.index() == index)
                .map(|entity| entity.doc_kind())
                .unwrap_or_else(|| "-".to_string());

            rows.push(StatusRow {
                index,
                kind,
                count: stats.count,
                shards: format!("{}/{}", stats.shards_successful, stats.shards_total),
            });
        }

        Ok(rows)
    }
}
