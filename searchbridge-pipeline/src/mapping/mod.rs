//! Mapping manager.
//!
//! Applies an entity's field mapping to its index, optionally recreating
//! the index first. There is no rollback: if the purge deletes an index
//! and the subsequent create fails, the index stays absent.

use std::sync::Arc;

use tracing::{info, instrument};

use searchbridge_repository::SearchEngineClient;
use searchbridge_shared::EntityMapping;

use crate::errors::PipelineError;

/// Manages index lifecycle and field mappings for entities.
pub struct MappingManager {
    engine: Arc<dyn SearchEngineClient>,
}

impl MappingManager {
    /// Create a new mapping manager.
    pub fn new(engine: Arc<dyn SearchEngineClient>) -> Self {
        Self { engine }
    }

    /// Apply the entity's mapping to its index.
    ///
    /// With `purge`, the index is deleted (when present) and recreated
    /// before the mapping is applied.
    #[instrument(skip(self, entity), fields(entity = entity.name()))]
    pub async fn apply(&self, entity: &dyn EntityMapping, purge: bool) -> Result<(), PipelineError> {
        let index = entity.index();

        if purge {
            if self.engine.index_exists(&index).await? {
                self.engine.delete_index(&index).await?;
            }
            self.engine.create_index(&index).await?;
        }

        self.engine.put_mapping(&index, &entity.mapping_body()).await?;

        info!(index = %index, "Mapping applied");
        Ok(())
    }
}
