//! Search dispatcher.
//!
//! Builds one query body per registered entity and issues all of them as a
//! single multi-search request. Results stay segregated per entity, in
//! registration order; there is no merging or ranking fusion across
//! entities.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use searchbridge_repository::elastic::queries;
use searchbridge_repository::SearchEngineClient;
use searchbridge_shared::EntityRegistry;

use crate::errors::PipelineError;

/// One entity's slice of a multi-search response.
#[derive(Debug, Clone)]
pub struct EntitySearchResponse {
    /// Entity identifier.
    pub entity: String,
    /// Index the search ran against.
    pub index: String,
    /// The engine's raw response for this entity.
    pub response: Value,
}

impl EntitySearchResponse {
    /// Total hit count reported by the engine.
    pub fn total(&self) -> u64 {
        self.response["hits"]["total"]["value"].as_u64().unwrap_or(0)
    }

    /// The raw hit objects.
    pub fn hits(&self) -> Vec<&Value> {
        self.response["hits"]["hits"]
            .as_array()
            .map(|hits| hits.iter().collect())
            .unwrap_or_default()
    }
}

/// Fans a query out across all registered entities.
pub struct SearchDispatcher {
    engine: Arc<dyn SearchEngineClient>,
    registry: Arc<EntityRegistry>,
}

impl SearchDispatcher {
    /// Create a new dispatcher.
    pub fn new(engine: Arc<dyn SearchEngineClient>, registry: Arc<EntityRegistry>) -> Self {
        Self { engine, registry }
    }

    /// Search all registered entities for `term`.
    ///
    /// The filter map is restricted per entity to its declared fields
    /// before query construction.
    #[instrument(skip(self, filters))]
    pub async fn search(
        &self,
        term: &str,
        filters: &Map<String, Value>,
    ) -> Result<Vec<EntitySearchResponse>, PipelineError> {
        if self.registry.is_empty() {
            return Ok(Vec::new());
        }

        let searches: Vec<(String, Value)> = self
            .registry
            .iter()
            .map(|entity| {
                (
                    entity.index(),
                    queries::build_entity_query(entity.as_ref(), term, filters),
                )
            })
            .collect();

        debug!(entities = searches.len(), "Dispatching multi-search");

        let responses = self.engine.multi_search(&searches).await?;
        if responses.len() != searches.len() {
            return Err(PipelineError::malformed(format!(
                "expected {} multi-search responses, got {}",
                searches.len(),
                responses.len()
            )));
        }

        Ok(self
            .registry
            .iter()
            .zip(responses)
            .map(|(entity, response)| EntitySearchResponse {
                entity: entity.name().to_string(),
                index: entity.index(),
                response,
            })
            .collect())
    }
}
