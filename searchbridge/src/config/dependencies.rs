//! Dependency initialization and wiring for the console binary.

use std::env;
use std::fs;
use std::sync::Arc;

use tracing::info;

use crate::output::BarProgress;
use crate::AppError;
use searchbridge_pipeline::{
    BulkIndexer, IndexerConfig, MappingManager, SearchDispatcher, StatusReporter,
};
use searchbridge_repository::{ElasticsearchClient, PgRecordStore, SearchEngineClient};
use searchbridge_shared::EntityRegistry;

/// Default Elasticsearch URL.
const DEFAULT_ELASTICSEARCH_URL: &str = "http://localhost:9200";

/// Default Postgres URL for the backing store.
const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/searchbridge";

/// Default entities file path.
const DEFAULT_ENTITIES_FILE: &str = "entities.json";

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The deployment's registered entities.
    pub registry: Arc<EntityRegistry>,
    /// Bulk indexer wired to the engine and backing store.
    pub indexer: BulkIndexer,
    /// Mapping manager.
    pub mappings: MappingManager,
    /// Multi-entity search dispatcher.
    pub dispatcher: SearchDispatcher,
    /// Status reporter.
    pub status: StatusReporter,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ELASTICSEARCH_URL`: search engine URL (default: http://localhost:9200)
    /// - `DATABASE_URL`: Postgres backing store (default:
    ///   postgres://localhost:5432/searchbridge); connections are lazy, so
    ///   commands that never read records work without a database
    /// - `ENTITIES_FILE`: entity declarations (default: entities.json)
    /// - `INDEX_BATCH_SIZE`: bulk batch size override
    pub async fn new() -> Result<Self, AppError> {
        let elasticsearch_url = env::var("ELASTICSEARCH_URL")
            .unwrap_or_else(|_| DEFAULT_ELASTICSEARCH_URL.to_string());
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let entities_file =
            env::var("ENTITIES_FILE").unwrap_or_else(|_| DEFAULT_ENTITIES_FILE.to_string());

        info!(
            elasticsearch_url = %elasticsearch_url,
            entities_file = %entities_file,
            "Initializing dependencies"
        );

        let contents = fs::read_to_string(&entities_file)
            .map_err(|e| AppError::config(format!("Failed to read {}: {}", entities_file, e)))?;
        let registry = EntityRegistry::from_json(&contents)
            .map_err(|e| AppError::config(format!("Failed to parse {}: {}", entities_file, e)))?;
        if registry.is_empty() {
            return Err(AppError::config(format!(
                "{} declares no entities",
                entities_file
            )));
        }
        let registry = Arc::new(registry);

        info!(entities = registry.len(), "Loaded entity registry");

        let engine = Arc::new(ElasticsearchClient::new(&elasticsearch_url)?);

        // Verify the engine is reachable before running any command
        if !engine.ping().await? {
            return Err(AppError::config(format!(
                "Elasticsearch at {} is not responding",
                elasticsearch_url
            )));
        }
        info!("Elasticsearch connection verified");

        let store = Arc::new(PgRecordStore::connect_lazy(&database_url)?);

        let mut indexer_config = IndexerConfig::default();
        if let Ok(batch_size) = env::var("INDEX_BATCH_SIZE") {
            indexer_config.batch_size = batch_size
                .parse()
                .ok()
                .filter(|&size: &usize| size > 0)
                .ok_or_else(|| {
                    AppError::config("INDEX_BATCH_SIZE must be a positive integer")
                })?;
        }

        let indexer = BulkIndexer::with_config(engine.clone(), store, indexer_config)
            .with_progress(Arc::new(BarProgress::new()));
        let mappings = MappingManager::new(engine.clone());
        let dispatcher = SearchDispatcher::new(engine.clone(), registry.clone());
        let status = StatusReporter::new(engine, registry.clone());

        Ok(Self {
            registry,
            indexer,
            mappings,
            dispatcher,
            status,
        })
    }
}
