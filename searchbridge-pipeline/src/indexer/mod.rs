//! Bulk indexer.
//!
//! Streams backing-store records into batched bulk writes. Transient
//! engine failures are retried with exponential backoff; permanent batch
//! failures and per-item rejections are carried in the returned report
//! instead of halting the run.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{error, info, instrument, warn};

use searchbridge_repository::{
    BulkItemFailure, BulkOperation, BulkSummary, RecordStore, SearchEngineClient, SearchError,
};
use searchbridge_shared::{EntityMapping, EntityRegistry};

use crate::errors::PipelineError;
use crate::mapping::MappingManager;
use crate::progress::{NoProgress, ProgressSink};

/// Configuration for the bulk indexer.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Number of records per bulk write.
    pub batch_size: usize,
    /// Cap on records fetched from the backing store per entity.
    pub fetch_limit: usize,
    /// Maximum number of retry attempts for a transiently failed batch.
    pub max_retries: u32,
    /// Initial retry delay in milliseconds.
    pub initial_retry_delay_ms: u64,
    /// Maximum retry delay in milliseconds.
    pub max_retry_delay_ms: u64,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            fetch_limit: 100_000,
            max_retries: 3,
            initial_retry_delay_ms: 100,
            max_retry_delay_ms: 5000,
        }
    }
}

/// A batch that was not delivered at all, retries included.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    /// 1-based batch number within the run.
    pub batch: usize,
    /// Number of operations in the batch.
    pub size: usize,
    /// The terminal error.
    pub error: String,
}

/// Outcome of indexing one entity.
#[derive(Debug, Clone)]
pub struct IndexReport {
    /// Entity identifier.
    pub entity: String,
    /// Target index.
    pub index: String,
    /// Records fetched from the backing store.
    pub total_records: usize,
    /// Documents the engine accepted.
    pub indexed: usize,
    /// Records that did not make it into the index.
    pub failed: usize,
    /// Number of bulk writes attempted.
    pub batches: usize,
    /// Per-item rejections (engine rejections and records without an id).
    pub item_failures: Vec<BulkItemFailure>,
    /// Batches that were not delivered at all.
    pub batch_failures: Vec<BatchFailure>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration of the run.
    pub duration_ms: u64,
}

/// Streams an entity's records into the search index in fixed-size
/// batches.
pub struct BulkIndexer {
    engine: Arc<dyn SearchEngineClient>,
    store: Arc<dyn RecordStore>,
    mappings: MappingManager,
    config: IndexerConfig,
    progress: Arc<dyn ProgressSink>,
}

impl BulkIndexer {
    /// Create an indexer with default configuration and no progress
    /// output.
    pub fn new(engine: Arc<dyn SearchEngineClient>, store: Arc<dyn RecordStore>) -> Self {
        Self::with_config(engine, store, IndexerConfig::default())
    }

    /// Create an indexer with custom configuration.
    pub fn with_config(
        engine: Arc<dyn SearchEngineClient>,
        store: Arc<dyn RecordStore>,
        config: IndexerConfig,
    ) -> Self {
        Self {
            mappings: MappingManager::new(engine.clone()),
            engine,
            store,
            config,
            progress: Arc::new(NoProgress),
        }
    }

    /// Attach a progress sink.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Index every registered entity in registration order.
    pub async fn index_all(
        &self,
        registry: &EntityRegistry,
        purge: bool,
    ) -> Result<Vec<IndexReport>, PipelineError> {
        let mut reports = Vec::with_capacity(registry.len());
        for entity in registry.iter() {
            reports.push(self.index_entity(entity.as_ref(), purge).await?);
        }
        Ok(reports)
    }

    /// Index one entity.
    ///
    /// With `purge`, the target index and mapping are recreated first.
    #[instrument(skip(self, entity), fields(entity = entity.name()))]
    pub async fn index_entity(
        &self,
        entity: &dyn EntityMapping,
        purge: bool,
    ) -> Result<IndexReport, PipelineError> {
        let started_at = Utc::now();
        let started = Instant::now();
        let index = entity.index();

        if purge {
            self.mappings.apply(entity, true).await?;
        }

        let records = self
            .store
            .fetch_records(entity, self.config.fetch_limit)
            .await?;
        let total = records.len();

        info!(index = %index, total = total, "Indexing records");
        self.progress.begin(total as u64);

        let mut indexed = 0;
        let mut batches = 0;
        let mut submitted = 0;
        let mut item_failures: Vec<BulkItemFailure> = Vec::new();
        let mut batch_failures: Vec<BatchFailure> = Vec::new();

        for (batch_no, chunk) in records.chunks(self.config.batch_size).enumerate() {
            let mut operations = Vec::with_capacity(chunk.len());
            for (offset, record) in chunk.iter().enumerate() {
                match entity.doc_id(record) {
                    Some(doc_id) => operations.push(BulkOperation {
                        index: index.clone(),
                        doc_id,
                        document: entity.body(record),
                    }),
                    None => item_failures.push(BulkItemFailure {
                        doc_id: format!(
                            "<record {}>",
                            batch_no * self.config.batch_size + offset
                        ),
                        status: 0,
                        reason: "record has no unique `id`".to_string(),
                    }),
                }
            }

            batches += 1;
            match self.submit_with_retry(&operations).await {
                Ok(summary) => {
                    indexed += summary.succeeded;
                    item_failures.extend(summary.failures);
                }
                Err(e) => {
                    error!(batch = batch_no + 1, size = operations.len(), error = %e, "Batch not delivered");
                    batch_failures.push(BatchFailure {
                        batch: batch_no + 1,
                        size: operations.len(),
                        error: e.to_string(),
                    });
                }
            }

            submitted += chunk.len();
            self.progress.advance(submitted as u64, total as u64);
        }

        self.progress.finish();

        let report = IndexReport {
            entity: entity.name().to_string(),
            index,
            total_records: total,
            indexed,
            failed: total - indexed,
            batches,
            item_failures,
            batch_failures,
            started_at,
            duration_ms: started.elapsed().as_millis() as u64,
        };

        info!(
            index = %report.index,
            indexed = report.indexed,
            failed = report.failed,
            batches = report.batches,
            "Indexing run finished"
        );
        Ok(report)
    }

    /// Submit one batch, retrying transient failures with exponential
    /// backoff.
    async fn submit_with_retry(
        &self,
        operations: &[BulkOperation],
    ) -> Result<BulkSummary, SearchError> {
        if operations.is_empty() {
            return Ok(BulkSummary::default());
        }

        let mut delay_ms = self.config.initial_retry_delay_ms;
        let mut last_error: Option<SearchError> = None;

        for attempt in 0..=self.config.max_retries {
            match self.engine.bulk_write(operations).await {
                Ok(summary) => {
                    if attempt > 0 {
                        info!(
                            attempt = attempt,
                            count = operations.len(),
                            "Bulk write succeeded after retry"
                        );
                    }
                    return Ok(summary);
                }
                Err(e) => {
                    if !e.is_transient() {
                        return Err(e);
                    }
                    last_error = Some(e.clone());

                    // no sleep after the final attempt
                    if attempt < self.config.max_retries {
                        warn!(
                            attempt = attempt + 1,
                            max_retries = self.config.max_retries,
                            delay_ms = delay_ms,
                            error = %e,
                            "Bulk write failed, retrying"
                        );
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                        delay_ms = std::cmp::min(delay_ms * 2, self.config.max_retry_delay_ms);
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| SearchError::bulk("bulk write failed after retries")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{entity_fixture, records_fixture, MockEngine, MockStore, RecordingProgress};
    use serde_json::json;

    fn fast_config() -> IndexerConfig {
        IndexerConfig {
            initial_retry_delay_ms: 1,
            max_retry_delay_ms: 2,
            ..IndexerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_batch_count_is_ceil_of_records_over_batch_size() {
        let engine = Arc::new(MockEngine::new());
        let store = Arc::new(MockStore::new(records_fixture(250)));
        let indexer = BulkIndexer::with_config(engine.clone(), store, fast_config());

        let report = indexer.index_entity(&entity_fixture(), false).await.unwrap();

        assert_eq!(report.total_records, 250);
        assert_eq!(report.indexed, 250);
        assert_eq!(report.failed, 0);
        assert_eq!(report.batches, 3);
        assert_eq!(engine.bulk_sizes(), vec![100, 100, 50]);
    }

    #[tokio::test]
    async fn test_single_partial_batch() {
        let engine = Arc::new(MockEngine::new());
        let store = Arc::new(MockStore::new(records_fixture(7)));
        let indexer = BulkIndexer::with_config(engine.clone(), store, fast_config());

        let report = indexer.index_entity(&entity_fixture(), false).await.unwrap();

        assert_eq!(report.batches, 1);
        assert_eq!(engine.bulk_sizes(), vec![7]);
    }

    #[tokio::test]
    async fn test_no_records_no_bulk_calls() {
        let engine = Arc::new(MockEngine::new());
        let store = Arc::new(MockStore::new(Vec::new()));
        let indexer = BulkIndexer::with_config(engine.clone(), store, fast_config());

        let report = indexer.index_entity(&entity_fixture(), false).await.unwrap();

        assert_eq!(report.batches, 0);
        assert!(engine.bulk_sizes().is_empty());
    }

    #[tokio::test]
    async fn test_purge_recreates_index_before_bulk() {
        let engine = Arc::new(MockEngine::new().with_existing_index("blog-posts"));
        let store = Arc::new(MockStore::new(records_fixture(1)));
        let indexer = BulkIndexer::with_config(engine.clone(), store, fast_config());

        indexer.index_entity(&entity_fixture(), true).await.unwrap();

        assert_eq!(
            engine.call_log(),
            vec![
                "index_exists blog-posts",
                "delete_index blog-posts",
                "create_index blog-posts",
                "put_mapping blog-posts",
                "bulk_write 1",
            ]
        );
    }

    #[tokio::test]
    async fn test_record_without_id_is_reported_not_submitted() {
        let mut records = records_fixture(2);
        records[1].remove("id");

        let engine = Arc::new(MockEngine::new());
        let store = Arc::new(MockStore::new(records));
        let indexer = BulkIndexer::with_config(engine.clone(), store, fast_config());

        let report = indexer.index_entity(&entity_fixture(), false).await.unwrap();

        assert_eq!(report.indexed, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(engine.bulk_sizes(), vec![1]);
        assert_eq!(report.item_failures.len(), 1);
        assert!(report.item_failures[0].reason.contains("id"));
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let engine = Arc::new(MockEngine::new().with_bulk_errors(vec![
            SearchError::connection("refused"),
            SearchError::response(503, "unavailable"),
        ]));
        let store = Arc::new(MockStore::new(records_fixture(5)));
        let indexer = BulkIndexer::with_config(engine.clone(), store, fast_config());

        let report = indexer.index_entity(&entity_fixture(), false).await.unwrap();

        assert_eq!(report.indexed, 5);
        assert!(report.batch_failures.is_empty());
        // two failed attempts plus the successful one
        assert_eq!(
            engine
                .call_log()
                .iter()
                .filter(|c| c.starts_with("bulk_write"))
                .count(),
            3
        );
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried_and_run_continues() {
        let engine = Arc::new(
            MockEngine::new().with_bulk_errors(vec![SearchError::response(400, "bad request")]),
        );
        let store = Arc::new(MockStore::new(records_fixture(150)));
        let indexer = BulkIndexer::with_config(engine.clone(), store, fast_config());

        let report = indexer.index_entity(&entity_fixture(), false).await.unwrap();

        // first batch dropped, second delivered
        assert_eq!(report.batch_failures.len(), 1);
        assert_eq!(report.batch_failures[0].batch, 1);
        assert_eq!(report.batch_failures[0].size, 100);
        assert_eq!(report.indexed, 50);
        assert_eq!(report.failed, 100);
        assert_eq!(report.batches, 2);
    }

    #[tokio::test]
    async fn test_exhausted_retries_become_batch_failure() {
        let engine = Arc::new(MockEngine::new().with_bulk_errors(vec![
            SearchError::connection("refused"),
            SearchError::connection("refused"),
            SearchError::connection("refused"),
            SearchError::connection("refused"),
        ]));
        let store = Arc::new(MockStore::new(records_fixture(3)));
        let indexer = BulkIndexer::with_config(engine.clone(), store, fast_config());

        let report = indexer.index_entity(&entity_fixture(), false).await.unwrap();

        assert_eq!(report.indexed, 0);
        assert_eq!(report.batch_failures.len(), 1);
        assert!(report.batch_failures[0].error.contains("refused"));
    }

    #[tokio::test]
    async fn test_per_item_rejections_survive_into_report() {
        let engine = Arc::new(MockEngine::new().with_rejected_ids(&["2", "4"]));
        let store = Arc::new(MockStore::new(records_fixture(5)));
        let indexer = BulkIndexer::with_config(engine.clone(), store, fast_config());

        let report = indexer.index_entity(&entity_fixture(), false).await.unwrap();

        assert_eq!(report.indexed, 3);
        assert_eq!(report.failed, 2);
        let rejected: Vec<&str> = report
            .item_failures
            .iter()
            .map(|f| f.doc_id.as_str())
            .collect();
        assert_eq!(rejected, vec!["2", "4"]);
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_over_batches() {
        let engine = Arc::new(MockEngine::new());
        let store = Arc::new(MockStore::new(records_fixture(250)));
        let progress = Arc::new(RecordingProgress::default());
        let indexer = BulkIndexer::with_config(engine, store, fast_config())
            .with_progress(progress.clone());

        indexer.index_entity(&entity_fixture(), false).await.unwrap();

        let events = progress.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "begin 250",
                "advance 100/250",
                "advance 200/250",
                "advance 250/250",
                "finish",
            ]
        );
    }

    #[tokio::test]
    async fn test_index_all_reports_in_registration_order() {
        use crate::test_support::keyword_entity_fixture;

        let engine = Arc::new(MockEngine::new());
        let store = Arc::new(MockStore::new(records_fixture(2)));
        let indexer = BulkIndexer::with_config(engine, store, fast_config());

        let mut registry = EntityRegistry::new();
        registry.register(Arc::new(entity_fixture()));
        registry.register(Arc::new(keyword_entity_fixture()));

        let reports = indexer.index_all(&registry, false).await.unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].entity, "BlogPost");
        assert_eq!(reports[0].index, "blog-posts");
        assert_eq!(reports[1].entity, "Category");
        assert_eq!(reports[1].index, "categories");
    }

    #[tokio::test]
    async fn test_fetch_limit_caps_records() {
        let engine = Arc::new(MockEngine::new());
        let store = Arc::new(MockStore::new(records_fixture(50)));
        let config = IndexerConfig {
            fetch_limit: 10,
            ..fast_config()
        };
        let indexer = BulkIndexer::with_config(engine, store, config);

        let report = indexer.index_entity(&entity_fixture(), false).await.unwrap();

        assert_eq!(report.total_records, 10);
        assert_eq!(report.indexed, 10);
    }

    #[tokio::test]
    async fn test_document_bodies_carry_record_fields() {
        // sanity check that the body hook flows through to operations
        let engine = Arc::new(MockEngine::new());
        let store = Arc::new(MockStore::new(vec![{
            let mut r = searchbridge_shared::Record::new();
            r.insert("id".to_string(), json!(9));
            r.insert("title".to_string(), json!("Nine"));
            r
        }]));
        let indexer = BulkIndexer::with_config(engine.clone(), store, fast_config());

        let report = indexer.index_entity(&entity_fixture(), false).await.unwrap();
        assert_eq!(report.indexed, 1);
    }
}
