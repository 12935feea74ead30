//! Search engine client trait definition.
//!
//! Abstracts the search engine behind the small set of operations the
//! bridge needs: bulk writes, index lifecycle, mapping management,
//! diagnostics, and multi-search.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchError;
use crate::types::{BulkOperation, BulkSummary, CountStats, EngineInfo};

/// Client for the search engine.
///
/// Implementations are injected into the pipeline components to enable
/// dependency injection and testing with mock engines. All methods return
/// `Result<T, SearchError>`.
#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// Check that the engine is reachable.
    async fn ping(&self) -> Result<bool, SearchError>;

    /// Fetch engine identification (version, Lucene version).
    async fn info(&self) -> Result<EngineInfo, SearchError>;

    /// Submit a batch of index operations in one bulk request.
    ///
    /// The request is delivered as a whole; per-item rejections are
    /// reported in the returned summary rather than as an error. An `Err`
    /// means the batch as a whole was not delivered.
    async fn bulk_write(&self, operations: &[BulkOperation]) -> Result<BulkSummary, SearchError>;

    /// Whether the index exists.
    async fn index_exists(&self, index: &str) -> Result<bool, SearchError>;

    /// Create an index with default settings.
    async fn create_index(&self, index: &str) -> Result<(), SearchError>;

    /// Delete an index.
    async fn delete_index(&self, index: &str) -> Result<(), SearchError>;

    /// Apply a field mapping to an existing index.
    ///
    /// An accepted-but-unacknowledged response is surfaced as
    /// [`SearchError::NotAcknowledged`] carrying the raw body.
    async fn put_mapping(&self, index: &str, mapping: &Value) -> Result<(), SearchError>;

    /// List live (non-system) indices, sorted by name.
    async fn live_indices(&self) -> Result<Vec<String>, SearchError>;

    /// Fetch the document count and shard stats for an index.
    async fn count(&self, index: &str) -> Result<CountStats, SearchError>;

    /// Issue several independent searches in a single request.
    ///
    /// `searches` pairs each target index with its query body. The raw
    /// per-search responses are returned in submission order.
    async fn multi_search(&self, searches: &[(String, Value)]) -> Result<Vec<Value>, SearchError>;
}
