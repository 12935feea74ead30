//! Request and response types for search engine operations.

use serde_json::Value;

/// One document submission within a bulk write.
///
/// Transient: constructed one per record and discarded after submission.
#[derive(Debug, Clone)]
pub struct BulkOperation {
    /// Target index.
    pub index: String,
    /// Unique document id.
    pub doc_id: String,
    /// Document body.
    pub document: Value,
}

/// A single rejected item inside an otherwise-delivered bulk response.
#[derive(Debug, Clone)]
pub struct BulkItemFailure {
    /// The rejected document's id.
    pub doc_id: String,
    /// Per-item HTTP status reported by the engine.
    pub status: u16,
    /// The engine's rejection reason.
    pub reason: String,
}

/// Outcome of one bulk write.
///
/// Replaces a bare "had errors" flag: callers get the exact items the
/// engine rejected and why.
#[derive(Debug, Clone, Default)]
pub struct BulkSummary {
    /// Number of operations submitted.
    pub total: usize,
    /// Number of operations the engine accepted.
    pub succeeded: usize,
    /// Number of operations the engine rejected.
    pub failed: usize,
    /// Rejection detail, one entry per failed item.
    pub failures: Vec<BulkItemFailure>,
}

/// Per-index document count and shard statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountStats {
    /// Number of documents in the index.
    pub count: u64,
    /// Shards that answered the count successfully.
    pub shards_successful: u64,
    /// Total shards queried.
    pub shards_total: u64,
}

/// Engine identification as reported by the info endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInfo {
    /// Engine version number.
    pub version: String,
    /// Bundled Lucene version.
    pub lucene_version: String,
}
