//! # Searchbridge Pipeline
//!
//! This crate provides the operational components of the searchbridge
//! system, each taking injected client handles:
//!
//! 1. **Indexer**: streams backing-store records into batched bulk writes
//! 2. **Mapping**: (re)creates indices and applies field mappings
//! 3. **Search**: fans one query out across all registered entities
//! 4. **Status**: read-only engine diagnostics

pub mod errors;
pub mod indexer;
pub mod mapping;
pub mod progress;
pub mod search;
pub mod status;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::PipelineError;
pub use indexer::{BatchFailure, BulkIndexer, IndexReport, IndexerConfig};
pub use mapping::MappingManager;
pub use progress::{NoProgress, ProgressSink};
pub use search::{EntitySearchResponse, SearchDispatcher};
pub use status::{StatusReporter, StatusRow};
