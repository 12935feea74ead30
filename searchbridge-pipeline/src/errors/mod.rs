//! Error types for the searchbridge pipeline.

use searchbridge_repository::{SearchError, StoreError};
use thiserror::Error;

/// Errors that can occur in the pipeline components.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Error from the search engine.
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Error from the backing store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The engine answered with something structurally unexpected.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl PipelineError {
    /// Create a malformed response error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }
}
