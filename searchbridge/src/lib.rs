//! # Searchbridge
//!
//! Console utility for the searchbridge system.
//!
//! This crate provides the entry point, configuration, and console output
//! for driving the searchbridge pipeline: bulk indexing, mapping
//! management, multi-entity search, and status reporting.

pub mod config;
pub mod output;

pub use config::Dependencies;

use thiserror::Error;

/// Errors that can occur during startup or command execution.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] searchbridge_pipeline::PipelineError),

    /// Search engine error.
    #[error("Search error: {0}")]
    SearchError(#[from] searchbridge_repository::SearchError),

    /// Backing store error.
    #[error("Store error: {0}")]
    StoreError(#[from] searchbridge_repository::StoreError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
