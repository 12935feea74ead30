//! Backing store error types.

use thiserror::Error;

/// Errors that can occur while reading from the backing store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to establish a connection to the backing store.
    #[error("Store connection error: {0}")]
    ConnectionError(String),

    /// A read query failed.
    #[error("Store query error: {0}")]
    QueryError(String),

    /// A table or column name is not a safe SQL identifier.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}

impl StoreError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create an invalid identifier error.
    pub fn invalid_identifier(msg: impl Into<String>) -> Self {
        Self::InvalidIdentifier(msg.into())
    }
}
