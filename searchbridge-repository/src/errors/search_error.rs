//! Search engine error types.
//!
//! Failures are classified transient vs. permanent via
//! [`SearchError::is_transient`]; callers use the classification to decide
//! whether a retry is worthwhile.

use thiserror::Error;

/// Errors that can occur during search engine operations.
#[derive(Error, Debug, Clone)]
pub enum SearchError {
    /// Failed to establish a connection to the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A request failed at the transport level before a response arrived.
    #[error("Request error: {0}")]
    RequestError(String),

    /// The engine answered with a non-success status.
    #[error("Response error (status {status}): {body}")]
    ResponseError { status: u16, body: String },

    /// A bulk write failed as a whole.
    #[error("Bulk error: {0}")]
    BulkError(String),

    /// Creating or applying an index mapping failed.
    #[error("Mapping error: {0}")]
    MappingError(String),

    /// The engine accepted the request but did not acknowledge it. Carries
    /// the raw response body for inspection.
    #[error("Not acknowledged: {0}")]
    NotAcknowledged(String),

    /// Failed to parse a response from the search engine.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize a payload for the search engine.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl SearchError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a request error.
    pub fn request(msg: impl Into<String>) -> Self {
        Self::RequestError(msg.into())
    }

    /// Create a response error from a status code and body.
    pub fn response(status: u16, body: impl Into<String>) -> Self {
        Self::ResponseError {
            status,
            body: body.into(),
        }
    }

    /// Create a bulk error.
    pub fn bulk(msg: impl Into<String>) -> Self {
        Self::BulkError(msg.into())
    }

    /// Create a mapping error.
    pub fn mapping(msg: impl Into<String>) -> Self {
        Self::MappingError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Whether a retry of the failed operation can reasonably succeed.
    ///
    /// Connection failures, transport timeouts, and throttling/overload
    /// statuses are transient; everything else is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            SearchError::ConnectionError(_) => true,
            SearchError::RequestError(msg) => {
                let msg = msg.to_lowercase();
                msg.contains("timeout") || msg.contains("timed out") || msg.contains("connection")
            }
            SearchError::ResponseError { status, .. } => {
                matches!(status, 408 | 429 | 502 | 503 | 504)
            }
            SearchError::BulkError(_)
            | SearchError::MappingError(_)
            | SearchError::NotAcknowledged(_)
            | SearchError::ParseError(_)
            | SearchError::SerializationError(_) => false,
        }
    }
}
