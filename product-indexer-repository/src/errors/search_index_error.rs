//! Search index error types.
//!
//! This module defines the unified error type for all search index operations,
//! covering both whole-call failures and per-document rejections.

use thiserror::Error;

/// Unified errors from search index operations.
///
/// Used by the `SearchIndexProvider` trait for every backend operation. A bulk
/// call that fails as a whole returns one of these as `Err`; a document the
/// backend rejected inside a successful bulk call carries one in its
/// `BatchOperationResult`.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Validation error (e.g., empty document id or index name).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to establish connection to the search index backend.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The backend rejected a single document.
    #[error("Index error: {0}")]
    IndexError(String),

    /// The bulk request itself failed.
    #[error("Bulk index error: {0}")]
    BulkIndexError(String),

    /// Cluster health could not be queried.
    #[error("Health check error: {0}")]
    HealthCheckError(String),

    /// Failed to parse response from search index backend.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl SearchIndexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::IndexError(msg.into())
    }

    /// Create a bulk index error.
    pub fn bulk_index(msg: impl Into<String>) -> Self {
        Self::BulkIndexError(msg.into())
    }

    /// Create a health check error.
    pub fn health_check(msg: impl Into<String>) -> Self {
        Self::HealthCheckError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SearchIndexError::bulk_index("connection reset").to_string(),
            "Bulk index error: connection reset"
        );
        assert_eq!(
            SearchIndexError::index("mapper_parsing_exception").to_string(),
            "Index error: mapper_parsing_exception"
        );
        assert_eq!(
            SearchIndexError::health_check("timed out").to_string(),
            "Health check error: timed out"
        );
        assert!(matches!(
            SearchIndexError::parse("no items"),
            SearchIndexError::ParseError(_)
        ));
    }
}
