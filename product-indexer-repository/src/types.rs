//! Request and response types for search index operations.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::errors::SearchIndexError;

/// One document write inside a bulk call.
///
/// This is the `(index, document id, document body)` triple the bulk-write
/// contract works with. The body is already serialized so providers stay
/// independent of the document type.
#[derive(Debug, Clone)]
pub struct IndexDocumentRequest {
    /// The target index name.
    pub index: String,
    /// The document key in the index.
    pub document_id: String,
    /// The document source.
    pub body: Value,
}

impl IndexDocumentRequest {
    /// Create a new index request.
    pub fn new(index: impl Into<String>, document_id: impl Into<String>, body: Value) -> Self {
        Self {
            index: index.into(),
            document_id: document_id.into(),
            body,
        }
    }
}

/// Result of a batch operation for a single item.
///
/// This struct represents the outcome of indexing one document within a bulk
/// call. It indicates whether the operation succeeded and includes error
/// details if it failed.
#[derive(Debug, Clone)]
pub struct BatchOperationResult {
    /// The document key.
    pub document_id: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error if the operation failed.
    pub error: Option<SearchIndexError>,
}

/// Summary of a batch operation containing aggregate statistics and individual results.
///
/// This struct provides a complete overview of a bulk operation, including the total
/// number of items processed, how many succeeded and failed, and detailed results for
/// each individual item. This allows callers to handle partial failures gracefully.
#[derive(Debug, Clone, Default)]
pub struct BatchOperationSummary {
    /// Total number of items in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each item.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// Build a summary from per-item results.
    pub fn from_results(results: Vec<BatchOperationResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }

    /// Iterate over the items the backend rejected.
    pub fn failures(&self) -> impl Iterator<Item = &BatchOperationResult> {
        self.results.iter().filter(|r| !r.success)
    }
}

/// Coarse cluster status reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterHealth {
    Green,
    Yellow,
    Red,
}

impl FromStr for ClusterHealth {
    type Err = SearchIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "green" => Ok(Self::Green),
            "yellow" => Ok(Self::Yellow),
            "red" => Ok(Self::Red),
            other => Err(SearchIndexError::parse(format!(
                "Unknown cluster health status '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ClusterHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        };
        f.write_str(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_health_parsing() {
        assert_eq!("green".parse::<ClusterHealth>().unwrap(), ClusterHealth::Green);
        assert_eq!("YELLOW".parse::<ClusterHealth>().unwrap(), ClusterHealth::Yellow);
        assert_eq!("Red".parse::<ClusterHealth>().unwrap(), ClusterHealth::Red);
        assert!(matches!(
            "purple".parse::<ClusterHealth>(),
            Err(SearchIndexError::ParseError(_))
        ));
    }

    #[test]
    fn test_cluster_health_display() {
        assert_eq!(ClusterHealth::Yellow.to_string(), "yellow");
    }

    #[test]
    fn test_summary_from_results() {
        let summary = BatchOperationSummary::from_results(vec![
            BatchOperationResult {
                document_id: "a".to_string(),
                success: true,
                error: None,
            },
            BatchOperationResult {
                document_id: "b".to_string(),
                success: false,
                error: Some(SearchIndexError::index("rejected")),
            },
        ]);

        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures().next().unwrap().document_id, "b");
    }
}
