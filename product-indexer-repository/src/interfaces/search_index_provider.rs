//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use crate::types::{BatchOperationSummary, ClusterHealth, IndexDocumentRequest};

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// The indexer depends only on this contract, never on a wire protocol. Implementations
/// are shared behind an `Arc` for the lifetime of the process and must not require
/// external locking.
///
/// All methods return `Result<T, SearchIndexError>` for consistent error handling across
/// different backend implementations.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Write many documents in a single bulk call.
    ///
    /// The whole slice is sent as one request. Documents the backend rejects are
    /// reported in the returned summary; they do not fail the call.
    ///
    /// # Arguments
    ///
    /// * `requests` - Ordered `(index, document id, body)` writes
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Per-item outcomes of an accepted call
    /// * `Err(SearchIndexError)` - If the call itself could not complete
    async fn bulk_index_documents(
        &self,
        requests: &[IndexDocumentRequest],
    ) -> Result<BatchOperationSummary, SearchIndexError>;

    /// Query the coarse cluster status.
    ///
    /// # Returns
    ///
    /// * `Ok(ClusterHealth)` - The reported status
    /// * `Err(SearchIndexError)` - If the backend cannot be reached or answers unexpectedly
    async fn cluster_health(&self) -> Result<ClusterHealth, SearchIndexError>;
}
