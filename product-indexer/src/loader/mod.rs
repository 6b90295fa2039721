//! Loader module for the product indexer ingest.
//!
//! Sends batches of product documents to the search index in one bulk call each.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, instrument, warn};

use crate::errors::IngestError;
use product_indexer_repository::{IndexDocumentRequest, SearchIndexProvider};
use product_indexer_shared::ProductDocument;

/// Default index name for product documents.
pub const DEFAULT_INDEX_NAME: &str = "products";

/// Configuration for the bulk loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// The index every document is written to.
    pub index_name: String,
    /// Upper bound for a single bulk call. `None` waits as long as the backend does.
    pub bulk_timeout: Option<Duration>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            index_name: DEFAULT_INDEX_NAME.to_string(),
            bulk_timeout: None,
        }
    }
}

/// A document the backend rejected inside an accepted bulk call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub document_id: String,
    pub reason: String,
}

/// Outcome of loading one batch.
///
/// `submitted` counts every document handed to the backend in a call that
/// completed, whether or not the backend then stored it. Rejections are listed
/// in `item_failures` and never reduce `submitted`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadResult {
    pub submitted: usize,
    pub item_failures: Vec<ItemFailure>,
}

impl LoadResult {
    /// Number of documents the backend accepted.
    pub fn indexed(&self) -> usize {
        self.submitted.saturating_sub(self.item_failures.len())
    }
}

/// Loader that writes product documents into the search engine.
///
/// The loader is responsible for:
/// - Converting documents into `(index, id, body)` bulk writes
/// - Issuing exactly one bulk call per batch
/// - Reporting per-item rejections without failing the batch
pub struct BulkLoader {
    provider: Arc<dyn SearchIndexProvider>,
    config: LoaderConfig,
}

impl BulkLoader {
    /// Create a new bulk loader with the given provider.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: LoaderConfig::default(),
        }
    }

    /// Create a new bulk loader with custom configuration.
    pub fn with_config(provider: Arc<dyn SearchIndexProvider>, config: LoaderConfig) -> Self {
        Self { provider, config }
    }

    /// The index this loader writes to.
    pub fn index_name(&self) -> &str {
        &self.config.index_name
    }

    /// Load one batch.
    ///
    /// An empty batch is a no-op: no backend call, zero submitted. Otherwise the
    /// whole batch goes out in a single bulk call, which is not retried.
    ///
    /// # Returns
    ///
    /// * `Ok(LoadResult)` - The call completed; `submitted` equals the batch length
    /// * `Err(IngestError::BulkTransportFailure)` - The call failed or timed out
    #[instrument(skip(self, batch), fields(batch_size = batch.len()))]
    pub async fn load(&self, batch: &[ProductDocument]) -> Result<LoadResult, IngestError> {
        if batch.is_empty() {
            debug!("Skipping empty batch");
            return Ok(LoadResult::default());
        }

        let count = batch.len();
        let requests = self.to_requests(batch)?;

        debug!(count = count, index = %self.config.index_name, "Sending bulk request");

        let call = self.provider.bulk_index_documents(&requests);
        let outcome = match self.config.bulk_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    error!(
                        count = count,
                        timeout_ms = limit.as_millis() as u64,
                        "Bulk request timed out"
                    );
                    return Err(IngestError::bulk_transport(
                        count,
                        format!("timed out after {:?}", limit),
                    ));
                }
            },
            None => call.await,
        };

        match outcome {
            Ok(summary) => {
                let item_failures: Vec<ItemFailure> = summary
                    .failures()
                    .map(|result| ItemFailure {
                        document_id: result.document_id.clone(),
                        reason: result
                            .error
                            .as_ref()
                            .map(|e| e.to_string())
                            .unwrap_or_else(|| "unknown error".to_string()),
                    })
                    .collect();

                if item_failures.is_empty() {
                    debug!(count = count, "Successfully indexed all documents");
                } else {
                    warn!(
                        succeeded = summary.succeeded,
                        failed = item_failures.len(),
                        "Bulk index completed with some failures"
                    );
                    for failure in &item_failures {
                        error!(
                            document_id = %failure.document_id,
                            reason = %failure.reason,
                            "Failed to index document"
                        );
                    }
                }

                Ok(LoadResult {
                    submitted: count,
                    item_failures,
                })
            }
            Err(e) => {
                error!(error = %e, count = count, "Failed to bulk index documents");
                Err(IngestError::bulk_transport(count, e.to_string()))
            }
        }
    }

    fn to_requests(
        &self,
        batch: &[ProductDocument],
    ) -> Result<Vec<IndexDocumentRequest>, IngestError> {
        batch
            .iter()
            .map(|document| -> Result<IndexDocumentRequest, IngestError> {
                Ok(IndexDocumentRequest::new(
                    self.config.index_name.clone(),
                    document.document_id(),
                    serde_json::to_value(document)?,
                ))
            })
            .collect()
    }
}
