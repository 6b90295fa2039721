//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    BulkParts, OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::types::{BatchOperationSummary, ClusterHealth, IndexDocumentRequest};
use crate::utils;

/// OpenSearch provider implementation.
///
/// Sends every batch as one `_bulk` request and reads per-item outcomes from
/// the response.
///
/// # Example
///
/// ```ignore
/// use product_indexer_repository::{IndexDocumentRequest, OpenSearchProvider, SearchIndexProvider};
/// use serde_json::json;
///
/// let provider = OpenSearchProvider::new("http://localhost:9200").await?;
///
/// let request = IndexDocumentRequest::new("products", "B0001", json!({ "id": "B0001" }));
/// let summary = provider.bulk_index_documents(&[request]).await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// No request is sent here; use [`SearchIndexProvider::cluster_health`] to
    /// verify the backend is reachable.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If the URL or transport is invalid
    pub async fn new(url: &str) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch provider");

        Ok(Self { client })
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    /// Write many documents in a single `_bulk` request.
    ///
    /// A non-2xx response or an unreadable body fails the whole call. Item-level
    /// rejections are returned in the summary.
    async fn bulk_index_documents(
        &self,
        requests: &[IndexDocumentRequest],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        if requests.is_empty() {
            return Ok(BatchOperationSummary::default());
        }

        utils::validate_requests(requests)?;

        let body: Vec<JsonBody<Value>> = utils::build_bulk_body(requests)
            .into_iter()
            .map(JsonBody::new)
            .collect();

        let response = self
            .client
            .bulk(BulkParts::None)
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::bulk_index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchIndexError::bulk_index(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body = response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let summary = utils::parse_bulk_response(&response_body)?;
        let took_ms = response_body.get("took").and_then(Value::as_u64);

        debug!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            took_ms = ?took_ms,
            "Bulk request completed"
        );

        Ok(summary)
    }

    async fn cluster_health(&self) -> Result<ClusterHealth, SearchIndexError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchIndexError::health_check(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(SearchIndexError::health_check(format!(
                "Cluster health failed with status {}",
                status
            )));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        body.get("status")
            .and_then(Value::as_str)
            .ok_or_else(|| SearchIndexError::parse("Cluster health response has no status"))?
            .parse()
    }
}
