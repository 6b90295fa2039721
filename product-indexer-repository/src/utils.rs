//! Utility functions for the product indexer repository.
//!
//! These helpers translate between the bulk-write contract and the bulk API's
//! newline-delimited JSON shape. They are pure so they can be tested without a
//! running cluster.

use serde_json::{json, Value};

use crate::errors::SearchIndexError;
use crate::types::{BatchOperationResult, BatchOperationSummary, IndexDocumentRequest};

/// Validate a bulk request before it is sent.
///
/// # Returns
///
/// * `Ok(())` - If every request names an index and a document id
/// * `Err(SearchIndexError)` - If any of them is empty
pub fn validate_requests(requests: &[IndexDocumentRequest]) -> Result<(), SearchIndexError> {
    for (position, request) in requests.iter().enumerate() {
        if request.index.is_empty() {
            return Err(SearchIndexError::validation(format!(
                "Request {} has an empty index name",
                position
            )));
        }
        if request.document_id.is_empty() {
            return Err(SearchIndexError::validation(format!(
                "Request {} has an empty document id",
                position
            )));
        }
    }
    Ok(())
}

/// Build the bulk body as alternating action and source lines.
///
/// Each request becomes `{"index": {"_index": ..., "_id": ...}}` followed by
/// its document body.
pub fn build_bulk_body(requests: &[IndexDocumentRequest]) -> Vec<Value> {
    let mut lines = Vec::with_capacity(requests.len() * 2);
    for request in requests {
        lines.push(json!({
            "index": {
                "_index": request.index,
                "_id": request.document_id,
            }
        }));
        lines.push(request.body.clone());
    }
    lines
}

/// Parse a bulk API response into per-item results.
///
/// Every entry of `items` is an object keyed by its operation type. An item
/// fails when it carries an `error` object or a non-2xx `status`.
///
/// # Example
///
/// ```
/// use product_indexer_repository::parse_bulk_response;
/// use serde_json::json;
///
/// let response = json!({
///     "took": 3,
///     "errors": false,
///     "items": [{"index": {"_id": "B0001", "status": 201}}]
/// });
///
/// let summary = parse_bulk_response(&response).expect("valid response");
/// assert_eq!(summary.succeeded, 1);
/// ```
pub fn parse_bulk_response(response: &Value) -> Result<BatchOperationSummary, SearchIndexError> {
    let items = response
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchIndexError::parse("Bulk response has no items array"))?;

    let mut results = Vec::with_capacity(items.len());
    for item in items {
        let outcome = item
            .as_object()
            .and_then(|operation| operation.values().next())
            .ok_or_else(|| SearchIndexError::parse("Bulk response item is empty"))?;

        let document_id = outcome
            .get("_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let status = outcome.get("status").and_then(Value::as_u64);

        let error = match outcome.get("error") {
            Some(error) if !error.is_null() => Some(SearchIndexError::index(error_reason(error))),
            _ => match status {
                Some(code) if !(200..300).contains(&code) => Some(SearchIndexError::index(
                    format!("Item failed with status {}", code),
                )),
                _ => None,
            },
        };

        results.push(BatchOperationResult {
            document_id,
            success: error.is_none(),
            error,
        });
    }

    Ok(BatchOperationSummary::from_results(results))
}

/// Extract a readable reason from a bulk item error.
fn error_reason(error: &Value) -> String {
    match (
        error.get("type").and_then(Value::as_str),
        error.get("reason").and_then(Value::as_str),
    ) {
        (Some(kind), Some(reason)) => format!("{}: {}", kind, reason),
        (None, Some(reason)) => reason.to_string(),
        (Some(kind), None) => kind.to_string(),
        (None, None) => error.to_string(),
    }
}
