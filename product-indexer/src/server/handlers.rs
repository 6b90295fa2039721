// HTTP request handlers
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::orchestrator::IngestSummary;
use crate::server::state::AppState;

/// Query parameters accepted by the index endpoint
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub limit: Option<usize>,
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Product indexer is running")
}

/// Index endpoint - runs one ingestion and reports how many products were submitted
pub async fn index_products(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> impl IntoResponse {
    info!(limit = ?query.limit, "Received index request");

    let outcome = match query.limit {
        Some(limit) => state.orchestrator.run_with_limit(limit).await,
        None => state.orchestrator.run().await,
    };

    match outcome {
        Ok(summary) => match &summary.halted_by {
            None => (
                StatusCode::OK,
                Json(summary_body(
                    "success",
                    format!("Successfully indexed {} products", summary.submitted),
                    &summary,
                )),
            ),
            Some(e) => {
                error!(error = %e, submitted = summary.submitted, "Indexing halted");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(summary_body(
                        "error",
                        format!(
                            "Indexing halted after {} products: {}",
                            summary.submitted, e
                        ),
                        &summary,
                    )),
                )
            }
        },
        Err(e) => {
            error!(error = %e, "Failed to index products");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "status": "error",
                    "message": format!("Failed to index products: {}", e)
                })),
            )
        }
    }
}

/// Index health endpoint - reports the OpenSearch cluster status
pub async fn index_health(State(state): State<AppState>) -> impl IntoResponse {
    match state.provider.cluster_health().await {
        Ok(health) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "success",
                "message": format!("OpenSearch status: {}", health)
            })),
        ),
        Err(e) => {
            error!(error = %e, "OpenSearch health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "error",
                    "message": "Cannot connect to OpenSearch",
                    "error": e.to_string()
                })),
            )
        }
    }
}

fn summary_body(status: &str, message: String, summary: &IngestSummary) -> serde_json::Value {
    serde_json::json!({
        "status": status,
        "message": message,
        "submitted": summary.submitted,
        "indexed": summary.indexed(),
        "rejected": summary.rejected(),
        "batches": summary.batches,
        "lines_read": summary.lines_read,
        "malformed_lines": summary.malformed_lines,
        "missing_ids": summary.missing_ids,
        "invalid_prices": summary.invalid_prices
    })
}
