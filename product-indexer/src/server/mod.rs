// Server module - HTTP server setup and routing
pub mod handlers;
pub mod state;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tracing::info;

use self::state::AppState;
use crate::orchestrator::Orchestrator;
use crate::IndexingError;
use product_indexer_repository::SearchIndexProvider;

/// Create the Axum application router with all routes
pub fn create_app(
    orchestrator: Arc<Orchestrator>,
    provider: Arc<dyn SearchIndexProvider>,
) -> Router {
    let state = AppState {
        orchestrator,
        provider,
    };

    Router::new()
        .route("/index-products", get(handlers::index_products))
        .route("/index-health", get(handlers::index_health))
        .route("/health", get(handlers::health_check))
        .with_state(state)
}

/// Run the server on the specified address until `shutdown` resolves
pub async fn run_server<F>(app: Router, addr: SocketAddr, shutdown: F) -> Result<(), IndexingError>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("Server listening on {}", addr);
    info!("- Index endpoint: http://{}/index-products", addr);
    info!("- Index health endpoint: http://{}/index-health", addr);
    info!("- Health endpoint: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| IndexingError::server(format!("Failed to bind {}: {}", addr, e)))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| IndexingError::server(e.to_string()))?;
    Ok(())
}
