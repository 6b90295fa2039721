// App state for the Axum server
use std::sync::Arc;

use crate::orchestrator::Orchestrator;
use product_indexer_repository::SearchIndexProvider;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub provider: Arc<dyn SearchIndexProvider>,
}
