//! Dependency initialization and wiring for the product indexer.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::IngestSettings;
use crate::loader::BulkLoader;
use crate::orchestrator::Orchestrator;
use crate::processor::ProductProcessor;
use crate::source::FileFeedSource;
use crate::IndexingError;
use product_indexer_repository::{OpenSearchProvider, SearchIndexProvider};

/// Connection mode for OpenSearch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection at a fixed interval until successful.
    Retry,
}

impl ConnectionMode {
    /// Parse the connection mode.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive).
    /// Defaults to "retry" if not set or invalid.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::to_lowercase).as_deref() {
            Some("fail-fast") | Some("failfast") | Some("fail_fast") => Self::FailFast,
            Some("retry") | None => Self::Retry,
            Some(other) => {
                warn!(value = %other, "Invalid OPENSEARCH_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator, shared with the HTTP handlers.
    pub orchestrator: Arc<Orchestrator>,
    /// The search backend, used for health checks.
    pub provider: Arc<dyn SearchIndexProvider>,
    /// The settings the dependencies were built from.
    pub settings: IngestSettings,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// See [`IngestSettings::from_env`] for the variables read.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If a setting is invalid or, in fail-fast mode,
    ///   OpenSearch cannot be reached
    pub async fn new() -> Result<Self, IndexingError> {
        let settings = IngestSettings::from_env()?;
        Self::from_settings(settings).await
    }

    /// Initialize all dependencies from explicit settings.
    pub async fn from_settings(settings: IngestSettings) -> Result<Self, IndexingError> {
        info!(
            opensearch_url = %settings.opensearch_url,
            feed_path = %settings.feed_path.display(),
            index = %settings.index_name,
            batch_size = settings.batch_size.get(),
            record_limit = ?settings.record_limit,
            connection_mode = ?settings.connection_mode,
            retry_interval_secs = settings.retry_interval.as_secs(),
            "Initializing dependencies"
        );

        let search_provider = Self::connect_to_opensearch(
            &settings.opensearch_url,
            settings.connection_mode,
            settings.retry_interval,
        )
        .await?;

        info!("OpenSearch connection established");

        let provider: Arc<dyn SearchIndexProvider> = Arc::new(search_provider);
        let source = Arc::new(FileFeedSource::new(settings.feed_path.clone()));
        let processor = ProductProcessor::new();
        let loader = BulkLoader::with_config(provider.clone(), settings.loader_config());

        let orchestrator = Orchestrator::with_config(
            source,
            processor,
            loader,
            settings.orchestrator_config(),
        );

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            provider,
            settings,
        })
    }

    /// Connect to OpenSearch with retry logic based on connection mode.
    async fn connect_to_opensearch(
        url: &str,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<OpenSearchProvider, IndexingError> {
        loop {
            match Self::try_connect_opensearch(url).await {
                Ok(provider) => return Ok(provider),
                Err(e) => match mode {
                    ConnectionMode::FailFast => {
                        return Err(IndexingError::config(format!(
                            "Failed to connect to OpenSearch: {}",
                            e
                        )));
                    }
                    ConnectionMode::Retry => {
                        warn!(
                            opensearch_url = %url,
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to OpenSearch, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }

    /// Attempt to connect to OpenSearch and confirm the cluster answers.
    async fn try_connect_opensearch(url: &str) -> Result<OpenSearchProvider, IndexingError> {
        let search_provider = OpenSearchProvider::new(url).await.map_err(|e| {
            IndexingError::config(format!("Failed to create OpenSearch provider: {}", e))
        })?;

        let health = search_provider
            .cluster_health()
            .await
            .map_err(|e| IndexingError::config(format!("OpenSearch health check failed: {}", e)))?;

        info!(status = %health, "OpenSearch cluster reachable");

        Ok(search_provider)
    }
}
