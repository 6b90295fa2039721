//! Environment-driven settings for the product indexer.

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::ConnectionMode;
use crate::loader::{LoaderConfig, DEFAULT_INDEX_NAME};
use crate::orchestrator::{OrchestratorConfig, DEFAULT_BATCH_SIZE};
use crate::IndexingError;

/// Default location of the product feed.
const DEFAULT_FEED_PATH: &str = "data/products.json";

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
const DEFAULT_SERVER_PORT: u16 = 8080;

/// Every setting the indexer reads at startup.
#[derive(Debug, Clone)]
pub struct IngestSettings {
    pub feed_path: PathBuf,
    pub batch_size: NonZeroUsize,
    pub index_name: String,
    pub record_limit: Option<usize>,
    pub bulk_timeout: Option<Duration>,
    pub opensearch_url: String,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
    pub server_addr: SocketAddr,
}

impl IngestSettings {
    /// Read the settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PRODUCT_FEED_PATH`: Feed file (default: data/products.json)
    /// - `INDEX_BATCH_SIZE`: Documents per bulk call (default: 500)
    /// - `INDEX_NAME`: Target index (default: products)
    /// - `INDEX_RECORD_LIMIT`: Optional cap on records per run
    /// - `BULK_TIMEOUT_SECS`: Optional timeout for a single bulk call
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `OPENSEARCH_CONNECTION_MODE`: "fail-fast" or "retry" (default: retry)
    /// - `OPENSEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    /// - `SERVER_HOST` / `SERVER_PORT`: HTTP bind address (default: 127.0.0.1:8080)
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the settings through `lookup`, which returns the raw value of a
    /// variable if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let batch_size = match var("INDEX_BATCH_SIZE") {
            Some(raw) => parse_number::<usize>("INDEX_BATCH_SIZE", &raw)
                .and_then(|n| {
                    NonZeroUsize::new(n).ok_or_else(|| {
                        IndexingError::config("INDEX_BATCH_SIZE must be greater than zero")
                    })
                })?,
            None => NonZeroUsize::new(DEFAULT_BATCH_SIZE).unwrap_or(NonZeroUsize::MIN),
        };

        let record_limit = var("INDEX_RECORD_LIMIT")
            .map(|raw| parse_number::<usize>("INDEX_RECORD_LIMIT", &raw))
            .transpose()?;

        let bulk_timeout = var("BULK_TIMEOUT_SECS")
            .map(|raw| parse_number::<u64>("BULK_TIMEOUT_SECS", &raw))
            .transpose()?
            .map(Duration::from_secs);

        let retry_interval = var("OPENSEARCH_RETRY_INTERVAL_SECS")
            .map(|raw| parse_number::<u64>("OPENSEARCH_RETRY_INTERVAL_SECS", &raw))
            .transpose()?
            .unwrap_or(DEFAULT_RETRY_INTERVAL_SECS);

        let connection_mode = ConnectionMode::parse(var("OPENSEARCH_CONNECTION_MODE").as_deref());

        let host = var("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string());
        let port = var("SERVER_PORT")
            .map(|raw| parse_number::<u16>("SERVER_PORT", &raw))
            .transpose()?
            .unwrap_or(DEFAULT_SERVER_PORT);
        let server_addr = format!("{}:{}", host, port)
            .parse::<SocketAddr>()
            .map_err(|e| IndexingError::config(format!("Invalid SERVER_HOST {}: {}", host, e)))?;

        Ok(Self {
            feed_path: var("PRODUCT_FEED_PATH")
                .unwrap_or_else(|| DEFAULT_FEED_PATH.to_string())
                .into(),
            batch_size,
            index_name: var("INDEX_NAME").unwrap_or_else(|| DEFAULT_INDEX_NAME.to_string()),
            record_limit,
            bulk_timeout,
            opensearch_url: var("OPENSEARCH_URL")
                .unwrap_or_else(|| DEFAULT_OPENSEARCH_URL.to_string()),
            connection_mode,
            retry_interval: Duration::from_secs(retry_interval),
            server_addr,
        })
    }

    /// Loader settings derived from these settings.
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            index_name: self.index_name.clone(),
            bulk_timeout: self.bulk_timeout,
        }
    }

    /// Orchestrator settings derived from these settings.
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            batch_size: self.batch_size,
            record_limit: self.record_limit,
        }
    }
}

fn parse_number<T>(key: &str, raw: &str) -> Result<T, IndexingError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| IndexingError::config(format!("Invalid {} '{}': {}", key, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<IngestSettings, IndexingError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        IngestSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings(&[]).unwrap();

        assert_eq!(settings.feed_path, PathBuf::from("data/products.json"));
        assert_eq!(settings.batch_size.get(), 500);
        assert_eq!(settings.index_name, "products");
        assert!(settings.record_limit.is_none());
        assert!(settings.bulk_timeout.is_none());
        assert_eq!(settings.opensearch_url, "http://localhost:9200");
        assert_eq!(settings.connection_mode, ConnectionMode::Retry);
        assert_eq!(settings.retry_interval, Duration::from_secs(15));
        assert_eq!(settings.server_addr.to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_overrides() {
        let settings = settings(&[
            ("PRODUCT_FEED_PATH", "/feeds/men.json"),
            ("INDEX_BATCH_SIZE", "50"),
            ("INDEX_NAME", "catalog"),
            ("INDEX_RECORD_LIMIT", "0"),
            ("BULK_TIMEOUT_SECS", "30"),
            ("OPENSEARCH_CONNECTION_MODE", "fail-fast"),
            ("SERVER_PORT", "9090"),
        ])
        .unwrap();

        assert_eq!(settings.feed_path, PathBuf::from("/feeds/men.json"));
        assert_eq!(settings.batch_size.get(), 50);
        assert_eq!(settings.record_limit, Some(0));
        assert_eq!(settings.bulk_timeout, Some(Duration::from_secs(30)));
        assert_eq!(settings.connection_mode, ConnectionMode::FailFast);
        assert_eq!(settings.server_addr.port(), 9090);

        let loader = settings.loader_config();
        assert_eq!(loader.index_name, "catalog");
        let orchestrator = settings.orchestrator_config();
        assert_eq!(orchestrator.batch_size.get(), 50);
        assert_eq!(orchestrator.record_limit, Some(0));
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let err = settings(&[("INDEX_BATCH_SIZE", "0")]).unwrap_err();
        assert!(matches!(err, IndexingError::ConfigError(_)));
    }

    #[test]
    fn test_non_numeric_values_are_rejected() {
        assert!(settings(&[("INDEX_BATCH_SIZE", "lots")]).is_err());
        assert!(settings(&[("INDEX_RECORD_LIMIT", "-1")]).is_err());
        assert!(settings(&[("BULK_TIMEOUT_SECS", "soon")]).is_err());
        assert!(settings(&[("SERVER_PORT", "99999")]).is_err());
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let settings = settings(&[("INDEX_BATCH_SIZE", "  "), ("INDEX_NAME", "")]).unwrap();

        assert_eq!(settings.batch_size.get(), 500);
        assert_eq!(settings.index_name, "products");
    }
}
