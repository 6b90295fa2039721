//! # Product Indexer
//!
//! Reads a line-delimited JSON product feed, normalizes each record, and
//! bulk-loads the results into OpenSearch.
//!
//! ## Architecture
//!
//! The indexer follows the Source-Processor-Loader pattern:
//!
//! 1. **Source**: Yields the feed one line at a time
//! 2. **Processor**: Transforms raw records into product documents
//! 3. **Accumulator**: Groups documents into fixed-size batches
//! 4. **Loader**: Indexes each batch with one bulk call
//! 5. **Orchestrator**: Coordinates the ingest flow
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`source`]: Feed sources
//! - [`processor`]: Record and price normalization
//! - [`accumulator`]: Batch buffering
//! - [`loader`]: Indexes documents into OpenSearch
//! - [`orchestrator`]: Coordinates the ingest flow
//! - [`server`]: HTTP trigger for ingestion runs
//! - [`feed_filter`]: Category filter for feed files
//! - [`errors`]: Error types for the indexer

pub mod accumulator;
pub mod config;
pub mod errors;
pub mod feed_filter;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod server;
pub mod source;

pub use config::Dependencies;
pub use errors::IngestError;

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),

    /// HTTP server error.
    #[error("Server error: {0}")]
    ServerError(String),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a server error.
    pub fn server(msg: impl Into<String>) -> Self {
        Self::ServerError(msg.into())
    }
}
