//! # Product Indexer Repository
//!
//! This crate provides traits and implementations for interacting with the
//! search backend. It includes definitions for errors, interfaces, and a
//! concrete implementation for OpenSearch.

pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;
pub mod utils;

pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use opensearch::OpenSearchProvider;
pub use types::{BatchOperationResult, BatchOperationSummary, ClusterHealth, IndexDocumentRequest};
pub use utils::parse_bulk_response;
