//! Processor module for the product indexer ingest.
//!
//! Turns raw feed lines into canonical product documents.

mod price;
mod product_processor;

pub use price::normalize_price;
pub use product_processor::{ProcessedRecord, ProductProcessor};
