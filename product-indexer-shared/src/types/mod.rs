//! This module defines the core data structures used across the product indexer.
//! It re-exports specific types like `ProductDocument`.

pub mod product_document;

pub use product_document::ProductDocument;
