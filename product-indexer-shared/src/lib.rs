//! # Product Indexer Shared
//!
//! This crate defines shared data structures used across the product indexer.
//! It includes the canonical product document handed to the search backend.

pub mod types;

pub use types::product_document::{Batch, ProductDocument, MAX_CATEGORIES};
