//! Product document types for the search index.
//!
//! This module defines the canonical document structure that is indexed in the
//! search engine.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Maximum number of categories kept on a document.
pub const MAX_CATEGORIES: usize = 5;

/// An ordered group of documents submitted together in one bulk call.
pub type Batch = Vec<ProductDocument>;

/// Canonical product representation for the search index.
///
/// Every optional field is omitted from the serialized document when absent,
/// so the backend never stores `null` placeholders.
///
/// # Fields
///
/// - `id`: Document key in the search index, never empty
/// - `title`: Optional product title
/// - `description`: First paragraph of the feed description, if any
/// - `category`: Up to [`MAX_CATEGORIES`] category labels, in feed order
/// - `price`: Normalized non-negative price without currency symbols
/// - `image`: Image URLs in feed order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductDocument {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<String>>,
    /// Serialized as a JSON number with every digit kept.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "bigdecimal::serde::json_num_option"
    )]
    pub price: Option<BigDecimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<String>>,
}

impl ProductDocument {
    /// Create a document with only its identifier set.
    ///
    /// # Example
    ///
    /// ```
    /// use product_indexer_shared::ProductDocument;
    ///
    /// let doc = ProductDocument::new("B00005N5PF");
    /// assert_eq!(doc.document_id(), "B00005N5PF");
    /// assert!(doc.price.is_none());
    /// ```
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            description: None,
            category: None,
            price: None,
            image: None,
        }
    }

    /// The key used for this document in the search index.
    pub fn document_id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_product_document_new() {
        let doc = ProductDocument::new("B0001");

        assert_eq!(doc.id, "B0001");
        assert!(doc.title.is_none());
        assert!(doc.description.is_none());
        assert!(doc.category.is_none());
        assert!(doc.price.is_none());
        assert!(doc.image.is_none());
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let mut doc = ProductDocument::new("B0001");
        doc.title = Some("Wool Socks".to_string());

        let value = serde_json::to_value(&doc).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 2);
        assert_eq!(object["id"], "B0001");
        assert_eq!(object["title"], "Wool Socks");
    }

    #[test]
    fn test_price_serializes_as_number() {
        let mut doc = ProductDocument::new("B0002");
        doc.price = Some(BigDecimal::from_str("9.39").unwrap());
        doc.category = Some(vec!["Clothing".to_string(), "Men".to_string()]);

        let value = serde_json::to_value(&doc).unwrap();

        assert!(value["price"].is_number());
        assert_eq!(value["price"].to_string(), "9.39");
        assert_eq!(value["category"][1], "Men");

        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains(r#""price":9.39"#));
    }

    #[test]
    fn test_price_keeps_every_digit() {
        let mut doc = ProductDocument::new("B0004");
        doc.price = Some(BigDecimal::from_str("1234567890.123456789").unwrap());

        let json = serde_json::to_string(&doc).unwrap();

        assert!(json.contains(r#""price":1234567890.123456789"#));
    }

    #[test]
    fn test_numeric_price_deserializes() {
        let doc: ProductDocument =
            serde_json::from_str(r#"{"id": "B0005", "price": 12.99}"#).unwrap();

        assert_eq!(doc.price, Some(BigDecimal::from_str("12.99").unwrap()));
    }

    #[test]
    fn test_serialization() {
        let mut doc = ProductDocument::new("B0003");
        doc.title = Some("Hat".to_string());
        doc.price = Some(BigDecimal::from_str("18.99").unwrap());

        let json = serde_json::to_string(&doc).unwrap();
        let deserialized: ProductDocument = serde_json::from_str(&json).unwrap();

        assert_eq!(doc, deserialized);
    }
}
