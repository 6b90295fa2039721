//! Product processor implementation.
//!
//! Transforms raw feed records into `ProductDocument` structures for indexing.

use std::borrow::Cow;

use serde_json::{Map, Value};
use tracing::{instrument, warn};

use crate::errors::IngestError;
use crate::processor::price::normalize_price;
use product_indexer_shared::{ProductDocument, MAX_CATEGORIES};

/// Candidate fields for the document key, in priority order.
const ID_FIELDS: &[&str] = &["id", "asin"];
const TITLE_FIELDS: &[&str] = &["title"];
const DESCRIPTION_FIELDS: &[&str] = &["description"];
const CATEGORY_FIELDS: &[&str] = &["category"];
const PRICE_FIELDS: &[&str] = &["price"];
/// Candidate fields for image URLs, in priority order.
const IMAGE_FIELDS: &[&str] = &["image", "imageURLHighRes"];

/// A normalized record and what was dropped along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedRecord {
    /// The canonical document.
    pub document: ProductDocument,
    /// The raw price was present but unparsable, so `document.price` is absent.
    pub invalid_price: bool,
}

/// Processor that transforms raw feed records into product documents.
///
/// The processor is responsible for:
/// - Decoding one feed line into a JSON object
/// - Resolving aliased fields in priority order
/// - Flattening descriptions, truncating categories and normalizing prices
///
/// It performs no I/O and keeps no state between records.
pub struct ProductProcessor {}

impl ProductProcessor {
    /// Create a new product processor.
    pub fn new() -> Self {
        Self {}
    }

    /// Decode and normalize one trimmed, non-blank feed line.
    ///
    /// # Arguments
    ///
    /// * `line_number` - 1-based position of the line in the feed, for reporting
    /// * `line` - The line content
    ///
    /// # Returns
    ///
    /// * `Ok(ProcessedRecord)` - The normalized record
    /// * `Err(IngestError::MalformedLine)` - If the line is not a JSON object
    /// * `Err(IngestError::MissingIdentifier)` - If no identifier field is present
    #[instrument(skip(self, line), level = "trace")]
    pub fn process_line(
        &self,
        line_number: usize,
        line: &str,
    ) -> Result<ProcessedRecord, IngestError> {
        let value: Value = serde_json::from_str(line)
            .map_err(|e| IngestError::malformed(line_number, e.to_string()))?;

        let raw = match value {
            Value::Object(raw) => raw,
            other => {
                return Err(IngestError::malformed(
                    line_number,
                    format!("expected a JSON object, found {}", json_kind(&other)),
                ))
            }
        };

        self.normalize(&raw).map_err(|e| match e {
            IngestError::MissingIdentifier { .. } => IngestError::MissingIdentifier {
                line: line_number,
            },
            other => other,
        })
    }

    /// Map one raw record into the canonical document.
    ///
    /// Unknown fields are ignored. A price that cannot be parsed is logged and
    /// left absent; it never fails the record.
    pub fn normalize(&self, raw: &Map<String, Value>) -> Result<ProcessedRecord, IngestError> {
        let id = first_present(raw, ID_FIELDS)
            .and_then(scalar_text)
            .map(Cow::into_owned)
            .filter(|id| !id.trim().is_empty())
            .ok_or(IngestError::MissingIdentifier { line: 0 })?;

        let mut document = ProductDocument::new(id);
        document.title = first_present(raw, TITLE_FIELDS)
            .and_then(scalar_text)
            .map(Cow::into_owned);
        document.description = first_present(raw, DESCRIPTION_FIELDS)
            .map(string_list)
            .and_then(|list| list.into_iter().next());
        document.category = first_present(raw, CATEGORY_FIELDS)
            .map(string_list)
            .filter(|list| !list.is_empty())
            .map(|mut list| {
                list.truncate(MAX_CATEGORIES);
                list
            });
        document.image = first_present(raw, IMAGE_FIELDS).map(string_list);

        let raw_price = first_present(raw, PRICE_FIELDS).and_then(scalar_text);
        let mut invalid_price = false;
        match normalize_price(raw_price.as_deref()) {
            Ok(price) => document.price = price,
            Err(e) => {
                warn!(id = %document.id, error = %e, "Dropping unparsable price");
                invalid_price = true;
            }
        }

        Ok(ProcessedRecord {
            document,
            invalid_price,
        })
    }
}

impl Default for ProductProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Return the first candidate field that is present and not `null`.
fn first_present<'a>(raw: &'a Map<String, Value>, candidates: &[&str]) -> Option<&'a Value> {
    candidates
        .iter()
        .filter_map(|field| raw.get(*field))
        .find(|value| !value.is_null())
}

/// Render a scalar as text; lists and objects have no text form.
fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Read a list of strings. A bare string counts as a one-element list and
/// non-string elements are skipped.
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use serde_json::json;
    use std::str::FromStr;

    fn normalize(value: Value) -> ProcessedRecord {
        let processor = ProductProcessor::new();
        processor
            .normalize(value.as_object().expect("test input is an object"))
            .unwrap()
    }

    #[test]
    fn test_full_record() {
        let record = normalize(json!({
            "id": "B0001",
            "title": "Merino Socks",
            "description": ["Warm.", "Second paragraph."],
            "category": ["Clothing", "Men", "Socks"],
            "price": "$12.99",
            "image": ["https://img/1.jpg"],
            "rank": "unknown fields are ignored"
        }));

        let doc = record.document;
        assert_eq!(doc.id, "B0001");
        assert_eq!(doc.title.as_deref(), Some("Merino Socks"));
        assert_eq!(doc.description.as_deref(), Some("Warm."));
        assert_eq!(doc.category.unwrap(), vec!["Clothing", "Men", "Socks"]);
        assert_eq!(doc.price, Some(BigDecimal::from_str("12.99").unwrap()));
        assert_eq!(doc.image.unwrap(), vec!["https://img/1.jpg"]);
        assert!(!record.invalid_price);
    }

    #[test]
    fn test_id_falls_back_to_asin() {
        let doc = normalize(json!({ "asin": "B00ASIN" })).document;
        assert_eq!(doc.id, "B00ASIN");

        let doc = normalize(json!({ "id": null, "asin": "B00ASIN" })).document;
        assert_eq!(doc.id, "B00ASIN");

        let doc = normalize(json!({ "id": "primary", "asin": "B00ASIN" })).document;
        assert_eq!(doc.id, "primary");
    }

    #[test]
    fn test_numeric_id_is_rendered_as_text() {
        let doc = normalize(json!({ "id": 42 })).document;
        assert_eq!(doc.id, "42");
    }

    #[test]
    fn test_missing_identifier() {
        let processor = ProductProcessor::new();
        let raw = json!({ "title": "No key" });

        let result = processor.normalize(raw.as_object().unwrap());
        assert!(matches!(result, Err(IngestError::MissingIdentifier { .. })));
    }

    #[test]
    fn test_image_falls_back_to_high_res() {
        let doc = normalize(json!({
            "id": "B1",
            "imageURLHighRes": ["https://img/hi.jpg"]
        }))
        .document;
        assert_eq!(doc.image.unwrap(), vec!["https://img/hi.jpg"]);

        let doc = normalize(json!({
            "id": "B1",
            "image": ["https://img/lo.jpg"],
            "imageURLHighRes": ["https://img/hi.jpg"]
        }))
        .document;
        assert_eq!(doc.image.unwrap(), vec!["https://img/lo.jpg"]);
    }

    #[test]
    fn test_description_flattening() {
        let doc = normalize(json!({ "id": "B1", "description": ["a", "b"] })).document;
        assert_eq!(doc.description.as_deref(), Some("a"));

        let doc = normalize(json!({ "id": "B1", "description": [] })).document;
        assert!(doc.description.is_none());

        let doc = normalize(json!({ "id": "B1", "description": null })).document;
        assert!(doc.description.is_none());

        let doc = normalize(json!({ "id": "B1" })).document;
        assert!(doc.description.is_none());
    }

    #[test]
    fn test_category_truncation() {
        let doc = normalize(json!({
            "id": "B1",
            "category": ["a", "b", "c", "d", "e", "f", "g"]
        }))
        .document;
        assert_eq!(doc.category.unwrap(), vec!["a", "b", "c", "d", "e"]);

        let doc = normalize(json!({
            "id": "B1",
            "category": ["a", "b", "c", "d", "e"]
        }))
        .document;
        assert_eq!(doc.category.unwrap().len(), 5);

        let doc = normalize(json!({ "id": "B1", "category": ["a", "b"] })).document;
        assert_eq!(doc.category.unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_or_missing_category_is_absent() {
        let doc = normalize(json!({ "id": "B1", "category": [] })).document;
        assert!(doc.category.is_none());

        let doc = normalize(json!({ "id": "B1", "category": null })).document;
        assert!(doc.category.is_none());

        let doc = normalize(json!({ "id": "B1" })).document;
        assert!(doc.category.is_none());
    }

    #[test]
    fn test_invalid_price_keeps_record() {
        let record = normalize(json!({ "id": "B1", "price": "$abc.def" }));

        assert!(record.invalid_price);
        assert_eq!(record.document.id, "B1");
        assert!(record.document.price.is_none());
    }

    #[test]
    fn test_price_forms() {
        let doc = normalize(json!({ "id": "B1", "price": "$9.39 - $49.33" })).document;
        assert_eq!(doc.price, Some(BigDecimal::from_str("9.39").unwrap()));

        let doc = normalize(json!({ "id": "B1", "price": 19.5 })).document;
        assert_eq!(doc.price, Some(BigDecimal::from_str("19.5").unwrap()));

        let record = normalize(json!({ "id": "B1", "price": "" }));
        assert!(record.document.price.is_none());
        assert!(!record.invalid_price);
    }

    #[test]
    fn test_process_line_malformed() {
        let processor = ProductProcessor::new();

        let result = processor.process_line(7, "{\"id\": \"B1\",");
        assert!(matches!(
            result,
            Err(IngestError::MalformedLine { line: 7, .. })
        ));

        let result = processor.process_line(8, "[1, 2, 3]");
        assert!(matches!(
            result,
            Err(IngestError::MalformedLine { line: 8, .. })
        ));
    }

    #[test]
    fn test_process_line_reports_line_of_missing_identifier() {
        let processor = ProductProcessor::new();

        let result = processor.process_line(3, r#"{"title": "orphan"}"#);
        assert!(matches!(
            result,
            Err(IngestError::MissingIdentifier { line: 3 })
        ));
    }

    #[test]
    fn test_process_line() {
        let processor = ProductProcessor::new();

        let record = processor
            .process_line(1, r#"{"asin": "B2", "title": "Cap", "price": "$5"}"#)
            .unwrap();
        assert_eq!(record.document.id, "B2");
        assert_eq!(record.document.title.as_deref(), Some("Cap"));
        assert_eq!(record.document.price, Some(BigDecimal::from(5)));
    }
}
