//! Category filter for product feed files.
//!
//! Produces a smaller feed holding only the records tagged with one category.

use std::path::Path;

use serde_json::Value;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument, warn};

use crate::errors::IngestError;
use crate::source::{FeedSource, FileFeedSource};

/// Category kept when none is given.
pub const DEFAULT_CATEGORY: &str = "Men";

/// Counters for one filter pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSummary {
    /// Non-blank lines examined.
    pub lines_read: usize,
    /// Lines copied to the output.
    pub kept: usize,
    /// Lines that were not valid UTF-8 or JSON.
    pub malformed: usize,
}

/// Copy every record of `input` whose `category` list contains `category`
/// into `output`.
///
/// Lines are trimmed and blank lines skipped. Kept lines are joined with `\n`
/// and the output has no trailing newline. The output file is replaced.
///
/// # Returns
///
/// * `Ok(FilterSummary)` - The pass completed
/// * `Err(IngestError::SourceUnavailable)` - If `input` cannot be opened
/// * `Err(IngestError::IoFailure)` - If reading or writing fails
#[instrument(skip_all, fields(input = %input.as_ref().display(), category = %category))]
pub async fn filter_by_category(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    category: &str,
) -> Result<FilterSummary, IngestError> {
    let mut lines = FileFeedSource::new(input.as_ref()).open().await?;
    let mut writer = File::create(output.as_ref()).await?;

    let mut summary = FilterSummary::default();
    loop {
        let raw = match lines.next_line().await {
            Ok(Some(raw)) => raw,
            Ok(None) => break,
            Err(e) if e.is_recoverable() => {
                summary.lines_read += 1;
                warn!(line = summary.lines_read, error = %e, "Skipping unreadable line");
                summary.malformed += 1;
                continue;
            }
            Err(e) => return Err(e),
        };
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        summary.lines_read += 1;

        let record: Value = match serde_json::from_str(line) {
            Ok(record) => record,
            Err(e) => {
                warn!(line = summary.lines_read, error = %e, "Skipping malformed line");
                summary.malformed += 1;
                continue;
            }
        };

        if has_category(&record, category) {
            if summary.kept > 0 {
                writer.write_all(b"\n").await?;
            }
            writer.write_all(line.as_bytes()).await?;
            summary.kept += 1;
        }
    }
    writer.flush().await?;

    info!(
        lines_read = summary.lines_read,
        kept = summary.kept,
        malformed = summary.malformed,
        "Feed filtered"
    );

    Ok(summary)
}

fn has_category(record: &Value, category: &str) -> bool {
    record
        .get("category")
        .and_then(Value::as_array)
        .is_some_and(|list| list.iter().any(|c| c.as_str() == Some(category)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}-{}.json", label, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_has_category() {
        assert!(has_category(&json!({ "category": ["Clothing", "Men"] }), "Men"));
        assert!(!has_category(&json!({ "category": ["Women"] }), "Men"));
        assert!(!has_category(&json!({ "category": ["Menswear"] }), "Men"));
        assert!(!has_category(&json!({ "category": "Men" }), "Men"));
        assert!(!has_category(&json!({ "id": "B1" }), "Men"));
        assert!(!has_category(&json!([1, 2]), "Men"));
    }

    #[tokio::test]
    async fn test_filter_by_category() {
        let input = temp_path("feed");
        let output = temp_path("filtered");
        let feed = [
            r#"{"id": "B1", "category": ["Clothing", "Men"]}"#,
            "",
            r#"  {"id": "B2", "category": ["Women"]}  "#,
            "{broken",
            r#"{"id": "B3", "category": ["Men"]}"#,
        ]
        .join("\n");
        tokio::fs::write(&input, feed).await.unwrap();

        let summary = filter_by_category(&input, &output, DEFAULT_CATEGORY)
            .await
            .unwrap();

        assert_eq!(
            summary,
            FilterSummary {
                lines_read: 4,
                kept: 2,
                malformed: 1,
            }
        );
        let written = tokio::fs::read_to_string(&output).await.unwrap();
        assert_eq!(
            written,
            "{\"id\": \"B1\", \"category\": [\"Clothing\", \"Men\"]}\n{\"id\": \"B3\", \"category\": [\"Men\"]}"
        );

        tokio::fs::remove_file(&input).await.unwrap();
        tokio::fs::remove_file(&output).await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_is_skipped() {
        let input = temp_path("feed");
        let output = temp_path("filtered");
        let mut feed = br#"{"id": "B1", "category": ["Men"], "title": "caf"#.to_vec();
        feed.push(0xe9);
        feed.extend_from_slice(b"\"}\n");
        feed.extend_from_slice(br#"{"id": "B2", "category": ["Men"]}"#);
        tokio::fs::write(&input, feed).await.unwrap();

        let summary = filter_by_category(&input, &output, "Men").await.unwrap();

        assert_eq!(summary.kept, 1);
        assert_eq!(summary.malformed, 1);
        let written = tokio::fs::read_to_string(&output).await.unwrap();
        assert_eq!(written, r#"{"id": "B2", "category": ["Men"]}"#);

        tokio::fs::remove_file(&input).await.unwrap();
        tokio::fs::remove_file(&output).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_input() {
        let output = temp_path("filtered");

        let err = filter_by_category("/definitely/not/here.json", &output, "Men")
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::SourceUnavailable { .. }));
        assert!(!output.exists());
    }
}
