//! Error types for the product indexer ingest.

use thiserror::Error;

/// Errors that can occur in the product indexer ingest.
///
/// `MalformedLine`, `InvalidPriceFormat` and `MissingIdentifier` are recovered
/// where they occur: the record (or its price) is dropped and the run goes on.
/// The remaining variants end a run.
#[derive(Error, Debug)]
pub enum IngestError {
    /// One input line is not a JSON object.
    #[error("Malformed line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    /// A price string could not be turned into a decimal.
    #[error("Unable to parse price: {0}")]
    InvalidPriceFormat(String),

    /// A record has neither an `id` nor an `asin`.
    #[error("Record on line {line} has no identifier")]
    MissingIdentifier { line: usize },

    /// The backend bulk call itself could not complete.
    #[error("Bulk indexing failed for {batch_size} documents: {reason}")]
    BulkTransportFailure { batch_size: usize, reason: String },

    /// The input could not be opened.
    #[error("Source unavailable at {path}: {reason}")]
    SourceUnavailable { path: String, reason: String },

    /// Reading the input failed or was cancelled after it was opened.
    #[error("I/O error: {0}")]
    IoFailure(String),

    /// A document could not be encoded for the backend.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl IngestError {
    /// Create a malformed line error.
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedLine {
            line,
            reason: reason.into(),
        }
    }

    /// Create an invalid price error.
    pub fn invalid_price(raw: impl Into<String>) -> Self {
        Self::InvalidPriceFormat(raw.into())
    }

    /// Create a bulk transport error.
    pub fn bulk_transport(batch_size: usize, reason: impl Into<String>) -> Self {
        Self::BulkTransportFailure {
            batch_size,
            reason: reason.into(),
        }
    }

    /// Create a source unavailable error.
    pub fn source_unavailable(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::IoFailure(msg.into())
    }

    /// Whether the run can continue past this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MalformedLine { .. } | Self::InvalidPriceFormat(_) | Self::MissingIdentifier { .. }
        )
    }
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        Self::IoFailure(err.to_string())
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
