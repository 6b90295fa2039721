//! Source module for the product indexer ingest.
//!
//! Provides sequential line access to the product feed.

mod file_source;
mod memory_source;

use async_trait::async_trait;

use crate::errors::IngestError;

pub use file_source::FileFeedSource;
pub use memory_source::MemoryFeedSource;

/// A feed that can be opened for one sequential pass.
///
/// Each call to [`FeedSource::open`] starts a fresh pass, so one source can
/// serve many runs.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Open the feed for reading.
    ///
    /// # Returns
    ///
    /// * `Ok(Box<dyn FeedLines>)` - A reader positioned at the first line
    /// * `Err(IngestError::SourceUnavailable)` - If the feed cannot be opened
    async fn open(&self) -> Result<Box<dyn FeedLines>, IngestError>;

    /// Human-readable location of the feed, for logs and errors.
    fn describe(&self) -> String;
}

/// Line-by-line reader over an opened feed.
#[async_trait]
pub trait FeedLines: Send {
    /// Read the next line without its terminator.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(line))` - The next line, possibly blank
    /// * `Ok(None)` - The feed is exhausted
    /// * `Err(IngestError::MalformedLine)` - If this line cannot be decoded; the
    ///   reader stays usable and the next call moves on
    /// * `Err(IngestError::IoFailure)` - If reading fails mid-stream
    async fn next_line(&mut self) -> Result<Option<String>, IngestError>;
}
