//! In-memory feed source.

use async_trait::async_trait;

use crate::errors::IngestError;
use crate::source::{FeedLines, FeedSource};

/// Feed backed by lines held in memory.
///
/// Useful for tests and for feeding already-fetched content through the
/// pipeline.
#[derive(Debug, Clone, Default)]
pub struct MemoryFeedSource {
    lines: Vec<String>,
}

impl MemoryFeedSource {
    /// Create a source from individual lines.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a source by splitting text on line breaks.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines())
    }
}

#[async_trait]
impl FeedSource for MemoryFeedSource {
    async fn open(&self) -> Result<Box<dyn FeedLines>, IngestError> {
        Ok(Box::new(MemoryFeedLines {
            lines: self.lines.clone().into_iter(),
        }))
    }

    fn describe(&self) -> String {
        format!("memory ({} lines)", self.lines.len())
    }
}

struct MemoryFeedLines {
    lines: std::vec::IntoIter<String>,
}

#[async_trait]
impl FeedLines for MemoryFeedLines {
    async fn next_line(&mut self) -> Result<Option<String>, IngestError> {
        Ok(self.lines.next())
    }
}
