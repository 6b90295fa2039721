//! File-backed feed source.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Split};
use tracing::info;

use crate::errors::IngestError;
use crate::source::{FeedLines, FeedSource};

/// Line-delimited JSON feed stored on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileFeedSource {
    path: PathBuf,
}

impl FileFeedSource {
    /// Create a source for the file at `path`. The file is not touched until
    /// [`FeedSource::open`] is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeedSource for FileFeedSource {
    async fn open(&self) -> Result<Box<dyn FeedLines>, IngestError> {
        let file = File::open(&self.path)
            .await
            .map_err(|e| IngestError::source_unavailable(self.describe(), e.to_string()))?;

        info!(path = %self.path.display(), "Opened product feed");

        Ok(Box::new(FileFeedLines {
            segments: BufReader::new(file).split(b'\n'),
            line: 0,
        }))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

struct FileFeedLines {
    segments: Split<BufReader<File>>,
    line: usize,
}

#[async_trait]
impl FeedLines for FileFeedLines {
    /// Bytes that are not UTF-8 fail only their own line, as `MalformedLine`.
    async fn next_line(&mut self) -> Result<Option<String>, IngestError> {
        let mut bytes = match self.segments.next_segment().await? {
            Some(bytes) => bytes,
            None => return Ok(None),
        };
        self.line += 1;

        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }

        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| IngestError::malformed(self.line, e.to_string()))
    }
}
