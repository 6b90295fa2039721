//! Accumulator module for the product indexer ingest.
//!
//! Buffers normalized documents into fixed-size batches for the loader.

use std::num::NonZeroUsize;

use tracing::debug;

use product_indexer_shared::{Batch, ProductDocument};

/// What happened to a document handed to [`BatchAccumulator::add`].
#[derive(Debug, PartialEq)]
pub enum AddOutcome {
    /// The document was buffered; the batch is not full yet.
    Buffered,
    /// The document filled the buffer. The full batch is returned and the
    /// buffer starts over.
    BatchReady(Batch),
    /// The record limit was already reached; the document was dropped.
    Refused,
}

/// Single-pass buffer that groups documents into batches.
///
/// An optional record limit caps the total number of documents accepted over
/// the accumulator's lifetime. A limit of zero accepts nothing.
pub struct BatchAccumulator {
    batch_size: NonZeroUsize,
    record_limit: Option<usize>,
    accepted: usize,
    pending: Batch,
}

impl BatchAccumulator {
    /// Create a new accumulator.
    ///
    /// # Arguments
    ///
    /// * `batch_size` - Number of documents per full batch
    /// * `record_limit` - Optional cap on the documents accepted in total
    pub fn new(batch_size: NonZeroUsize, record_limit: Option<usize>) -> Self {
        Self {
            batch_size,
            record_limit,
            accepted: 0,
            pending: Vec::with_capacity(batch_size.get()),
        }
    }

    /// Add a document, returning the batch it completes, if any.
    pub fn add(&mut self, document: ProductDocument) -> AddOutcome {
        if self.limit_reached() {
            return AddOutcome::Refused;
        }

        self.pending.push(document);
        self.accepted += 1;

        if self.pending.len() >= self.batch_size.get() {
            debug!(batch_size = self.pending.len(), "Batch ready");
            AddOutcome::BatchReady(self.take_pending())
        } else {
            AddOutcome::Buffered
        }
    }

    /// Return the partial batch, if any, and reset the buffer.
    ///
    /// Called once at the end of the stream.
    pub fn flush(&mut self) -> Option<Batch> {
        if self.pending.is_empty() {
            return None;
        }

        debug!(batch_size = self.pending.len(), "Flushing partial batch");
        Some(self.take_pending())
    }

    /// Whether the record limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.record_limit
            .is_some_and(|limit| self.accepted >= limit)
    }

    /// Number of documents accepted so far.
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Number of documents waiting for the next batch.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn take_pending(&mut self) -> Batch {
        std::mem::replace(&mut self.pending, Vec::with_capacity(self.batch_size.get()))
    }
}
