//! Orchestrator module for the product indexer ingest.
//!
//! Coordinates the source, processor, accumulator, and loader components.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, instrument, warn};

use crate::accumulator::{AddOutcome, BatchAccumulator};
use crate::errors::IngestError;
use crate::loader::{BulkLoader, ItemFailure};
use crate::processor::ProductProcessor;
use crate::source::FeedSource;
use product_indexer_shared::Batch;

/// Default number of documents per bulk call.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// How often a long run reports its progress.
const PROGRESS_LOG_INTERVAL: Duration = Duration::from_secs(10);

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Number of documents per bulk call.
    pub batch_size: NonZeroUsize,
    /// Optional cap on the records accepted per run.
    pub record_limit: Option<usize>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            batch_size: NonZeroUsize::new(DEFAULT_BATCH_SIZE).unwrap_or(NonZeroUsize::MIN),
            record_limit: None,
        }
    }
}

/// Counters and outcome of one ingestion run.
///
/// `submitted` is the headline number: documents handed to the backend in bulk
/// calls that completed, including ones the backend later rejected.
#[derive(Debug, Default)]
pub struct IngestSummary {
    /// Lines read from the feed, blank ones included.
    pub lines_read: usize,
    /// Lines skipped because they were blank.
    pub blank_lines: usize,
    /// Records normalized and handed to the accumulator.
    pub records_normalized: usize,
    /// Lines that were not a JSON object.
    pub malformed_lines: usize,
    /// Records without an identifier.
    pub missing_ids: usize,
    /// Records indexed without their unparsable price.
    pub invalid_prices: usize,
    /// Bulk calls that completed.
    pub batches: usize,
    /// Documents submitted in completed bulk calls.
    pub submitted: usize,
    /// Documents the backend rejected inside completed bulk calls.
    pub item_failures: Vec<ItemFailure>,
    /// The error that stopped the run early, if any.
    pub halted_by: Option<IngestError>,
}

impl IngestSummary {
    /// Number of documents the backend rejected.
    pub fn rejected(&self) -> usize {
        self.item_failures.len()
    }

    /// Number of documents the backend accepted.
    pub fn indexed(&self) -> usize {
        self.submitted.saturating_sub(self.rejected())
    }

    /// Whether the run read the whole feed (or its record limit) and loaded
    /// every batch.
    pub fn is_complete(&self) -> bool {
        self.halted_by.is_none()
    }

    fn record_skipped(&mut self, error: &IngestError) {
        match error {
            IngestError::MalformedLine { .. } => self.malformed_lines += 1,
            IngestError::MissingIdentifier { .. } => self.missing_ids += 1,
            _ => {}
        }
    }
}

/// Orchestrator that coordinates the ingest components.
///
/// The orchestrator:
/// - Reads the feed one line at a time
/// - Routes records through the processor and accumulator to the loader
/// - Stops a run on transport failure or shutdown, keeping the partial count
/// - Serializes runs so that at most one is in flight
pub struct Orchestrator {
    source: Arc<dyn FeedSource>,
    processor: ProductProcessor,
    loader: BulkLoader,
    config: OrchestratorConfig,
    shutdown_tx: broadcast::Sender<()>,
    run_lock: Mutex<()>,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(
        source: Arc<dyn FeedSource>,
        processor: ProductProcessor,
        loader: BulkLoader,
    ) -> Self {
        Self::with_config(source, processor, loader, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        source: Arc<dyn FeedSource>,
        processor: ProductProcessor,
        loader: BulkLoader,
        config: OrchestratorConfig,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            source,
            processor,
            loader,
            config,
            shutdown_tx,
            run_lock: Mutex::new(()),
        }
    }

    /// Run one ingestion with the configured record limit.
    pub async fn run(&self) -> Result<IngestSummary, IngestError> {
        self.execute(self.config.record_limit).await
    }

    /// Run one ingestion that accepts at most `record_limit` records.
    pub async fn run_with_limit(&self, record_limit: usize) -> Result<IngestSummary, IngestError> {
        self.execute(Some(record_limit)).await
    }

    /// Cancel the run in progress, if any.
    ///
    /// The pending line read or bulk call is abandoned and the run returns
    /// with `halted_by` set.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// A sender that cancels the run in progress when it fires.
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Read the feed to the end and load every batch.
    ///
    /// # Returns
    ///
    /// * `Ok(IngestSummary)` - The run finished or stopped part way; check
    ///   `halted_by` for a mid-run transport or read failure
    /// * `Err(IngestError::SourceUnavailable)` - The feed could not be opened
    #[instrument(skip(self), fields(source = %self.source.describe()))]
    async fn execute(&self, record_limit: Option<usize>) -> Result<IngestSummary, IngestError> {
        // Subscribe before queueing on the lock so a waiting run sees shutdown too.
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let _run_guard = self.run_lock.lock().await;

        info!(
            batch_size = self.config.batch_size.get(),
            record_limit = ?record_limit,
            index = %self.loader.index_name(),
            "Starting product ingestion"
        );

        let mut lines = match self.source.open().await {
            Ok(lines) => lines,
            Err(e) => {
                error!(error = %e, "Failed to open product feed");
                return Err(e);
            }
        };

        let mut accumulator = BatchAccumulator::new(self.config.batch_size, record_limit);
        let mut summary = IngestSummary::default();
        let started = Instant::now();
        let mut last_progress = started;

        while !accumulator.limit_reached() {
            let next = tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    Err(IngestError::io("run cancelled while reading the feed"))
                }
                line = lines.next_line() => line,
            };

            let line = match next {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) if e.is_recoverable() => {
                    summary.lines_read += 1;
                    warn!(line = summary.lines_read, error = %e, "Skipping unreadable line");
                    summary.record_skipped(&e);
                    continue;
                }
                Err(e) => {
                    error!(
                        error = %e,
                        line = summary.lines_read + 1,
                        "Failed to read product feed"
                    );
                    summary.halted_by = Some(e);
                    break;
                }
            };
            summary.lines_read += 1;
            let line_number = summary.lines_read;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                summary.blank_lines += 1;
                continue;
            }

            let record = match self.processor.process_line(line_number, trimmed) {
                Ok(record) => record,
                Err(e) if e.is_recoverable() => {
                    warn!(line = line_number, error = %e, "Skipping record");
                    summary.record_skipped(&e);
                    continue;
                }
                Err(e) => {
                    summary.halted_by = Some(e);
                    break;
                }
            };

            summary.records_normalized += 1;
            if record.invalid_price {
                summary.invalid_prices += 1;
            }

            match accumulator.add(record.document) {
                AddOutcome::Buffered => {}
                AddOutcome::BatchReady(batch) => {
                    if let Err(e) = self.load_batch(batch, &mut shutdown_rx, &mut summary).await {
                        summary.halted_by = Some(e);
                        break;
                    }
                }
                AddOutcome::Refused => break,
            }

            if last_progress.elapsed() >= PROGRESS_LOG_INTERVAL {
                let elapsed_secs = started.elapsed().as_secs_f64();
                info!(
                    lines_read = summary.lines_read,
                    submitted = summary.submitted,
                    lines_per_sec = format!("{:.2}", summary.lines_read as f64 / elapsed_secs),
                    "Ingestion progress"
                );
                last_progress = Instant::now();
            }
        }

        // A halted run is not drained: the buffered records were never submitted.
        if summary.halted_by.is_none() {
            if let Some(batch) = accumulator.flush() {
                if let Err(e) = self.load_batch(batch, &mut shutdown_rx, &mut summary).await {
                    summary.halted_by = Some(e);
                }
            }
        }

        match &summary.halted_by {
            None => info!(
                submitted = summary.submitted,
                rejected = summary.rejected(),
                batches = summary.batches,
                malformed_lines = summary.malformed_lines,
                missing_ids = summary.missing_ids,
                invalid_prices = summary.invalid_prices,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Product ingestion complete"
            ),
            Some(e) => error!(
                error = %e,
                submitted = summary.submitted,
                unsubmitted = accumulator.pending_len(),
                batches = summary.batches,
                "Product ingestion halted"
            ),
        }

        Ok(summary)
    }

    /// Send one batch, racing the bulk call against shutdown.
    async fn load_batch(
        &self,
        batch: Batch,
        shutdown_rx: &mut broadcast::Receiver<()>,
        summary: &mut IngestSummary,
    ) -> Result<(), IngestError> {
        let size = batch.len();
        debug!(batch_size = size, "Loading batch");

        let outcome = tokio::select! {
            biased;
            _ = shutdown_rx.recv() => Err(IngestError::bulk_transport(
                size,
                "run cancelled while the bulk call was in flight",
            )),
            outcome = self.loader.load(&batch) => outcome,
        };
        let result = outcome?;

        summary.batches += 1;
        summary.submitted += result.submitted;
        summary.item_failures.extend(result.item_failures);
        Ok(())
    }
}
