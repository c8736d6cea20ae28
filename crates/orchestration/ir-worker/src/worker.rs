//! Main worker orchestration.

use crate::config::{RunMode, WorkerConfig};
use crate::stats::{StatsSnapshot, WorkerStats};
use ir_error::{ProcessingStage, Result};
use ir_traits::{ArchiveProcessor, NotificationQueue, ObjectFetcher, PublishOutcome, ResultSink};
use ir_types::{Notification, ResultSet, SideData, ARCHIVE_SUFFIX};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

/// Incident-response triage worker.
///
/// Each poll cycle receives one batch of notifications, processes every
/// notification sequentially to completion (fetch, extract, analyze,
/// publish), then acknowledges the batch. Per-notification failures are
/// logged and counted; they never abort the batch.
pub struct Worker {
    /// Worker configuration
    config: WorkerConfig,

    /// Notification source (SQS or stdin)
    queue: Arc<dyn NotificationQueue>,

    /// Archive fetcher
    fetcher: Arc<dyn ObjectFetcher>,

    /// Archive processor
    processor: Arc<dyn ArchiveProcessor>,

    /// Registered result sinks, in registration order
    sinks: Vec<Arc<dyn ResultSink>>,

    /// Data feeds passed to every analysis
    side_data: SideData,

    /// Global statistics
    stats: Arc<WorkerStats>,

    /// Shutdown request from a signal or the embedding application
    shutdown: Arc<Shutdown>,
}

/// Summary of one poll cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Raw messages retrieved
    pub messages: usize,

    /// Notifications parsed from the messages
    pub notifications: usize,

    /// Notifications skipped for their key suffix
    pub skipped: usize,

    /// Stage failures across the batch
    pub failures: usize,
}

/// What happened to a single notification.
#[derive(Debug, Clone, PartialEq, Eq)]
enum NotificationOutcome {
    /// Key did not name an archive
    Skipped,

    /// The notification went through the pipeline; lists failed stages
    Processed { failures: Vec<ProcessingStage> },
}

impl Worker {
    /// Create a new worker with no sinks registered.
    pub fn new(
        config: WorkerConfig,
        queue: Arc<dyn NotificationQueue>,
        fetcher: Arc<dyn ObjectFetcher>,
        processor: Arc<dyn ArchiveProcessor>,
    ) -> Self {
        Self {
            config,
            queue,
            fetcher,
            processor,
            sinks: Vec::new(),
            side_data: SideData::new(),
            stats: Arc::new(WorkerStats::new()),
            shutdown: Arc::new(Shutdown::default()),
        }
    }

    /// Set the data feeds passed to every analysis.
    pub fn with_side_data(mut self, side_data: SideData) -> Self {
        self.side_data = side_data;
        self
    }

    /// Register a result sink. Sinks are called in registration order.
    pub fn register_sink(&mut self, sink: Arc<dyn ResultSink>) {
        info!(sink = sink.name(), "Registered result sink");
        self.sinks.push(sink);
    }

    /// Number of registered sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Get a reference to the worker statistics.
    pub fn stats(&self) -> &Arc<WorkerStats> {
        &self.stats
    }

    /// Ask a running worker to stop after the current cycle.
    pub fn request_shutdown(&self) {
        self.shutdown.request();
    }

    /// Run poll cycles according to the configured run mode.
    ///
    /// In continuous mode Ctrl-C stops the worker after the current cycle.
    pub async fn run(&self) -> Result<StatsSnapshot> {
        info!(
            mode = ?self.config.run_mode,
            processor = self.processor.name(),
            sinks = self.sinks.len(),
            feeds = self.side_data.len(),
            "Starting worker"
        );

        if self.sinks.is_empty() {
            warn!("No result sinks registered; analysis results will be discarded");
        }

        let listener = (self.config.run_mode == RunMode::Continuous).then(|| {
            let shutdown = self.shutdown.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Shutdown signal received, finishing the current cycle");
                    shutdown.request();
                }
            })
        });

        let result = self.run_cycles().await;

        if let Some(listener) = listener {
            listener.abort();
        }
        result?;

        let mut stats = self.stats.snapshot();
        stats.completed_at = Some(chrono::Utc::now());

        info!(
            cycles = stats.cycles,
            notifications = stats.notifications_received,
            published = stats.notifications_published,
            failures = stats.failures(),
            "Worker completed"
        );

        Ok(stats)
    }

    async fn run_cycles(&self) -> Result<()> {
        let mut cycles = 0u64;

        loop {
            if self.shutdown.is_requested() {
                debug!("Shutdown requested, stopping");
                break;
            }

            if let Some(max) = self.config.max_cycles {
                if cycles >= max {
                    info!(cycles = cycles, "Reached the maximum number of cycles");
                    break;
                }
            }

            if !self.queue.has_more() {
                debug!("Source exhausted, stopping");
                break;
            }

            cycles += 1;
            let report = match self.run_cycle().await {
                Ok(Some(report)) => report,
                Ok(None) => {
                    debug!("Source returned None, stopping");
                    break;
                }
                Err(e) if self.config.run_mode == RunMode::Continuous => {
                    error!(error = %e, "Poll cycle failed");
                    if self.shutdown.sleep(self.config.poll_interval).await {
                        break;
                    }
                    continue;
                }
                Err(e) => return Err(e),
            };

            match self.config.run_mode {
                RunMode::Once => break,
                RunMode::Drain => {
                    if report.messages == 0 {
                        debug!("Queue drained");
                        break;
                    }
                }
                RunMode::Continuous => {
                    if report.messages == 0 && self.shutdown.sleep(self.config.poll_interval).await
                    {
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Run one poll cycle: receive a batch, process it, acknowledge it.
    ///
    /// Returns `Ok(None)` when the source is exhausted. Receive and ack
    /// failures are returned; per-notification failures are not.
    pub async fn run_cycle(&self) -> Result<Option<CycleReport>> {
        let batch = match self.queue.receive().await? {
            Some(batch) => batch,
            None => return Ok(None),
        };

        let mut report = CycleReport {
            messages: batch.message_count(),
            notifications: batch.notifications.len(),
            ..Default::default()
        };
        self.stats
            .record_cycle(report.messages as u64, report.notifications as u64);

        for notification in &batch.notifications {
            match self.process_notification(notification).await {
                NotificationOutcome::Skipped => report.skipped += 1,
                NotificationOutcome::Processed { failures } => report.failures += failures.len(),
            }
        }

        if !batch.receipts.is_empty() {
            self.queue.ack(&batch.receipts).await?;
            self.stats.record_acked(batch.receipts.len() as u64);
        }

        debug!(
            messages = report.messages,
            notifications = report.notifications,
            skipped = report.skipped,
            failures = report.failures,
            "Cycle completed"
        );

        Ok(Some(report))
    }

    /// Process one notification to completion.
    ///
    /// Extraction and analysis failures do not prevent publication of the
    /// artifacts accumulated so far.
    async fn process_notification(&self, notification: &Notification) -> NotificationOutcome {
        let key = notification.key_name.as_str();

        let base_name = match notification.base_name() {
            Some(base_name) => base_name,
            None => {
                warn!(
                    bucket = %notification.bucket_name,
                    key = key,
                    "S3 object {} name should end with \"{}\"",
                    key,
                    ARCHIVE_SUFFIX
                );
                self.stats.record_skipped();
                return NotificationOutcome::Skipped;
            }
        };

        let mut failures = Vec::new();

        let raw = match self
            .fetcher
            .fetch(&notification.bucket_name, key)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                error!(
                    bucket = %notification.bucket_name,
                    key = key,
                    error = %e,
                    "Failed to fetch the object"
                );
                self.stats.record_failure(ProcessingStage::Fetch);
                self.stats.record_notification_done();
                failures.push(ProcessingStage::Fetch);
                return NotificationOutcome::Processed { failures };
            }
        };
        self.stats.record_fetched(raw.len() as u64);

        let mut results = ResultSet::new();

        match self.processor.extract(&raw, &mut results) {
            Ok(Some(payload)) => {
                if let Err(e) = self
                    .processor
                    .analyze(payload, &self.side_data, &mut results)
                    .await
                {
                    error!(
                        key = key,
                        processor = self.processor.name(),
                        error = %e,
                        "Unexpected error while running the analysis for the object"
                    );
                    self.stats.record_failure(ProcessingStage::Analyze);
                    failures.push(ProcessingStage::Analyze);
                }
            }
            Ok(None) => {
                warn!(key = key, "Archive could not be opened, skipping analysis");
                self.stats.record_unreadable_archive();
            }
            Err(e) => {
                error!(
                    key = key,
                    processor = self.processor.name(),
                    error = %e,
                    "Failed to extract the payload from the object"
                );
                self.stats.record_failure(ProcessingStage::Extract);
                failures.push(ProcessingStage::Extract);
            }
        }

        match self
            .processor
            .collect_and_publish(&results, base_name, &self.sinks)
            .await
        {
            Ok(PublishOutcome::Skipped) => self.stats.record_empty(),
            Ok(PublishOutcome::Published {
                artifacts, bytes, ..
            }) => {
                info!(key = key, artifacts = artifacts, bytes = bytes, "Published results");
                self.stats.record_published(artifacts as u64, bytes);
            }
            Err(e) => {
                error!(key = key, error = %e, "Failed to publish results for the object");
                self.stats.record_failure(ProcessingStage::Publish);
                failures.push(ProcessingStage::Publish);
            }
        }

        self.stats.record_notification_done();
        NotificationOutcome::Processed { failures }
    }
}

/// Cooperative shutdown flag with a wake-up for idle sleeps.
#[derive(Debug, Default)]
struct Shutdown {
    requested: AtomicBool,
    notify: Notify,
}

impl Shutdown {
    fn request(&self) {
        self.requested.store(true, Ordering::Relaxed);
        self.notify.notify_one();
    }

    fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Relaxed)
    }

    /// Sleep for `duration` unless shutdown is requested first.
    ///
    /// Returns true when the worker should stop.
    async fn sleep(&self, duration: Duration) -> bool {
        if self.is_requested() {
            return true;
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => self.is_requested(),
            _ = self.notify.notified() => true,
        }
    }
}
