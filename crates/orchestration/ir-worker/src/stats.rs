//! Statistics for worker runs.

use chrono::{DateTime, Duration, Utc};
use ir_error::ProcessingStage;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics collected during a worker run.
///
/// Counters are atomic so the stats can be shared with a progress reporter
/// while the worker updates them.
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// When the run started
    started_at: Option<DateTime<Utc>>,

    /// When the last notification finished processing
    last_notification_at: Mutex<Option<DateTime<Utc>>>,

    /// Poll cycles executed
    cycles: AtomicU64,

    /// Queue messages retrieved
    messages_received: AtomicU64,

    /// Queue messages deleted
    messages_acked: AtomicU64,

    /// Notifications parsed from messages
    notifications_received: AtomicU64,

    /// Notifications skipped for a non-archive key
    notifications_skipped: AtomicU64,

    /// Archives fetched from the object store
    archives_fetched: AtomicU64,

    /// Bytes fetched from the object store
    bytes_fetched: AtomicU64,

    /// Notifications whose fetch failed
    fetch_failures: AtomicU64,

    /// Archives that could not be opened at all
    unreadable_archives: AtomicU64,

    /// Notifications whose extraction failed
    extraction_failures: AtomicU64,

    /// Notifications whose analysis failed
    analysis_failures: AtomicU64,

    /// Notifications whose artifacts reached every sink
    notifications_published: AtomicU64,

    /// Notifications with nothing to publish
    notifications_empty: AtomicU64,

    /// Notifications with at least one failed sink
    publish_failures: AtomicU64,

    /// Artifacts handed to sinks
    artifacts_published: AtomicU64,

    /// Artifact bytes handed to sinks
    bytes_published: AtomicU64,
}

impl WorkerStats {
    /// Create a new stats tracker with the current time as start time.
    pub fn new() -> Self {
        Self {
            started_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Record one poll cycle and the number of messages it retrieved.
    pub fn record_cycle(&self, messages: u64, notifications: u64) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
        self.messages_received.fetch_add(messages, Ordering::Relaxed);
        self.notifications_received
            .fetch_add(notifications, Ordering::Relaxed);
    }

    /// Record acknowledged messages.
    pub fn record_acked(&self, messages: u64) {
        self.messages_acked.fetch_add(messages, Ordering::Relaxed);
    }

    /// Record a notification skipped for its key suffix.
    pub fn record_skipped(&self) {
        self.notifications_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a fetched archive.
    pub fn record_fetched(&self, bytes: u64) {
        self.archives_fetched.fetch_add(1, Ordering::Relaxed);
        self.bytes_fetched.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record an archive that could not be opened.
    pub fn record_unreadable_archive(&self) {
        self.unreadable_archives.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a per-notification failure at the given stage.
    pub fn record_failure(&self, stage: ProcessingStage) {
        let counter = match stage {
            ProcessingStage::Fetch => &self.fetch_failures,
            ProcessingStage::Extract => &self.extraction_failures,
            ProcessingStage::Analyze => &self.analysis_failures,
            ProcessingStage::Publish => &self.publish_failures,
            ProcessingStage::Filter => &self.notifications_skipped,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a notification whose artifacts reached every sink.
    pub fn record_published(&self, artifacts: u64, bytes: u64) {
        self.notifications_published.fetch_add(1, Ordering::Relaxed);
        self.artifacts_published
            .fetch_add(artifacts, Ordering::Relaxed);
        self.bytes_published.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record a notification with nothing to publish.
    pub fn record_empty(&self) {
        self.notifications_empty.fetch_add(1, Ordering::Relaxed);
    }

    /// Mark the end of one notification's processing.
    pub fn record_notification_done(&self) {
        *self.last_notification_at.lock() = Some(Utc::now());
    }

    /// Get the duration since the run started.
    pub fn duration(&self) -> Option<Duration> {
        self.started_at.map(|start| Utc::now() - start)
    }

    /// Total per-notification failures across all stages.
    pub fn failures(&self) -> u64 {
        self.fetch_failures.load(Ordering::Relaxed)
            + self.extraction_failures.load(Ordering::Relaxed)
            + self.analysis_failures.load(Ordering::Relaxed)
            + self.publish_failures.load(Ordering::Relaxed)
    }

    /// Create a snapshot of the current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            started_at: self.started_at,
            completed_at: None,
            last_notification_at: *self.last_notification_at.lock(),
            cycles: self.cycles.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            messages_acked: self.messages_acked.load(Ordering::Relaxed),
            notifications_received: self.notifications_received.load(Ordering::Relaxed),
            notifications_skipped: self.notifications_skipped.load(Ordering::Relaxed),
            archives_fetched: self.archives_fetched.load(Ordering::Relaxed),
            bytes_fetched: self.bytes_fetched.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            unreadable_archives: self.unreadable_archives.load(Ordering::Relaxed),
            extraction_failures: self.extraction_failures.load(Ordering::Relaxed),
            analysis_failures: self.analysis_failures.load(Ordering::Relaxed),
            notifications_published: self.notifications_published.load(Ordering::Relaxed),
            notifications_empty: self.notifications_empty.load(Ordering::Relaxed),
            publish_failures: self.publish_failures.load(Ordering::Relaxed),
            artifacts_published: self.artifacts_published.load(Ordering::Relaxed),
            bytes_published: self.bytes_published.load(Ordering::Relaxed),
        }
    }
}

/// A serializable snapshot of worker statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_notification_at: Option<DateTime<Utc>>,
    pub cycles: u64,
    pub messages_received: u64,
    pub messages_acked: u64,
    pub notifications_received: u64,
    pub notifications_skipped: u64,
    pub archives_fetched: u64,
    pub bytes_fetched: u64,
    pub fetch_failures: u64,
    pub unreadable_archives: u64,
    pub extraction_failures: u64,
    pub analysis_failures: u64,
    pub notifications_published: u64,
    pub notifications_empty: u64,
    pub publish_failures: u64,
    pub artifacts_published: u64,
    pub bytes_published: u64,
}

impl StatsSnapshot {
    /// Total per-notification failures across all stages.
    pub fn failures(&self) -> u64 {
        self.fetch_failures + self.extraction_failures + self.analysis_failures + self.publish_failures
    }

    /// Get the duration of the run.
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}
