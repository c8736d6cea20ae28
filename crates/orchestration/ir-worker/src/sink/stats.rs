//! Stats result sink.

use async_trait::async_trait;
use ir_error::Result;
use ir_traits::ResultSink;
use ir_types::ResultArtifact;
use std::sync::atomic::{AtomicU64, Ordering};

/// Sink that counts artifacts and bytes without storing anything.
///
/// Used for dry runs and throughput measurement.
pub struct StatsResultSink {
    calls: AtomicU64,
    artifacts: AtomicU64,
    bytes: AtomicU64,
}

impl StatsResultSink {
    /// Create a new stats sink.
    pub fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
            artifacts: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
        }
    }

    /// Get the current statistics.
    pub fn get_stats(&self) -> StatsReport {
        StatsReport {
            calls: self.calls.load(Ordering::Relaxed),
            artifacts: self.artifacts.load(Ordering::Relaxed),
            bytes: self.bytes.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.calls.store(0, Ordering::Relaxed);
        self.artifacts.store(0, Ordering::Relaxed);
        self.bytes.store(0, Ordering::Relaxed);
    }
}

impl Default for StatsResultSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics report from the stats sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsReport {
    /// Publish calls received
    pub calls: u64,
    /// Artifacts received
    pub artifacts: u64,
    /// Artifact bytes received
    pub bytes: u64,
}

#[async_trait]
impl ResultSink for StatsResultSink {
    fn name(&self) -> &str {
        "stats"
    }

    async fn publish(&self, artifacts: &[ResultArtifact]) -> Result<()> {
        let bytes: u64 = artifacts.iter().map(|a| a.len() as u64).sum();

        self.calls.fetch_add(1, Ordering::Relaxed);
        self.artifacts
            .fetch_add(artifacts.len() as u64, Ordering::Relaxed);
        self.bytes.fetch_add(bytes, Ordering::Relaxed);

        Ok(())
    }
}
