//! Archive processor trait and publication step.

use crate::sink::ResultSink;
use async_trait::async_trait;
use bytes::Bytes;
use ir_error::{Result, SinkError};
use ir_types::{Payload, ResultSet, SideData};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Pluggable archive processor.
///
/// A processor is stateless between archives. All per-archive state lives
/// in the [`ResultSet`] the caller creates for each notification and passes
/// to every step, so a processor can be shared across archives safely.
///
/// # Processing Flow
///
/// 1. [`extract`](ArchiveProcessor::extract) opens the archive and selects the payload
/// 2. [`analyze`](ArchiveProcessor::analyze) runs the analysis and appends derived artifacts
/// 3. [`collect_and_publish`](ArchiveProcessor::collect_and_publish) hands the
///    non-empty artifacts to every sink
#[async_trait]
pub trait ArchiveProcessor: Send + Sync {
    /// Processor name used in logs and error messages.
    fn name(&self) -> &str;

    /// Opens `raw` as an archive and returns its payload.
    ///
    /// Returns `Ok(None)` when the bytes cannot be opened as an archive at
    /// all; analysis is then skipped. Returns an error when the archive opens
    /// but does not contain exactly one payload file.
    fn extract(&self, raw: &Bytes, results: &mut ResultSet) -> Result<Option<Payload>>;

    /// Analyzes the payload and appends the derived artifacts to `results`.
    async fn analyze(
        &self,
        payload: Payload,
        side_data: &SideData,
        results: &mut ResultSet,
    ) -> Result<()>;

    /// Publishes the accumulated artifacts to every sink.
    ///
    /// Artifact names get `base_name` prepended and zero-length artifacts are
    /// dropped. When nothing remains no sink is called. Every sink receives
    /// the same list; a failing sink does not stop the others.
    async fn collect_and_publish(
        &self,
        results: &ResultSet,
        base_name: &str,
        sinks: &[Arc<dyn ResultSink>],
    ) -> Result<PublishOutcome> {
        let artifacts = results.collect(base_name);

        if artifacts.is_empty() {
            warn!(base_name = base_name, "No results to upload");
            return Ok(PublishOutcome::Skipped);
        }

        let bytes: u64 = artifacts.iter().map(|a| a.len() as u64).sum();
        let mut failed = Vec::new();

        for sink in sinks {
            match sink.publish(&artifacts).await {
                Ok(()) => {
                    info!(
                        sink = sink.name(),
                        base_name = base_name,
                        artifacts = artifacts.len(),
                        "Uploaded analysis results"
                    );
                }
                Err(e) => {
                    error!(
                        sink = sink.name(),
                        base_name = base_name,
                        error = %e,
                        "Failed to upload analysis results"
                    );
                    failed.push(sink.name().to_string());
                }
            }
        }

        if !failed.is_empty() {
            return Err(SinkError::Publish {
                failed: failed.len(),
                total: sinks.len(),
                sinks: failed,
            }
            .into());
        }

        Ok(PublishOutcome::Published {
            artifacts: artifacts.len(),
            bytes,
            sinks: sinks.len(),
        })
    }
}

/// Outcome of a successful publication step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Every artifact was empty; no sink was called
    Skipped,

    /// Every sink accepted the artifact list
    Published {
        artifacts: usize,
        bytes: u64,
        sinks: usize,
    },
}
