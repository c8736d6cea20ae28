//! External analysis capability.

use async_trait::async_trait;
use bytes::Bytes;
use ir_error::Result;
use ir_types::{Payload, SideData};

/// The analysis algorithm a processor delegates to.
///
/// The pipeline treats it as a black box: a payload goes in, three buffered
/// outputs come out.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Runs the analysis over `payload`.
    ///
    /// # Arguments
    ///
    /// * `payload` - The extracted payload file
    /// * `side_data` - Auxiliary feeds (may be empty)
    async fn analyze(&self, payload: &Payload, side_data: &SideData) -> Result<AnalysisOutput>;
}

/// Buffered outputs of one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisOutput {
    /// Machine-readable findings
    pub findings: Bytes,

    /// Human-readable text summary
    pub text_summary: Bytes,

    /// Human-readable rich-text (HTML) summary
    pub html_summary: Bytes,
}

impl AnalysisOutput {
    /// Creates a new analysis output.
    pub fn new(
        findings: impl Into<Bytes>,
        text_summary: impl Into<Bytes>,
        html_summary: impl Into<Bytes>,
    ) -> Self {
        Self {
            findings: findings.into(),
            text_summary: text_summary.into(),
            html_summary: html_summary.into(),
        }
    }

    /// Total size of all outputs in bytes.
    pub fn total_bytes(&self) -> usize {
        self.findings.len() + self.text_summary.len() + self.html_summary.len()
    }
}
