//! OSXCollector output processor.

use super::archive::{scan_tar_gz, ArchiveScan};
use async_trait::async_trait;
use bytes::Bytes;
use ir_error::{ExtractionError, Result};
use ir_traits::{Analyzer, ArchiveProcessor};
use ir_types::{content_type, suffix, Payload, ResultArtifact, ResultSet, SideData};
use std::sync::Arc;
use tracing::{debug, info};

/// Suffix of the payload entry inside an OSXCollector archive.
const PAYLOAD_SUFFIX: &str = ".json";

/// Processor for OSXCollector output archives.
///
/// Each archive must hold exactly one `.json` entry, which is handed to the
/// configured [`Analyzer`]. The analyzer's three outputs become the
/// `_analysis.json`, `_summary.txt` and `_summary.html` artifacts.
pub struct OsxCollectorProcessor {
    analyzer: Arc<dyn Analyzer>,
}

impl OsxCollectorProcessor {
    /// Create a processor that analyzes payloads with `analyzer`.
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        Self { analyzer }
    }
}

#[async_trait]
impl ArchiveProcessor for OsxCollectorProcessor {
    fn name(&self) -> &str {
        "OSXCollector"
    }

    fn extract(&self, raw: &Bytes, results: &mut ResultSet) -> Result<Option<Payload>> {
        results.push(ResultArtifact::new(
            suffix::RAW_ARCHIVE,
            raw.clone(),
            content_type::GZIP,
        ));

        let mut matched = match scan_tar_gz(raw, PAYLOAD_SUFFIX)? {
            ArchiveScan::Unreadable(reason) => {
                debug!(reason = %reason, "Archive is not a readable tar.gz");
                return Ok(None);
            }
            ArchiveScan::Entries { matched, .. } => matched,
        };

        if matched.len() != 1 {
            return Err(ExtractionError::UnexpectedPayloadCount {
                processor: self.name().to_string(),
                label: "JSON".to_string(),
                expected: 1,
                found: matched.len(),
            }
            .into());
        }

        let entry = matched.remove(0);
        info!(entry = %entry.name, "Extracted OSXCollector output JSON file");

        Ok(Some(Payload::new(entry.name, entry.content)))
    }

    async fn analyze(
        &self,
        payload: Payload,
        side_data: &SideData,
        results: &mut ResultSet,
    ) -> Result<()> {
        let output = self.analyzer.analyze(&payload, side_data).await?;

        results.push(ResultArtifact::new(
            suffix::ANALYSIS,
            output.findings,
            content_type::JSON,
        ));
        results.push(ResultArtifact::new(
            suffix::TEXT_SUMMARY,
            output.text_summary,
            content_type::TEXT,
        ));
        results.push(ResultArtifact::new(
            suffix::HTML_SUMMARY,
            output.html_summary,
            content_type::HTML,
        ));

        Ok(())
    }
}
