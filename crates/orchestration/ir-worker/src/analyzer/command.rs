//! External-command analyzer.

use async_trait::async_trait;
use bytes::Bytes;
use ir_error::{AnalysisError, Result};
use ir_traits::{AnalysisOutput, Analyzer};
use ir_types::{Payload, SideData};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

/// Placeholder replaced with the text summary output path.
pub const TEXT_OUTPUT_PLACEHOLDER: &str = "{text_output}";

/// Placeholder replaced with the HTML summary output path.
pub const HTML_OUTPUT_PLACEHOLDER: &str = "{html_output}";

/// Runs an external analysis program over each payload.
///
/// The payload is written to the program's stdin and its stdout becomes the
/// machine-readable findings. The program writes the text and HTML summaries
/// to the files substituted for [`TEXT_OUTPUT_PLACEHOLDER`] and
/// [`HTML_OUTPUT_PLACEHOLDER`] in its arguments. Each side data feed is
/// appended as `--data-feed name=path`.
///
/// A summary file the program never writes becomes an empty artifact, which
/// is dropped at publication.
#[derive(Debug, Clone)]
pub struct CommandAnalyzer {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandAnalyzer {
    /// Create an analyzer running `program` with `args`.
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// The configured program.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Resolve the full argument list for one invocation.
    fn build_args(&self, text_output: &Path, html_output: &Path, side_data: &SideData) -> Vec<String> {
        let text_output = text_output.display().to_string();
        let html_output = html_output.display().to_string();

        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| {
                arg.replace(TEXT_OUTPUT_PLACEHOLDER, &text_output)
                    .replace(HTML_OUTPUT_PLACEHOLDER, &html_output)
            })
            .collect();

        for (name, path) in side_data.iter() {
            args.push("--data-feed".to_string());
            args.push(format!("{}={}", name, path.display()));
        }

        args
    }
}

/// Read a summary file, treating a missing file as empty output.
async fn read_summary(path: &Path) -> Result<Bytes> {
    match tokio::fs::read(path).await {
        Ok(content) => Ok(Bytes::from(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Bytes::new()),
        Err(e) => Err(AnalysisError::Io(format!(
            "failed to read {}: {}",
            path.display(),
            e
        ))
        .into()),
    }
}

#[async_trait]
impl Analyzer for CommandAnalyzer {
    async fn analyze(&self, payload: &Payload, side_data: &SideData) -> Result<AnalysisOutput> {
        let workdir = tempfile::Builder::new()
            .prefix("ir-analysis-")
            .tempdir()
            .map_err(|e| AnalysisError::Io(format!("failed to create output directory: {}", e)))?;
        let text_output = workdir.path().join("summary.txt");
        let html_output = workdir.path().join("summary.html");

        let args = self.build_args(&text_output, &html_output, side_data);
        debug!(
            program = %self.program.display(),
            args = ?args,
            payload = %payload.name,
            "Launching analyzer"
        );

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AnalysisError::Launch(format!("{}: {}", self.program.display(), e))
            })?;

        // Feed stdin concurrently so a program that writes before it finishes
        // reading cannot deadlock on a full stdout pipe.
        let writer = child.stdin.take().map(|mut stdin| {
            let content = payload.content.clone();
            tokio::spawn(async move {
                let result = stdin.write_all(&content).await;
                drop(stdin);
                result
            })
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| AnalysisError::Io(format!("failed to wait for analyzer: {}", e)))?;

        if let Some(writer) = writer {
            match writer.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) if e.kind() == ErrorKind::BrokenPipe => {
                    debug!("Analyzer closed stdin before reading the whole payload");
                }
                Ok(Err(e)) => {
                    return Err(AnalysisError::Io(format!("failed to write payload: {}", e)).into())
                }
                Err(e) => {
                    return Err(AnalysisError::Io(format!("payload writer failed: {}", e)).into())
                }
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AnalysisError::Failed(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            ))
            .into());
        }

        let analysis = AnalysisOutput::new(
            output.stdout,
            read_summary(&text_output).await?,
            read_summary(&html_output).await?,
        );

        info!(
            payload = %payload.name,
            findings_bytes = analysis.findings.len(),
            text_bytes = analysis.text_summary.len(),
            html_bytes = analysis.html_summary.len(),
            "Analysis finished"
        );

        Ok(analysis)
    }
}
