//! Local directory result sink.

use async_trait::async_trait;
use ir_error::{Result, SinkError};
use ir_traits::ResultSink;
use ir_types::ResultArtifact;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Writes each artifact to `<root>/<artifact name>`.
///
/// Artifact names containing `/` create subdirectories. Names that would
/// escape the root (absolute paths, `..`) are rejected.
pub struct DirectoryResultSink {
    root: PathBuf,
    name: String,
}

impl DirectoryResultSink {
    /// Create a sink writing under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            name: format!("dir://{}", root.display()),
            root,
        }
    }

    /// The output directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn target_path(&self, artifact: &ResultArtifact) -> Result<PathBuf> {
        let relative = Path::new(&artifact.name);
        let contained = !artifact.name.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !contained {
            return Err(SinkError::Write {
                destination: self.name.clone(),
                artifact: artifact.name.clone(),
                reason: "artifact name must be a relative path".to_string(),
            }
            .into());
        }

        Ok(self.root.join(relative))
    }

    fn write_error(&self, artifact: &ResultArtifact, e: std::io::Error) -> SinkError {
        SinkError::Write {
            destination: self.name.clone(),
            artifact: artifact.name.clone(),
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl ResultSink for DirectoryResultSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&self, artifacts: &[ResultArtifact]) -> Result<()> {
        for artifact in artifacts {
            let path = self.target_path(artifact)?;

            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| self.write_error(artifact, e))?;
            }

            tokio::fs::write(&path, &artifact.content)
                .await
                .map_err(|e| self.write_error(artifact, e))?;

            debug!(
                path = %path.display(),
                content_type = %artifact.content_type,
                size = artifact.len(),
                "Wrote artifact"
            );
        }

        info!(
            root = %self.root.display(),
            count = artifacts.len(),
            "Wrote analysis results"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ir_error::IrError;
    use ir_types::content_type;

    #[tokio::test]
    async fn test_directory_sink_writes_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectoryResultSink::new(dir.path());

        let artifacts = vec![
            ResultArtifact::new("AMIRA-301_summary.txt", "summary", content_type::TEXT),
            ResultArtifact::new("cases/AMIRA-302_analysis.json", "{}", content_type::JSON),
        ];
        sink.publish(&artifacts).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("AMIRA-301_summary.txt")).unwrap(),
            "summary"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("cases/AMIRA-302_analysis.json")).unwrap(),
            "{}"
        );
    }

    #[tokio::test]
    async fn test_directory_sink_rejects_escaping_names() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectoryResultSink::new(dir.path().join("out"));

        for name in ["../escape.txt", "/etc/escape.txt", ""] {
            let artifacts = vec![ResultArtifact::new(name, "x", content_type::TEXT)];
            let error = sink.publish(&artifacts).await.unwrap_err();
            assert!(matches!(error, IrError::Sink(SinkError::Write { .. })), "{}", name);
        }
    }

    #[test]
    fn test_directory_sink_name() {
        let sink = DirectoryResultSink::new("/var/lib/ir/results");
        assert_eq!(sink.name(), "dir:///var/lib/ir/results");
    }
}
