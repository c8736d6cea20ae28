//! Result sink trait.

use async_trait::async_trait;
use ir_error::Result;
use ir_types::ResultArtifact;

/// A destination that persists result artifacts.
///
/// # Implementations
///
/// - S3 sink: one object per artifact, content type set on upload
/// - Directory sink: one file per artifact under a local directory
/// - Stats sink: counts artifacts and bytes without storing them
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Human-readable destination identifier used in logs.
    fn name(&self) -> &str;

    /// Persists every artifact under its name with its content type.
    ///
    /// Publication is not atomic: an error may leave earlier artifacts of
    /// the list persisted.
    async fn publish(&self, artifacts: &[ResultArtifact]) -> Result<()>;
}
