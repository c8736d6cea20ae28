//! S3 result sink.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use ir_error::{Result, SinkError};
use ir_traits::ResultSink;
use ir_types::ResultArtifact;
use tracing::info;

/// Uploads each artifact as an object in a results bucket.
///
/// Objects are stored under the artifact name verbatim with the artifact's
/// content type. Upload stops at the first failing artifact; objects already
/// written stay in place.
#[derive(Clone)]
pub struct S3ResultSink {
    client: Client,
    bucket: String,
    name: String,
}

impl S3ResultSink {
    /// Create a sink uploading to `bucket` with an existing client.
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        let bucket = bucket.into();
        info!(bucket = %bucket, "Configured S3 results bucket");
        Self {
            name: format!("s3://{}", bucket),
            client,
            bucket,
        }
    }

    /// The target bucket.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ResultSink for S3ResultSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&self, artifacts: &[ResultArtifact]) -> Result<()> {
        for artifact in artifacts {
            info!(
                artifact = %artifact.name,
                bucket = %self.bucket,
                "Uploading the analysis results"
            );

            self.client
                .put_object()
                .bucket(&self.bucket)
                .key(&artifact.name)
                .content_type(&artifact.content_type)
                .body(ByteStream::from(artifact.content.clone()))
                .send()
                .await
                .map_err(|e| SinkError::Write {
                    destination: self.name.clone(),
                    artifact: artifact.name.clone(),
                    reason: e.to_string(),
                })?;
        }

        Ok(())
    }
}
