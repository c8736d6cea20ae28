//! S3 object fetcher.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use bytes::Bytes;
use ir_error::{Result, StoreError};
use ir_traits::ObjectFetcher;
use tracing::debug;

/// Fetches whole objects from S3 into memory.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Wrap an existing S3 client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a store for `region`, optionally against a custom endpoint.
    pub async fn from_region(region: &str, endpoint: Option<&str>) -> Self {
        Self::new(crate::aws::s3_client(region, endpoint).await)
    }

    /// The underlying S3 client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl ObjectFetcher for S3ObjectStore {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<Bytes> {
        debug!(bucket = bucket, key = key, "Downloading object from S3");

        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let missing = e
                    .as_service_error()
                    .map(|se| se.is_no_such_key())
                    .unwrap_or(false);
                if missing {
                    StoreError::NotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    }
                } else {
                    StoreError::Fetch {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let body = output.body.collect().await.map_err(|e| StoreError::Fetch {
            bucket: bucket.to_string(),
            key: key.to_string(),
            reason: format!("failed to read body: {}", e),
        })?;

        let bytes = body.into_bytes();
        debug!(bucket = bucket, key = key, size = bytes.len(), "Downloaded object");
        Ok(bytes)
    }
}
