//! Object store trait.

use async_trait::async_trait;
use bytes::Bytes;
use ir_error::Result;

/// Fetches the raw bytes of a named object from a named bucket.
///
/// No retry and no caching: a missing object or a transport failure is
/// returned to the caller as an error.
#[async_trait]
pub trait ObjectFetcher: Send + Sync {
    /// Downloads the whole object into memory.
    async fn fetch(&self, bucket: &str, key: &str) -> Result<Bytes>;
}
