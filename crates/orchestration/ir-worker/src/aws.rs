//! Shared AWS client setup.

use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Load the shared AWS configuration for `region`, optionally pointed at a
/// custom endpoint (LocalStack).
pub async fn load_config(region: &str, endpoint: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));

    if let Some(endpoint_url) = endpoint {
        loader = loader.endpoint_url(endpoint_url);
    }

    loader.load().await
}

/// Create an S3 client for `region`.
///
/// Path-style addressing is enabled when a custom endpoint is set, since
/// LocalStack does not serve virtual-hosted buckets.
pub async fn s3_client(region: &str, endpoint: Option<&str>) -> aws_sdk_s3::Client {
    let aws_config = load_config(region, endpoint).await;
    let builder = aws_sdk_s3::config::Builder::from(&aws_config);

    let s3_config = if endpoint.is_some() {
        builder.force_path_style(true).build()
    } else {
        builder.build()
    };

    aws_sdk_s3::Client::from_conf(s3_config)
}
