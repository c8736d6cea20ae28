//! Object store implementations.
//!
//! - [`S3ObjectStore`]: Downloads archives from AWS S3 (or LocalStack)

mod s3;

pub use s3::S3ObjectStore;
