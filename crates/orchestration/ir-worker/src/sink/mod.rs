//! Result sink implementations.
//!
//! This module provides implementations of [`ResultSink`](ir_traits::ResultSink):
//!
//! - [`S3ResultSink`]: Uploads artifacts to an S3 bucket (for production)
//! - [`DirectoryResultSink`]: Writes artifacts under a local directory
//! - [`StatsResultSink`]: Counts artifacts without storing them (for diagnostics)

mod directory;
mod s3;
mod stats;

pub use directory::DirectoryResultSink;
pub use s3::S3ResultSink;
pub use stats::{StatsReport, StatsResultSink};
