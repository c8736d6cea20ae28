//! Archive processor implementations.
//!
//! - [`OsxCollectorProcessor`]: OSXCollector `.tar.gz` output with a single JSON payload
//!
//! [`scan_tar_gz`] is shared by processors that select payload entries by suffix.

pub(crate) mod archive;
mod osxcollector;

pub use archive::{scan_tar_gz, ArchiveScan, MatchedEntry};
pub use osxcollector::OsxCollectorProcessor;
