//! Shared utilities for ir-triage CLI binaries.
//!
//! Log level parsing, logging setup and human-readable number formatting
//! used by the `ir-worker` binary.

pub mod args;
pub mod format;
pub mod logging;

pub use args::LogLevel;
pub use format::{format_bytes, format_duration, format_number};
pub use logging::init_logging;
