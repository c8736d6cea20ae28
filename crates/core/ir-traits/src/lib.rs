//! Core traits for ir-triage.
//!
//! This crate defines the main abstractions for the pipeline:
//! - [`NotificationQueue`] - Two-phase receive/ack source of object-created notifications
//! - [`ObjectFetcher`] - Retrieves raw archive bytes from an object store
//! - [`ArchiveProcessor`] - Extracts, analyzes and publishes one archive
//! - [`Analyzer`] - The external analysis capability a processor invokes
//! - [`ResultSink`] - Persists a list of result artifacts

pub mod analyzer;
pub mod processor;
pub mod queue;
pub mod sink;
pub mod store;

pub use analyzer::*;
pub use processor::*;
pub use queue::*;
pub use sink::*;
pub use store::*;
