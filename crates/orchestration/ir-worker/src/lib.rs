//! ir-worker - Forensic archive triage worker for ir-triage.
//!
//! This crate turns object-created notifications into published analysis
//! results. It supports:
//!
//! - Dual input mode: SQS for production, stdin for local runs
//! - Pluggable archive processors (OSXCollector output by default)
//! - An external analysis program fed through stdin
//! - Pluggable result sinks: S3 bucket, local directory, stats
//! - Once, drain and continuous run modes
//!
//! # Example
//!
//! ```ignore
//! use ir_worker::{
//!     CommandAnalyzer, OsxCollectorProcessor, S3ObjectStore, S3ResultSink, SqsSource,
//!     SqsSourceConfig, Worker, WorkerConfig,
//! };
//! use std::sync::Arc;
//!
//! let config = WorkerConfig::new().with_region("us-west-1");
//! let queue = SqsSource::from_config(SqsSourceConfig::new("osxcollector-events"), &config.region).await?;
//! let store = S3ObjectStore::from_region(&config.region, None).await;
//! let analyzer = CommandAnalyzer::new("osxcollector-analyze", vec![]);
//! let processor = OsxCollectorProcessor::new(Arc::new(analyzer));
//!
//! let mut worker = Worker::new(config, Arc::new(queue), Arc::new(store.clone()), Arc::new(processor));
//! worker.register_sink(Arc::new(S3ResultSink::new(store.client().clone(), "amira-results")));
//!
//! let stats = worker.run().await?;
//! eprintln!("Published {} archives", stats.notifications_published);
//! ```

pub mod analyzer;
pub mod aws;
pub mod config;
pub mod processor;
pub mod sink;
pub mod source;
pub mod stats;
pub mod store;
pub mod worker;

pub use analyzer::CommandAnalyzer;
pub use config::{RunMode, WorkerConfig};
pub use processor::{scan_tar_gz, ArchiveScan, OsxCollectorProcessor};
pub use sink::{DirectoryResultSink, S3ResultSink, StatsResultSink};
pub use source::{SqsSource, SqsSourceConfig, StdinSource};
pub use stats::{StatsSnapshot, WorkerStats};
pub use store::S3ObjectStore;
pub use worker::{CycleReport, Worker};
