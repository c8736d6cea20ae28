//! Error types for the ir-triage pipeline.
//!
//! This crate provides:
//! - [`IrError`] - Top-level error enum for all pipeline errors
//! - Domain-specific errors ([`QueueError`], [`StoreError`], [`ExtractionError`],
//!   [`AnalysisError`], [`SinkError`])
//! - [`ProcessingStage`] for attributing per-notification failures

use thiserror::Error;

/// Top-level error type for ir-triage.
#[derive(Error, Debug)]
pub enum IrError {
    /// Queue-related errors (lookup, receive, delete)
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    /// Object store errors (fetch)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Archive extraction errors
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Analysis errors
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Result sink errors
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (wrapped anyhow)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Queue-related errors.
#[derive(Error, Debug)]
pub enum QueueError {
    /// The target queue could not be resolved at construction time
    #[error("SQS queue {0} not found.")]
    NotFound(String),

    /// Failed to connect to queue backend
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Failed to receive messages
    #[error("Receive failed: {0}")]
    Receive(String),

    /// Failed to delete (acknowledge) messages
    #[error("Ack failed: {0}")]
    Ack(String),

    /// Message body could not be parsed
    #[error("Deserialization failed: {0}")]
    Deserialize(String),
}

/// Object store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Object does not exist
    #[error("Object not found: s3://{bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// Transport or service failure
    #[error("Failed to fetch s3://{bucket}/{key}: {reason}")]
    Fetch {
        bucket: String,
        key: String,
        reason: String,
    },
}

/// Archive extraction errors.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The archive opened but did not hold exactly the expected number of payload files
    #[error(
        "Expected {expected} {label} file inside the {processor} output archive, but found {found} instead."
    )]
    UnexpectedPayloadCount {
        processor: String,
        label: String,
        expected: usize,
        found: usize,
    },

    /// The archive became unreadable after its first entry
    #[error("Corrupt archive: {0}")]
    Corrupt(String),
}

/// Analysis errors.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The analysis capability could not be started
    #[error("Failed to launch analyzer: {0}")]
    Launch(String),

    /// The analysis ran and reported failure
    #[error("Analysis failed: {0}")]
    Failed(String),

    /// I/O error while exchanging data with the analysis capability
    #[error("I/O error: {0}")]
    Io(String),
}

/// Result sink errors.
#[derive(Error, Debug)]
pub enum SinkError {
    /// A single artifact could not be persisted
    #[error("Failed to write '{artifact}' to {destination}: {reason}")]
    Write {
        destination: String,
        artifact: String,
        reason: String,
    },

    /// One or more sinks failed while the rest received the artifacts
    #[error("{failed} of {total} sink(s) failed: {}", .sinks.join(", "))]
    Publish {
        failed: usize,
        total: usize,
        sinks: Vec<String>,
    },
}

/// Processing stage for error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessingStage {
    /// Checking the key suffix
    Filter,

    /// Downloading the archive from the object store
    Fetch,

    /// Opening the archive and selecting the payload
    Extract,

    /// Running the analysis capability
    Analyze,

    /// Handing artifacts to the sinks
    Publish,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Filter => write!(f, "Filter"),
            Self::Fetch => write!(f, "Fetch"),
            Self::Extract => write!(f, "Extract"),
            Self::Analyze => write!(f, "Analyze"),
            Self::Publish => write!(f, "Publish"),
        }
    }
}

impl IrError {
    /// The stage this error most naturally belongs to.
    ///
    /// Queue and configuration errors have no per-notification stage.
    pub fn stage(&self) -> Option<ProcessingStage> {
        match self {
            IrError::Store(_) => Some(ProcessingStage::Fetch),
            IrError::Extraction(_) => Some(ProcessingStage::Extract),
            IrError::Analysis(_) => Some(ProcessingStage::Analyze),
            IrError::Sink(_) => Some(ProcessingStage::Publish),
            IrError::Queue(_) | IrError::Config(_) | IrError::Other(_) => None,
        }
    }
}

/// Result type alias using IrError.
pub type Result<T> = std::result::Result<T, IrError>;
