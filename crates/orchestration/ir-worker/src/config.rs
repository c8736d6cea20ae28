//! Configuration types for the worker.

use ir_error::{IrError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How many poll cycles a worker runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// A single poll cycle; an external scheduler invokes the worker periodically
    Once,

    /// Poll until a cycle retrieves no messages
    Drain,

    /// Poll forever, sleeping `poll_interval` between empty cycles
    Continuous,
}

/// Configuration for a worker instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Number of poll cycles to run
    pub run_mode: RunMode,

    /// Sleep between cycles that retrieved nothing (continuous mode)
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,

    /// Upper bound on poll cycles regardless of mode
    pub max_cycles: Option<u64>,

    /// AWS region for S3/SQS
    pub region: String,

    /// Custom S3 endpoint URL (for LocalStack)
    pub s3_endpoint: Option<String>,

    /// Custom SQS endpoint URL (for LocalStack)
    pub sqs_endpoint: Option<String>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            run_mode: RunMode::Once,
            poll_interval: Duration::from_secs(30),
            max_cycles: None,
            region: "us-east-1".to_string(),
            s3_endpoint: None,
            sqs_endpoint: None,
        }
    }
}

impl WorkerConfig {
    /// Create a new worker configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the run mode.
    pub fn with_run_mode(mut self, mode: RunMode) -> Self {
        self.run_mode = mode;
        self
    }

    /// Set the sleep between empty cycles.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Bound the number of poll cycles.
    pub fn with_max_cycles(mut self, cycles: u64) -> Self {
        self.max_cycles = Some(cycles);
        self
    }

    /// Set the AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set a custom S3 endpoint URL.
    pub fn with_s3_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.s3_endpoint = Some(endpoint.into());
        self
    }

    /// Set a custom SQS endpoint URL.
    pub fn with_sqs_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.sqs_endpoint = Some(endpoint.into());
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.region.trim().is_empty() {
            return Err(IrError::Config("region must not be empty".to_string()));
        }
        if self.max_cycles == Some(0) {
            return Err(IrError::Config("max_cycles must be at least 1".to_string()));
        }
        if self.run_mode == RunMode::Continuous && self.poll_interval.is_zero() {
            return Err(IrError::Config(
                "poll_interval must be non-zero in continuous mode".to_string(),
            ));
        }
        Ok(())
    }
}

/// Serde helper for Duration serialization.
mod humantime_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
