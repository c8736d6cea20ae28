//! CLI argument definitions for ir-worker.

use clap::{Parser, ValueEnum};
pub use ir_cli_common::LogLevel;
use ir_types::SideData;
use ir_worker::RunMode;
use std::path::PathBuf;

mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// Get the version string with build metadata.
fn version_string() -> &'static str {
    // Leaked once for --version
    let version = env!("CARGO_PKG_VERSION");
    let commit = built_info::GIT_COMMIT_HASH_SHORT.unwrap_or("unknown");
    let date = built_info::BUILT_TIME_UTC;
    let s = format!("{version} ({commit} {date})");
    Box::leak(s.into_boxed_str())
}

/// Forensic archive triage worker for ir-triage.
///
/// Receives S3 object-created notifications (SQS or stdin), fetches each
/// `.tar.gz` archive, runs the analysis program over its single JSON payload
/// and publishes the raw archive plus the analysis results to every sink.
///
/// ## Examples
///
/// Production with SQS, results to an S3 bucket:
///   ir-worker -q osxcollector-events -b amira-results --analyzer-command osxcollector-analyze
///
/// Local run against LocalStack, draining the queue:
///   ir-worker -q events --sqs-endpoint http://localhost:4566 --s3-endpoint http://localhost:4566 -m drain -o ./results
///
/// Ad-hoc analysis of one archive:
///   echo s3://forensics/AMIRA-301.tar.gz | ir-worker -i stdin -o ./results --analyzer-command ./analyze.sh
#[derive(Parser, Debug)]
#[command(name = "ir-worker")]
#[command(version = version_string(), about, long_about = None)]
pub struct Cli {
    // === Input Source ===
    /// Input source type
    #[arg(short = 'i', long, value_enum, default_value = "sqs")]
    pub input: InputType,

    /// SQS queue name (required when input=sqs)
    #[arg(short = 'q', long, env = "IR_SQS_QUEUE_NAME")]
    pub queue_name: Option<String>,

    /// Custom SQS endpoint URL (for LocalStack)
    #[arg(long, env = "IR_SQS_ENDPOINT")]
    pub sqs_endpoint: Option<String>,

    /// SQS long-poll wait time in seconds (0-20)
    #[arg(long, default_value = "0", value_parser = parse_sqs_wait_time)]
    pub sqs_wait_time: i32,

    /// SQS visibility timeout in seconds (queue default when unset)
    #[arg(long)]
    pub sqs_visibility_timeout: Option<i32>,

    // === Sinks ===
    /// Upload results to this S3 bucket (repeatable)
    #[arg(short = 'b', long = "result-bucket", env = "IR_RESULT_BUCKET", value_delimiter = ',')]
    pub result_buckets: Vec<String>,

    /// Write results under this local directory
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// Count published artifacts and report them on exit
    #[arg(long)]
    pub stats_sink: bool,

    // === Analysis ===
    /// Analysis program; reads the payload on stdin and writes findings to stdout
    #[arg(long, env = "IR_ANALYZER_COMMAND")]
    pub analyzer_command: PathBuf,

    /// Argument passed to the analysis program (repeatable).
    ///
    /// `{text_output}` and `{html_output}` are replaced with the paths the
    /// program should write its text and HTML summaries to.
    #[arg(long = "analyzer-arg", allow_hyphen_values = true)]
    pub analyzer_args: Vec<String>,

    /// Data feed forwarded to the analysis program as name=path (repeatable)
    #[arg(long = "data-feed", value_parser = parse_data_feed)]
    pub data_feeds: Vec<(String, PathBuf)>,

    // === Run Mode ===
    /// How many poll cycles to run
    #[arg(short = 'm', long, value_enum, default_value = "once")]
    pub mode: ModeArg,

    /// Seconds to sleep after an empty poll in continuous mode
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval: u64,

    /// Stop after this many poll cycles
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_cycles: Option<u64>,

    // === AWS Configuration ===
    /// AWS region
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Custom S3 endpoint URL (for LocalStack)
    #[arg(long, env = "IR_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    // === Logging ===
    /// Log level
    #[arg(short = 'l', long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Cli {
    /// Data feeds as passed to every analysis.
    pub fn side_data(&self) -> SideData {
        self.data_feeds.iter().cloned().collect()
    }
}

/// Input source type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputType {
    /// Read S3 event messages or s3:// URIs from stdin, one per line
    Stdin,
    /// Receive S3 event notifications from an SQS queue
    Sqs,
}

/// Run mode argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// A single poll cycle
    Once,
    /// Poll until the queue returns no messages
    Drain,
    /// Poll until interrupted
    Continuous,
}

impl From<ModeArg> for RunMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Once => RunMode::Once,
            ModeArg::Drain => RunMode::Drain,
            ModeArg::Continuous => RunMode::Continuous,
        }
    }
}

/// Parse SQS wait time (0-20 seconds).
fn parse_sqs_wait_time(s: &str) -> Result<i32, String> {
    let value: i32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(0..=20).contains(&value) {
        return Err(format!("{} is not in 0..=20", value));
    }
    Ok(value)
}

/// Parse a `name=path` data feed.
fn parse_data_feed(s: &str) -> Result<(String, PathBuf), String> {
    SideData::parse_feed(s)
}
