//! Analyzer implementations.
//!
//! - [`CommandAnalyzer`]: Runs an external analysis program over each payload

mod command;

pub use command::{CommandAnalyzer, HTML_OUTPUT_PLACEHOLDER, TEXT_OUTPUT_PLACEHOLDER};
