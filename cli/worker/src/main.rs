//! ir-worker CLI
//!
//! Forensic archive triage worker for ir-triage.

use clap::Parser;
use ir_cli_common::{format_bytes, format_duration, format_number, init_logging};

mod args;
mod run;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Logs go to stderr, stdout stays clean
    init_logging(args.log_level)?;

    let stats = run::execute(args).await?;

    eprintln!();
    eprintln!("Worker completed:");
    eprintln!("  Poll cycles:        {}", stats.cycles);
    eprintln!(
        "  Messages:           {} received, {} deleted",
        format_number(stats.messages_received),
        format_number(stats.messages_acked)
    );
    eprintln!(
        "  Notifications:      {} received, {} skipped",
        format_number(stats.notifications_received),
        format_number(stats.notifications_skipped)
    );
    eprintln!(
        "  Archives fetched:   {} ({})",
        format_number(stats.archives_fetched),
        format_bytes(stats.bytes_fetched)
    );
    eprintln!(
        "  Published:          {} archives, {} artifacts ({})",
        format_number(stats.notifications_published),
        format_number(stats.artifacts_published),
        format_bytes(stats.bytes_published)
    );

    if stats.notifications_empty > 0 || stats.unreadable_archives > 0 {
        eprintln!(
            "  Nothing published:  {} (unreadable archives: {})",
            stats.notifications_empty, stats.unreadable_archives
        );
    }

    if let Some(duration) = stats.duration().and_then(|d| d.to_std().ok()) {
        eprintln!("  Duration:           {}", format_duration(duration));
    }

    if stats.failures() > 0 {
        eprintln!(
            "  Failures:           {} fetch, {} extraction, {} analysis, {} publish",
            stats.fetch_failures,
            stats.extraction_failures,
            stats.analysis_failures,
            stats.publish_failures
        );
        std::process::exit(4); // Partial failure
    }

    Ok(())
}
