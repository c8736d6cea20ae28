//! Main execution logic for ir-worker CLI.

use anyhow::Result;
use ir_traits::NotificationQueue;
use ir_worker::{
    CommandAnalyzer, DirectoryResultSink, OsxCollectorProcessor, S3ObjectStore, S3ResultSink,
    SqsSource, SqsSourceConfig, StatsResultSink, StatsSnapshot, StdinSource, Worker, WorkerConfig,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::args::{Cli, InputType};

/// Build the worker configuration from the command line.
fn worker_config(args: &Cli) -> Result<WorkerConfig> {
    let mut config = WorkerConfig::new()
        .with_run_mode(args.mode.into())
        .with_poll_interval(Duration::from_secs(args.poll_interval))
        .with_region(&args.region);

    if let Some(max_cycles) = args.max_cycles {
        config = config.with_max_cycles(max_cycles);
    }
    if let Some(ref endpoint) = args.s3_endpoint {
        config = config.with_s3_endpoint(endpoint);
    }
    if let Some(ref endpoint) = args.sqs_endpoint {
        config = config.with_sqs_endpoint(endpoint);
    }

    config.validate()?;
    Ok(config)
}

/// Create the notification source selected on the command line.
async fn create_queue(args: &Cli, config: &WorkerConfig) -> Result<Arc<dyn NotificationQueue>> {
    match args.input {
        InputType::Stdin => Ok(Arc::new(StdinSource::new())),
        InputType::Sqs => {
            let queue_name = args
                .queue_name
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--queue-name is required when input=sqs"))?;

            let mut sqs_config =
                SqsSourceConfig::new(queue_name).with_wait_time(args.sqs_wait_time);
            if let Some(timeout) = args.sqs_visibility_timeout {
                sqs_config = sqs_config.with_visibility_timeout(timeout);
            }

            let source = match config.sqs_endpoint.as_deref() {
                Some(endpoint) => {
                    SqsSource::from_config_with_endpoint(sqs_config, endpoint, &config.region)
                        .await?
                }
                None => SqsSource::from_config(sqs_config, &config.region).await?,
            };
            Ok(Arc::new(source))
        }
    }
}

/// Execute the worker with the provided arguments.
pub async fn execute(args: Cli) -> Result<StatsSnapshot> {
    let config = worker_config(&args)?;

    if args.result_buckets.is_empty() && args.output_dir.is_none() && !args.stats_sink {
        anyhow::bail!("at least one of --result-bucket, --output-dir or --stats-sink is required");
    }

    let queue = create_queue(&args, &config).await?;
    let store = S3ObjectStore::from_region(&config.region, config.s3_endpoint.as_deref()).await;

    let analyzer = CommandAnalyzer::new(&args.analyzer_command, args.analyzer_args.clone());
    let processor = OsxCollectorProcessor::new(Arc::new(analyzer));

    let mut worker = Worker::new(config, queue, Arc::new(store.clone()), Arc::new(processor))
        .with_side_data(args.side_data());

    for bucket in &args.result_buckets {
        worker.register_sink(Arc::new(S3ResultSink::new(store.client().clone(), bucket)));
    }

    if let Some(ref dir) = args.output_dir {
        worker.register_sink(Arc::new(DirectoryResultSink::new(dir)));
    }

    let stats_sink = args.stats_sink.then(|| Arc::new(StatsResultSink::new()));
    if let Some(ref sink) = stats_sink {
        worker.register_sink(sink.clone());
    }

    let stats = worker.run().await?;

    if let Some(sink) = stats_sink {
        let report = sink.get_stats();
        info!(
            calls = report.calls,
            artifacts = report.artifacts,
            bytes = report.bytes,
            "Stats sink totals"
        );
    }

    Ok(stats)
}
