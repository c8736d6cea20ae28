//! End-to-end worker tests using LocalStack.

use crate::common::{event_message, osxcollector_archive, unique_name, LocalStackTestContext};
use ir_worker::{
    CommandAnalyzer, OsxCollectorProcessor, S3ObjectStore, S3ResultSink, SqsSource,
    SqsSourceConfig, Worker, WorkerConfig,
};
use std::sync::Arc;

/// Analyzer echoing the payload as findings and writing fixed summaries.
fn echo_analyzer() -> CommandAnalyzer {
    CommandAnalyzer::new(
        "sh",
        vec![
            "-c".to_string(),
            r#"cat; printf 'summary' > "$0"; printf '<p>summary</p>' > "$1""#.to_string(),
            "{text_output}".to_string(),
            "{html_output}".to_string(),
        ],
    )
}

#[cfg(unix)]
#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_worker_publishes_results_to_s3() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let input_bucket = unique_name("ir-input");
    let results_bucket = unique_name("ir-results");
    let queue_name = unique_name("ir-events");
    ctx.create_bucket(&input_bucket).await.unwrap();
    ctx.create_bucket(&results_bucket).await.unwrap();
    let queue_url = ctx.create_queue(&queue_name).await.unwrap();

    for case in ["AMIRA-301", "AMIRA-302"] {
        ctx.put_object(
            &input_bucket,
            &format!("{}.tar.gz", case),
            osxcollector_archive(case),
            "application/gzip",
        )
        .await
        .unwrap();
    }
    ctx.put_object(&input_bucket, "readme.txt", b"hello".to_vec(), "text/plain")
        .await
        .unwrap();

    ctx.send_message(
        &queue_url,
        &event_message(
            &input_bucket,
            &["AMIRA-301.tar.gz", "readme.txt", "AMIRA-302.tar.gz"],
        ),
    )
    .await
    .unwrap();

    let config = WorkerConfig::new()
        .with_region(&ctx.region)
        .with_s3_endpoint(&ctx.endpoint)
        .with_sqs_endpoint(&ctx.endpoint);

    let queue = SqsSource::from_config_with_endpoint(
        SqsSourceConfig::new(&queue_name).with_wait_time(1),
        &ctx.endpoint,
        &ctx.region,
    )
    .await
    .unwrap();
    let store = S3ObjectStore::new(ctx.s3.clone());
    let processor = OsxCollectorProcessor::new(Arc::new(echo_analyzer()));

    let mut worker = Worker::new(config, Arc::new(queue), Arc::new(store), Arc::new(processor));
    worker.register_sink(Arc::new(S3ResultSink::new(ctx.s3.clone(), &results_bucket)));

    let stats = worker.run().await.unwrap();

    assert_eq!(stats.notifications_received, 3);
    assert_eq!(stats.notifications_skipped, 1);
    assert_eq!(stats.notifications_published, 2);
    assert_eq!(stats.failures(), 0);

    let keys = ctx.list_keys(&results_bucket, "AMIRA-30").await.unwrap();
    assert_eq!(
        keys,
        vec![
            "AMIRA-301.tar.gz",
            "AMIRA-301_analysis.json",
            "AMIRA-301_summary.html",
            "AMIRA-301_summary.txt",
            "AMIRA-302.tar.gz",
            "AMIRA-302_analysis.json",
            "AMIRA-302_summary.html",
            "AMIRA-302_summary.txt",
        ]
    );

    let (findings, content_type) = ctx
        .get_object(&results_bucket, "AMIRA-302_analysis.json")
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&findings).contains("AMIRA-302"));
    assert_eq!(content_type.as_deref(), Some("application/json"));

    let (_, content_type) = ctx
        .get_object(&results_bucket, "AMIRA-301_summary.html")
        .await
        .unwrap();
    assert_eq!(content_type.as_deref(), Some("text/html; charset=UTF-8"));

    let (raw, _) = ctx
        .get_object(&results_bucket, "AMIRA-301.tar.gz")
        .await
        .unwrap();
    assert_eq!(raw, osxcollector_archive("AMIRA-301"));

    assert_eq!(ctx.queue_depth(&queue_url).await.unwrap(), 0);
    ctx.delete_queue(&queue_url).await.ok();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_missing_object_is_isolated() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let input_bucket = unique_name("ir-input");
    let queue_name = unique_name("ir-events");
    ctx.create_bucket(&input_bucket).await.unwrap();
    let queue_url = ctx.create_queue(&queue_name).await.unwrap();

    ctx.send_message(&queue_url, &event_message(&input_bucket, &["gone.tar.gz"]))
        .await
        .unwrap();

    let queue = SqsSource::from_config_with_endpoint(
        SqsSourceConfig::new(&queue_name).with_wait_time(1),
        &ctx.endpoint,
        &ctx.region,
    )
    .await
    .unwrap();
    let processor = OsxCollectorProcessor::new(Arc::new(echo_analyzer()));

    let worker = Worker::new(
        WorkerConfig::new().with_region(&ctx.region),
        Arc::new(queue),
        Arc::new(S3ObjectStore::new(ctx.s3.clone())),
        Arc::new(processor),
    );

    let stats = worker.run().await.unwrap();

    assert_eq!(stats.fetch_failures, 1);
    assert_eq!(stats.messages_acked, 1);
    assert_eq!(ctx.queue_depth(&queue_url).await.unwrap(), 0);

    ctx.delete_queue(&queue_url).await.ok();
}
