//! SQS integration tests using LocalStack.
//!
//! These tests verify that the SqsSource implementation works correctly
//! with a real SQS queue (via LocalStack).

use crate::common::{event_message, unique_name, LocalStackTestContext};
use ir_error::{IrError, QueueError};
use ir_traits::NotificationQueue;
use ir_types::Notification;
use ir_worker::{SqsSource, SqsSourceConfig};

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_sqs_source_receive_and_ack() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let queue_name = unique_name("ir-receive");
    let queue_url = ctx.create_queue(&queue_name).await.unwrap();

    ctx.send_message(
        &queue_url,
        &event_message("amira-test", &["AMIRA-301.tar.gz", "cases/AMIRA+302.tar.gz"]),
    )
    .await
    .unwrap();
    ctx.send_message(&queue_url, r#"{"Service":"Amazon S3","Event":"s3:TestEvent"}"#)
        .await
        .unwrap();

    let config = SqsSourceConfig::new(&queue_name).with_wait_time(1);
    let source = SqsSource::from_config_with_endpoint(config, &ctx.endpoint, &ctx.region)
        .await
        .unwrap();
    assert_eq!(source.queue_url(), queue_url);

    let batch = source.receive().await.unwrap().unwrap();

    assert_eq!(batch.message_count(), 2);
    let mut notifications = batch.notifications.clone();
    notifications.sort_by(|a, b| a.key_name.cmp(&b.key_name));
    assert_eq!(
        notifications,
        vec![
            Notification::new("amira-test", "AMIRA-301.tar.gz"),
            Notification::new("amira-test", "cases/AMIRA 302.tar.gz"),
        ]
    );

    source.ack(&batch.receipts).await.unwrap();
    assert_eq!(ctx.queue_depth(&queue_url).await.unwrap(), 0);

    ctx.delete_queue(&queue_url).await.ok();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_sqs_source_empty_queue() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let queue_name = unique_name("ir-empty");
    let queue_url = ctx.create_queue(&queue_name).await.unwrap();

    let source = SqsSource::from_config_with_endpoint(
        SqsSourceConfig::new(&queue_name),
        &ctx.endpoint,
        &ctx.region,
    )
    .await
    .unwrap();

    let batch = source.receive().await.unwrap().unwrap();
    assert!(batch.is_empty());
    assert!(batch.notifications.is_empty());

    ctx.delete_queue(&queue_url).await.ok();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_sqs_source_queue_not_found() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let queue_name = unique_name("ir-missing");
    let result = SqsSource::from_config_with_endpoint(
        SqsSourceConfig::new(&queue_name),
        &ctx.endpoint,
        &ctx.region,
    )
    .await;

    match result {
        Err(IrError::Queue(QueueError::NotFound(name))) => assert_eq!(name, queue_name),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("expected queue not found"),
    }
}
