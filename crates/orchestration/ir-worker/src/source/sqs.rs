//! SQS notification source implementation.

use super::notifications_from_body;
use async_trait::async_trait;
use aws_sdk_sqs::types::DeleteMessageBatchRequestEntry;
use aws_sdk_sqs::Client;
use ir_error::{IrError, QueueError, Result};
use ir_traits::{MessageReceipt, NotificationQueue, ReceivedBatch, MAX_BATCH_SIZE};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Configuration for the SQS source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqsSourceConfig {
    /// SQS queue name, resolved to a URL when the source is built
    pub queue_name: String,

    /// Long-polling wait time in seconds (0-20)
    pub wait_time_seconds: i32,

    /// Visibility timeout override in seconds (queue default when unset)
    pub visibility_timeout: Option<i32>,

    /// Maximum number of messages to receive per batch (1-10)
    pub max_batch_size: i32,
}

impl SqsSourceConfig {
    /// Create a new SQS source configuration.
    pub fn new(queue_name: impl Into<String>) -> Self {
        Self {
            queue_name: queue_name.into(),
            wait_time_seconds: 0,
            visibility_timeout: None,
            max_batch_size: MAX_BATCH_SIZE as i32,
        }
    }

    /// Set the long-polling wait time.
    pub fn with_wait_time(mut self, seconds: i32) -> Self {
        self.wait_time_seconds = seconds.clamp(0, 20);
        self
    }

    /// Set the visibility timeout.
    pub fn with_visibility_timeout(mut self, seconds: i32) -> Self {
        self.visibility_timeout = Some(seconds);
        self
    }

    /// Set the maximum batch size.
    pub fn with_max_batch_size(mut self, size: i32) -> Self {
        self.max_batch_size = size.clamp(1, MAX_BATCH_SIZE as i32);
        self
    }
}

/// Notification source backed by an AWS SQS queue of S3 event notifications.
pub struct SqsSource {
    /// SQS client
    client: Client,

    /// Resolved queue URL
    queue_url: String,

    /// Configuration
    config: SqsSourceConfig,
}

impl SqsSource {
    /// Create a new SQS source, resolving the queue name to its URL.
    ///
    /// Fails with [`QueueError::NotFound`] when the queue does not exist.
    pub async fn connect(client: Client, config: SqsSourceConfig) -> Result<Self> {
        let queue_url = resolve_queue_url(&client, &config.queue_name).await?;

        info!(
            queue = %config.queue_name,
            url = %queue_url,
            "Successfully connected to SQS queue"
        );

        Ok(Self {
            client,
            queue_url,
            config,
        })
    }

    /// Create an SQS source with default AWS configuration for `region`.
    pub async fn from_config(config: SqsSourceConfig, region: &str) -> Result<Self> {
        let aws_config = crate::aws::load_config(region, None).await;
        Self::connect(Client::new(&aws_config), config).await
    }

    /// Create an SQS source with a custom endpoint (for LocalStack).
    pub async fn from_config_with_endpoint(
        config: SqsSourceConfig,
        endpoint_url: &str,
        region: &str,
    ) -> Result<Self> {
        let aws_config = crate::aws::load_config(region, Some(endpoint_url)).await;
        Self::connect(Client::new(&aws_config), config).await
    }

    /// The resolved queue URL.
    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }
}

/// Resolve a queue name to its URL.
pub async fn resolve_queue_url(client: &Client, queue_name: &str) -> Result<String> {
    match client.get_queue_url().queue_name(queue_name).send().await {
        Ok(output) => output
            .queue_url
            .ok_or_else(|| IrError::Queue(QueueError::NotFound(queue_name.to_string()))),
        Err(e) => {
            let missing = e
                .as_service_error()
                .map(|se| se.is_queue_does_not_exist())
                .unwrap_or(false);
            if missing {
                Err(IrError::Queue(QueueError::NotFound(queue_name.to_string())))
            } else {
                Err(IrError::Queue(QueueError::Connection(format!(
                    "Failed to resolve SQS queue {}: {}",
                    queue_name, e
                ))))
            }
        }
    }
}

#[async_trait]
impl NotificationQueue for SqsSource {
    async fn receive(&self) -> Result<Option<ReceivedBatch>> {
        let response = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(self.config.max_batch_size)
            .wait_time_seconds(self.config.wait_time_seconds)
            .set_visibility_timeout(self.config.visibility_timeout)
            .send()
            .await
            .map_err(|e| IrError::Queue(QueueError::Receive(format!("SQS receive failed: {}", e))))?;

        let sqs_messages = response.messages.unwrap_or_default();
        info!(count = sqs_messages.len(), "Received message(s) from the SQS queue");

        let mut batch = ReceivedBatch::empty();

        for msg in sqs_messages {
            let message_id = msg.message_id.unwrap_or_default();
            let body = msg.body.unwrap_or_default();

            batch
                .notifications
                .extend(notifications_from_body(&message_id, &body));

            match msg.receipt_handle {
                Some(receipt_handle) => batch
                    .receipts
                    .push(MessageReceipt::new(message_id, receipt_handle)),
                None => warn!(
                    message_id = %message_id,
                    "Message has no receipt handle and cannot be deleted"
                ),
            }
        }

        Ok(Some(batch))
    }

    async fn ack(&self, receipts: &[MessageReceipt]) -> Result<()> {
        if receipts.is_empty() {
            return Ok(());
        }

        // SQS supports batch delete up to 10 messages
        for chunk in receipts.chunks(MAX_BATCH_SIZE) {
            let entries = chunk
                .iter()
                .enumerate()
                .map(|(i, receipt)| {
                    DeleteMessageBatchRequestEntry::builder()
                        .id(i.to_string())
                        .receipt_handle(&receipt.receipt_handle)
                        .build()
                        .map_err(|e| {
                            IrError::Queue(QueueError::Ack(format!(
                                "Invalid delete entry for message {}: {}",
                                receipt.message_id, e
                            )))
                        })
                })
                .collect::<Result<Vec<_>>>()?;

            let result = self
                .client
                .delete_message_batch()
                .queue_url(&self.queue_url)
                .set_entries(Some(entries))
                .send()
                .await
                .map_err(|e| {
                    IrError::Queue(QueueError::Ack(format!("SQS batch delete failed: {}", e)))
                })?;

            for f in &result.failed {
                warn!(
                    entry = %f.id,
                    error = f.message.as_deref().unwrap_or("unknown"),
                    "Failed to delete message"
                );
            }
        }

        debug!(count = receipts.len(), "Deleted messages from the SQS queue");
        Ok(())
    }

    // A queue never runs dry; the worker's run mode decides when to stop
    fn has_more(&self) -> bool {
        true
    }
}
