//! Stdin notification source implementation.

use super::notifications_from_body;
use async_trait::async_trait;
use ir_error::{IrError, QueueError, Result};
use ir_traits::{MessageReceipt, NotificationQueue, ReceivedBatch, MAX_BATCH_SIZE};
use ir_types::{decode_object_key, Notification};
use std::io::{self, BufRead, BufReader};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::{debug, trace, warn};
use uuid::Uuid;

/// Parse a bare `s3://bucket/key` URI into a notification.
fn parse_s3_uri(line: &str) -> Option<Notification> {
    let url = url::Url::parse(line).ok()?;
    if url.scheme() != "s3" {
        return None;
    }

    let bucket = url.host_str()?;
    let key = url.path().trim_start_matches('/');
    if bucket.is_empty() || key.is_empty() {
        return None;
    }

    Some(Notification::new(bucket, decode_object_key(key)))
}

/// Notification source that reads one message per line from stdin.
///
/// Supports two line formats:
///
/// 1. **S3 event message body** (as delivered by SQS):
///    ```jsonl
///    {"Records":[{"s3":{"bucket":{"name":"forensics"},"object":{"key":"case-1.tar.gz"}}}]}
///    ```
///
/// 2. **Bare S3 URI** (for ad-hoc runs):
///    ```text
///    s3://forensics/case-1.tar.gz
///    ```
///
/// Empty lines are skipped. Acknowledgment is a no-op.
pub struct StdinSource {
    /// Reader for stdin (wrapped in Mutex for thread-safe access)
    reader: Mutex<Box<dyn BufRead + Send>>,

    /// Whether we've reached EOF
    eof_reached: AtomicBool,

    /// Counter for generating message IDs
    message_counter: AtomicU64,
}

impl StdinSource {
    /// Create a new stdin source.
    pub fn new() -> Self {
        Self::with_reader(Box::new(BufReader::new(io::stdin())))
    }

    /// Create a stdin source with a custom reader (for testing).
    pub fn with_reader(reader: Box<dyn BufRead + Send>) -> Self {
        Self {
            reader: Mutex::new(reader),
            eof_reached: AtomicBool::new(false),
            message_counter: AtomicU64::new(0),
        }
    }

    /// Generate a unique message ID.
    fn next_message_id(&self) -> String {
        let counter = self.message_counter.fetch_add(1, Ordering::Relaxed);
        format!("stdin-{}-{}", Uuid::new_v4(), counter)
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationQueue for StdinSource {
    async fn receive(&self) -> Result<Option<ReceivedBatch>> {
        if self.eof_reached.load(Ordering::Relaxed) {
            return Ok(None);
        }

        let mut batch = ReceivedBatch::empty();
        let mut reader = self.reader.lock().map_err(|e| {
            IrError::Queue(QueueError::Receive(format!("Failed to lock stdin reader: {}", e)))
        })?;

        while batch.message_count() < MAX_BATCH_SIZE {
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => {
                    self.eof_reached.store(true, Ordering::Relaxed);
                    debug!("Stdin EOF reached");
                    break;
                }
                Ok(_) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    trace!(line = line, "Read line from stdin");

                    let message_id = self.next_message_id();
                    if line.starts_with("s3://") {
                        match parse_s3_uri(line) {
                            Some(notification) => batch.notifications.push(notification),
                            None => warn!(line = line, "Failed to parse S3 URI from stdin"),
                        }
                    } else {
                        batch
                            .notifications
                            .extend(notifications_from_body(&message_id, line));
                    }
                    batch
                        .receipts
                        .push(MessageReceipt::new(message_id.clone(), message_id));
                }
                Err(e) => {
                    return Err(IrError::Queue(QueueError::Receive(format!(
                        "Failed to read from stdin: {}",
                        e
                    ))));
                }
            }
        }

        if batch.is_empty() && self.eof_reached.load(Ordering::Relaxed) {
            return Ok(None);
        }

        Ok(Some(batch))
    }

    async fn ack(&self, receipts: &[MessageReceipt]) -> Result<()> {
        debug!(count = receipts.len(), "Stdin messages consumed");
        Ok(())
    }

    fn has_more(&self) -> bool {
        !self.eof_reached.load(Ordering::Relaxed)
    }
}
