//! Notification queue trait and related types.

use async_trait::async_trait;
use ir_error::Result;
use ir_types::Notification;

/// Maximum number of messages retrieved in one round-trip.
pub const MAX_BATCH_SIZE: usize = 10;

/// Trait for notification queue backends.
///
/// Implementations include:
/// - AWS SQS queue (production)
/// - Stdin lines (local runs)
///
/// # Message Flow
///
/// 1. The worker calls [`receive`](NotificationQueue::receive) to get one batch
/// 2. Every notification in the batch is processed to completion
/// 3. The worker calls [`ack`](NotificationQueue::ack) with the batch receipts
///
/// Acknowledgment covers the whole batch, including messages that yielded no
/// notifications. A crash between steps 1 and 3 leads to redelivery.
#[async_trait]
pub trait NotificationQueue: Send + Sync {
    /// Receives one batch of at most [`MAX_BATCH_SIZE`] messages.
    ///
    /// Returns `Ok(None)` when the source is exhausted (e.g., stdin EOF).
    /// Returns an empty batch when no messages are available.
    async fn receive(&self) -> Result<Option<ReceivedBatch>>;

    /// Acknowledges (deletes) consumed messages.
    async fn ack(&self, receipts: &[MessageReceipt]) -> Result<()>;

    /// Returns true if more messages may be available.
    fn has_more(&self) -> bool;
}

/// Handle used to acknowledge one received message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageReceipt {
    /// Message identifier (for logging)
    pub message_id: String,

    /// Handle passed back to the queue on delete
    pub receipt_handle: String,
}

impl MessageReceipt {
    /// Create a new receipt.
    pub fn new(message_id: impl Into<String>, receipt_handle: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            receipt_handle: receipt_handle.into(),
        }
    }
}

/// Notifications parsed from one poll, plus the receipts needed to ack it.
#[derive(Debug, Clone, Default)]
pub struct ReceivedBatch {
    /// Notifications in message order, then record order
    pub notifications: Vec<Notification>,

    /// One receipt per retrieved message
    pub receipts: Vec<MessageReceipt>,
}

impl ReceivedBatch {
    /// An empty batch (no messages retrieved).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of raw messages retrieved.
    pub fn message_count(&self) -> usize {
        self.receipts.len()
    }

    /// True when no messages were retrieved.
    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }
}
