//! Notification source implementations.
//!
//! This module provides implementations of [`NotificationQueue`](ir_traits::NotificationQueue)
//! for receiving object-created notifications from different sources:
//!
//! - [`SqsSource`]: Receives S3 event notifications from an AWS SQS queue (for production)
//! - [`StdinSource`]: Reads message bodies or `s3://` URIs from stdin (for local runs)

mod sqs;
mod stdin;

pub use sqs::{resolve_queue_url, SqsSource, SqsSourceConfig};
pub use stdin::StdinSource;

use ir_types::{parse_event_message, Notification};
use tracing::{error, info, warn};

/// Extract the notifications carried by one message body.
///
/// Missing `Records` is a warning and an unparsable body is an error; both
/// yield no notifications so the rest of the batch is unaffected.
pub(crate) fn notifications_from_body(message_id: &str, body: &str) -> Vec<Notification> {
    let parsed = match parse_event_message(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!(
                message_id = message_id,
                error = %e,
                "Failed to parse queue message body"
            );
            return Vec::new();
        }
    };

    if !parsed.has_records {
        warn!(
            message_id = message_id,
            body = body,
            "\"Records\" field not found in the queue message"
        );
        return Vec::new();
    }

    if parsed.malformed_records > 0 {
        warn!(
            message_id = message_id,
            count = parsed.malformed_records,
            "Skipped records without s3.bucket.name or s3.object.key"
        );
    }

    info!(
        message_id = message_id,
        count = parsed.notifications.len(),
        "Found record(s) in the queue message"
    );

    parsed.notifications
}
