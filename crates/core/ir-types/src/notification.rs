//! Object-created notifications and the S3 event message body they come from.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Key suffix of archives the pipeline accepts.
pub const ARCHIVE_SUFFIX: &str = ".tar.gz";

/// A newly created object, identified by bucket and key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Notification {
    /// Bucket holding the object
    pub bucket_name: String,

    /// Object key (already URL-decoded)
    pub key_name: String,
}

impl Notification {
    /// Create a new notification.
    pub fn new(bucket_name: impl Into<String>, key_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            key_name: key_name.into(),
        }
    }

    /// Returns true if the key names an archive the pipeline can process.
    pub fn is_archive(&self) -> bool {
        self.key_name.ends_with(ARCHIVE_SUFFIX)
    }

    /// The key with its archive suffix stripped.
    ///
    /// Returns `None` when the key does not end in [`ARCHIVE_SUFFIX`].
    pub fn base_name(&self) -> Option<&str> {
        self.key_name.strip_suffix(ARCHIVE_SUFFIX)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket_name, self.key_name)
    }
}

/// Body of an S3 event notification message.
///
/// Only the fields the pipeline reads are modelled. Records are kept as raw
/// JSON so a single malformed record does not discard its siblings.
#[derive(Debug, Clone, Deserialize)]
struct EventMessage {
    #[serde(rename = "Records")]
    records: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Deserialize)]
struct EventRecord {
    s3: S3Entity,
}

#[derive(Debug, Clone, Deserialize)]
struct S3Entity {
    bucket: BucketEntity,
    object: ObjectEntity,
}

#[derive(Debug, Clone, Deserialize)]
struct BucketEntity {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ObjectEntity {
    key: String,
}

/// Notifications parsed out of one queue message body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMessage {
    /// False when the body had no `Records` field at all
    pub has_records: bool,

    /// Notifications in record order
    pub notifications: Vec<Notification>,

    /// Records that lacked `s3.bucket.name` or `s3.object.key`
    pub malformed_records: usize,
}

/// Parse a queue message body into notifications.
///
/// A body without `Records` parses successfully with `has_records == false`.
/// Invalid JSON is an error.
pub fn parse_event_message(body: &str) -> serde_json::Result<ParsedMessage> {
    let message: EventMessage = serde_json::from_str(body)?;

    let Some(records) = message.records else {
        return Ok(ParsedMessage::default());
    };

    let mut parsed = ParsedMessage {
        has_records: true,
        notifications: Vec::with_capacity(records.len()),
        malformed_records: 0,
    };

    for record in records {
        match serde_json::from_value::<EventRecord>(record) {
            Ok(record) => parsed.notifications.push(Notification::new(
                record.s3.bucket.name,
                decode_object_key(&record.s3.object.key),
            )),
            Err(_) => parsed.malformed_records += 1,
        }
    }

    Ok(parsed)
}

/// Decode an object key as it appears in an S3 event.
///
/// Event keys are form-urlencoded: spaces arrive as `+` and reserved
/// characters as `%XX`.
pub fn decode_object_key(key: &str) -> String {
    if !key.contains(['+', '%']) {
        return key.to_string();
    }

    // Reserved characters including '&' and '=' are always escaped in event keys,
    // so the whole key parses as a single form name.
    url::form_urlencoded::parse(key.as_bytes())
        .next()
        .map(|(name, _)| name)
        .unwrap_or(Cow::Borrowed(key))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_body(keys: &[&str]) -> String {
        let records: Vec<serde_json::Value> = keys
            .iter()
            .map(|key| {
                serde_json::json!({
                    "eventVersion": "2.0",
                    "eventSource": "aws:s3",
                    "eventName": "ObjectCreated:Put",
                    "s3": {
                        "bucket": {"name": "amira-test", "arn": "arn:aws:s3:::amira-test"},
                        "object": {"key": key, "size": 1024}
                    }
                })
            })
            .collect();
        serde_json::json!({ "Records": records }).to_string()
    }

    #[test]
    fn test_base_name_strips_archive_suffix() {
        let n = Notification::new("amira-test", "AMIRA-301.tar.gz");
        assert!(n.is_archive());
        assert_eq!(n.base_name(), Some("AMIRA-301"));
    }

    #[test]
    fn test_non_archive_has_no_base_name() {
        let n = Notification::new("amira-test", "MALWARE-301.txt");
        assert!(!n.is_archive());
        assert_eq!(n.base_name(), None);
    }

    #[test]
    fn test_display_as_s3_uri() {
        let n = Notification::new("bucket", "dir/file.tar.gz");
        assert_eq!(n.to_string(), "s3://bucket/dir/file.tar.gz");
    }

    #[test]
    fn test_parse_event_message_records() {
        let body = event_body(&["AMIRA-1561.tar.gz", "AMIRA-1562.tar.gz"]);
        let parsed = parse_event_message(&body).unwrap();

        assert!(parsed.has_records);
        assert_eq!(parsed.malformed_records, 0);
        assert_eq!(
            parsed.notifications,
            vec![
                Notification::new("amira-test", "AMIRA-1561.tar.gz"),
                Notification::new("amira-test", "AMIRA-1562.tar.gz"),
            ]
        );
    }

    #[test]
    fn test_parse_event_message_without_records() {
        let body = r#"{"Service":"Amazon S3","Event":"s3:TestEvent","Bucket":"amira-test"}"#;
        let parsed = parse_event_message(body).unwrap();

        assert!(!parsed.has_records);
        assert!(parsed.notifications.is_empty());
    }

    #[test]
    fn test_parse_event_message_empty_records() {
        let parsed = parse_event_message(r#"{"Records":[]}"#).unwrap();

        assert!(parsed.has_records);
        assert!(parsed.notifications.is_empty());
    }

    #[test]
    fn test_parse_event_message_skips_malformed_record() {
        let body = r#"{"Records":[{"s3":{"bucket":{"name":"b"}}},{"s3":{"bucket":{"name":"b"},"object":{"key":"k.tar.gz"}}}]}"#;
        let parsed = parse_event_message(body).unwrap();

        assert_eq!(parsed.malformed_records, 1);
        assert_eq!(parsed.notifications, vec![Notification::new("b", "k.tar.gz")]);
    }

    #[test]
    fn test_parse_event_message_invalid_json() {
        assert!(parse_event_message("not json").is_err());
    }

    #[test]
    fn test_decode_object_key() {
        assert_eq!(decode_object_key("plain-key.tar.gz"), "plain-key.tar.gz");
        assert_eq!(decode_object_key("case+42%3A+mac.tar.gz"), "case 42: mac.tar.gz");
        assert_eq!(decode_object_key("a%26b%3Dc.tar.gz"), "a&b=c.tar.gz");
    }
}
