//! Gzip-compressed tar scanning.

use bytes::Bytes;
use flate2::read::GzDecoder;
use ir_error::{ExtractionError, Result};
use std::io::Read;
use tracing::{debug, trace};

/// Gzip member header magic.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// An archive entry whose name matched the requested suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedEntry {
    /// Entry path as stored in the archive
    pub name: String,

    /// Entry content
    pub content: Bytes,
}

/// Result of scanning an archive for entries with a given suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveScan {
    /// The bytes could not be opened as a gzip-compressed tar archive
    Unreadable(String),

    /// The archive was read to the end
    Entries {
        /// Entries whose name ends with the suffix, in archive order
        matched: Vec<MatchedEntry>,

        /// Total number of entries in the archive
        total: usize,
    },
}

/// Scan a `.tar.gz` byte buffer for entries whose name ends with `suffix`.
///
/// A failure before the first entry is read means the bytes are not an
/// archive and yields [`ArchiveScan::Unreadable`]. A failure after that point
/// is a truncated or damaged archive and yields [`ExtractionError::Corrupt`].
pub fn scan_tar_gz(raw: &[u8], suffix: &str) -> Result<ArchiveScan> {
    if raw.len() < GZIP_MAGIC.len() || raw[..2] != GZIP_MAGIC {
        return Ok(ArchiveScan::Unreadable("not gzip data".to_string()));
    }

    let mut archive = tar::Archive::new(GzDecoder::new(raw));
    let entries = match archive.entries() {
        Ok(entries) => entries,
        Err(e) => return Ok(ArchiveScan::Unreadable(e.to_string())),
    };

    let mut matched = Vec::new();
    let mut total = 0usize;

    for entry in entries {
        let mut entry = match entry {
            Ok(entry) => entry,
            Err(e) if total == 0 => return Ok(ArchiveScan::Unreadable(e.to_string())),
            Err(e) => {
                return Err(ExtractionError::Corrupt(format!(
                    "failed to read entry {}: {}",
                    total + 1,
                    e
                ))
                .into())
            }
        };
        total += 1;

        let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        trace!(entry = %name, size = entry.size(), "Archive entry");

        if !name.ends_with(suffix) {
            continue;
        }

        // The header size is untrusted; the body is bounded by the stream
        let expected = entry.size();
        let mut content = Vec::new();
        entry.read_to_end(&mut content).map_err(|e| {
            ExtractionError::Corrupt(format!("failed to read entry {}: {}", name, e))
        })?;

        if content.len() as u64 != expected {
            return Err(ExtractionError::Corrupt(format!(
                "entry {} is truncated: header declares {} bytes, found {}",
                name,
                expected,
                content.len()
            ))
            .into());
        }

        matched.push(MatchedEntry {
            name,
            content: Bytes::from(content),
        });
    }

    debug!(total = total, matched = matched.len(), suffix = suffix, "Scanned archive");

    Ok(ArchiveScan::Entries { matched, total })
}
