//! Analysis inputs.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The single payload file extracted from an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Entry name inside the archive
    pub name: String,

    /// Entry contents
    pub content: Bytes,
}

impl Payload {
    /// Create a new payload.
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Auxiliary data feeds (e.g. block/allow lists) passed to every analysis.
///
/// Feeds are keyed by name and point at files on local disk. Ordering is
/// stable so the analysis sees the same argument order on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideData {
    feeds: BTreeMap<String, PathBuf>,
}

impl SideData {
    /// Create an empty set of feeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a feed.
    pub fn with_feed(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.feeds.insert(name.into(), path.into());
        self
    }

    /// Parse a `name=path` feed specification.
    pub fn parse_feed(spec: &str) -> Result<(String, PathBuf), String> {
        let (name, path) = spec
            .split_once('=')
            .ok_or_else(|| format!("data feed '{}' must be of the form name=path", spec))?;
        let name = name.trim();
        if name.is_empty() || path.is_empty() {
            return Err(format!("data feed '{}' must be of the form name=path", spec));
        }
        Ok((name.to_string(), PathBuf::from(path)))
    }

    /// Iterate feeds in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.feeds.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }

    /// Look up a feed by name.
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.feeds.get(name).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }
}

impl FromIterator<(String, PathBuf)> for SideData {
    fn from_iter<T: IntoIterator<Item = (String, PathBuf)>>(iter: T) -> Self {
        Self {
            feeds: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed() {
        let (name, path) = SideData::parse_feed("domains=/etc/feeds/domains.txt").unwrap();
        assert_eq!(name, "domains");
        assert_eq!(path, PathBuf::from("/etc/feeds/domains.txt"));
    }

    #[test]
    fn test_parse_feed_rejects_missing_parts() {
        assert!(SideData::parse_feed("domains").is_err());
        assert!(SideData::parse_feed("=/tmp/x").is_err());
        assert!(SideData::parse_feed("domains=").is_err());
    }

    #[test]
    fn test_side_data_iterates_in_name_order() {
        let feeds = SideData::new()
            .with_feed("whitelist", "/w")
            .with_feed("blacklist", "/b");

        let names: Vec<_> = feeds.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["blacklist", "whitelist"]);
        assert_eq!(feeds.get("whitelist"), Some(Path::new("/w")));
        assert_eq!(feeds.len(), 2);
    }
}
