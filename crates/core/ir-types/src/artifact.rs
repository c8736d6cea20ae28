//! Result artifacts produced by processing one archive.

use bytes::Bytes;
use std::io::Cursor;

/// Name suffixes appended to an archive's base name.
pub mod suffix {
    /// The re-published raw archive
    pub const RAW_ARCHIVE: &str = ".tar.gz";
    /// Machine-readable findings
    pub const ANALYSIS: &str = "_analysis.json";
    /// Human-readable text summary
    pub const TEXT_SUMMARY: &str = "_summary.txt";
    /// Human-readable rich-text summary
    pub const HTML_SUMMARY: &str = "_summary.html";
}

/// MIME types attached to published artifacts.
pub mod content_type {
    pub const GZIP: &str = "application/gzip";
    pub const JSON: &str = "application/json";
    pub const TEXT: &str = "text/plain";
    pub const HTML: &str = "text/html; charset=UTF-8";
}

/// One named, typed output of processing an archive.
///
/// Content is an immutable byte buffer; [`ResultArtifact::reader`] always
/// starts at byte 0, so sinks never observe a partially consumed stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultArtifact {
    /// Artifact name (a suffix until [`ResultSet::collect`] prepends the base name)
    pub name: String,

    /// Artifact bytes
    pub content: Bytes,

    /// MIME content type
    pub content_type: String,
}

impl ResultArtifact {
    /// Create a new artifact.
    pub fn new(
        name: impl Into<String>,
        content: impl Into<Bytes>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            content_type: content_type.into(),
        }
    }

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// A fresh reader positioned at the start of the content.
    pub fn reader(&self) -> Cursor<Bytes> {
        Cursor::new(self.content.clone())
    }

    /// Copy of this artifact with `prefix` prepended to its name.
    pub fn prefixed(&self, prefix: &str) -> Self {
        Self {
            name: format!("{}{}", prefix, self.name),
            content: self.content.clone(),
            content_type: self.content_type.clone(),
        }
    }
}

/// Artifacts accumulated while processing a single archive.
///
/// A `ResultSet` is created per notification and never shared, so artifacts
/// from one archive cannot leak into another archive's publication.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    artifacts: Vec<ResultArtifact>,
}

impl ResultSet {
    /// Create an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an artifact, preserving insertion order.
    pub fn push(&mut self, artifact: ResultArtifact) {
        self.artifacts.push(artifact);
    }

    /// Remove all accumulated artifacts.
    pub fn clear(&mut self) {
        self.artifacts.clear();
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultArtifact> {
        self.artifacts.iter()
    }

    /// Final artifact list for publication.
    ///
    /// Prepends `base_name` to every artifact name and drops zero-length
    /// artifacts. Order is preserved.
    pub fn collect(&self, base_name: &str) -> Vec<ResultArtifact> {
        self.artifacts
            .iter()
            .filter(|a| !a.is_empty())
            .map(|a| a.prefixed(base_name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_collect_prefixes_names() {
        let mut results = ResultSet::new();
        results.push(ResultArtifact::new("_suff.txt", "123", content_type::TEXT));

        let collected = results.collect("filename");
        assert_eq!(
            collected,
            vec![ResultArtifact::new("filename_suff.txt", "123", content_type::TEXT)]
        );
    }

    #[test]
    fn test_collect_drops_empty_artifacts() {
        let mut results = ResultSet::new();
        results.push(ResultArtifact::new(suffix::RAW_ARCHIVE, "gz", content_type::GZIP));
        results.push(ResultArtifact::new(suffix::ANALYSIS, Bytes::new(), content_type::JSON));
        results.push(ResultArtifact::new(suffix::TEXT_SUMMARY, "text", content_type::TEXT));

        let names: Vec<_> = results.collect("AMIRA-301").into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["AMIRA-301.tar.gz", "AMIRA-301_summary.txt"]);
    }

    #[test]
    fn test_collect_all_empty_yields_nothing() {
        let mut results = ResultSet::new();
        results.push(ResultArtifact::new(suffix::ANALYSIS, "", content_type::JSON));
        assert!(results.collect("x").is_empty());
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_reader_starts_at_zero() {
        let artifact = ResultArtifact::new("a", "hello", content_type::TEXT);

        let mut first = String::new();
        artifact.reader().read_to_string(&mut first).unwrap();
        let mut second = String::new();
        artifact.reader().read_to_string(&mut second).unwrap();

        assert_eq!(first, "hello");
        assert_eq!(second, "hello");
    }

    #[test]
    fn test_clear() {
        let mut results = ResultSet::new();
        results.push(ResultArtifact::new("a", "1", content_type::TEXT));
        results.clear();
        assert!(results.is_empty());
    }
}
