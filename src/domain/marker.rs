//! Completion marker naming.
//!
//! A marker is a zero-byte file in the library directory whose name alone records
//! that a `(tag, client mode)` build completed: `<prefix>-dist-<tag>[<client-suffix>].tag`.

use super::Tag;

/// Extension shared by every marker file
pub const MARKER_EXTENSION: &str = ".tag";

/// Naming rules for marker files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerNaming {
    pub prefix: String,
    pub client_suffix: String,
}

impl MarkerNaming {
    pub fn new(prefix: impl Into<String>, client_suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            client_suffix: client_suffix.into(),
        }
    }

    /// File name of the marker for a tag and client mode
    pub fn file_name(&self, tag: &Tag, client_mode: bool) -> String {
        let suffix = if client_mode {
            self.client_suffix.as_str()
        } else {
            ""
        };
        format!("{}-dist-{}{}{}", self.prefix, tag, suffix, MARKER_EXTENSION)
    }

    /// Recover the marker encoded in a file name, if it is one of ours
    pub fn parse(&self, file_name: &str) -> Option<CompletionMarker> {
        let stem = file_name.strip_suffix(MARKER_EXTENSION)?;
        let rest = stem.strip_prefix(&format!("{}-dist-", self.prefix))?;

        let (tag, client_mode) = match rest.strip_suffix(self.client_suffix.as_str()) {
            Some(tag) if !self.client_suffix.is_empty() => (tag, true),
            _ => (rest, false),
        };

        let tag = Tag::parse(tag).ok()?;
        Some(CompletionMarker { tag, client_mode })
    }
}

/// A completed build as recorded by its marker file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionMarker {
    pub tag: Tag,
    pub client_mode: bool,
}

impl CompletionMarker {
    /// Short mode label for listings
    pub fn mode(&self) -> &'static str {
        if self.client_mode {
            "client"
        } else {
            "provided"
        }
    }
}
