//! Build artifact selection.

use std::path::PathBuf;

/// Selects build outputs by file name prefix and suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFilter {
    pub prefix: String,
    pub suffix: String,
}

impl ArtifactFilter {
    /// Create a new filter
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Check whether a file name satisfies both the prefix and the suffix
    pub fn matches(&self, file_name: &str) -> bool {
        file_name.starts_with(&self.prefix) && file_name.ends_with(&self.suffix)
    }
}

/// Files copied into the library directory by one harvest
#[derive(Debug, Clone, Default)]
pub struct ArtifactSet {
    /// Destination paths, sorted by name
    pub files: Vec<PathBuf>,
}

impl ArtifactSet {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// File names of the harvested artifacts
    pub fn names(&self) -> Vec<String> {
        self.files
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect()
    }
}
