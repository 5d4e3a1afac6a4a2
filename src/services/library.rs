//! Library directory service: cleanup, harvest, and completion markers.

use crate::domain::{
    ArtifactFilter, ArtifactSet, CompletionMarker, MarkerNaming, Tag, MARKER_EXTENSION,
};
use crate::error::{LibraryError, LibraryResult};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// The flat directory receiving harvested jars and marker files
#[derive(Debug, Clone)]
pub struct LibraryDirectory {
    path: PathBuf,
}

impl LibraryDirectory {
    /// Open an existing library directory
    pub fn open(path: impl Into<PathBuf>) -> LibraryResult<Self> {
        let path = path.into();
        if !path.is_dir() {
            return Err(LibraryError::InvalidDirectory(path));
        }
        Ok(Self { path })
    }

    /// Delete every artifact (by suffix) and marker file left by a previous run
    pub fn clean(&self, filter: &ArtifactFilter) -> LibraryResult<Vec<PathBuf>> {
        tracing::info!("Clean up {}", self.path.display());

        let entries = fs::read_dir(&self.path).map_err(|e| LibraryError::io(&self.path, e))?;

        let mut removed = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| LibraryError::io(&self.path, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            // matched on raw bytes so names that are not UTF-8 are removed too
            let file_name = entry.file_name();
            let name = file_name.as_encoded_bytes();
            let is_artifact =
                !filter.suffix.is_empty() && name.ends_with(filter.suffix.as_bytes());
            if is_artifact || name.ends_with(MARKER_EXTENSION.as_bytes()) {
                fs::remove_file(&path).map_err(|e| LibraryError::io(&path, e))?;
                tracing::debug!("Removed {}", path.display());
                removed.push(path);
            }
        }
        removed.sort();
        Ok(removed)
    }

    /// Copy every file of `source` accepted by `filter` into this directory,
    /// overwriting files of the same name
    pub fn harvest(&self, source: &Path, filter: &ArtifactFilter) -> LibraryResult<ArtifactSet> {
        if !source.is_dir() {
            return Err(LibraryError::InvalidDirectory(source.to_path_buf()));
        }

        let mut files = Vec::new();
        for (name, path) in list_files(source)? {
            if !filter.matches(&name) {
                continue;
            }
            let destination = self.path.join(&name);
            fs::copy(&path, &destination).map_err(|e| LibraryError::io(&destination, e))?;
            tracing::info!("Copied {} into {}", name, self.path.display());
            files.push(destination);
        }

        Ok(ArtifactSet { files })
    }

    /// Create or refresh the zero-byte marker for `(tag, client_mode)`
    pub fn mark(
        &self,
        naming: &MarkerNaming,
        tag: &Tag,
        client_mode: bool,
    ) -> LibraryResult<PathBuf> {
        let path = self.path.join(naming.file_name(tag, client_mode));
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| LibraryError::io(&path, e))?;
        file.set_modified(SystemTime::now())
            .map_err(|e| LibraryError::io(&path, e))?;

        tracing::info!("Marked distribution {}", path.display());
        Ok(path)
    }

    /// Completion markers present in the directory, sorted by file name
    pub fn markers(&self, naming: &MarkerNaming) -> LibraryResult<Vec<CompletionMarker>> {
        Ok(self
            .file_entries()?
            .into_iter()
            .filter_map(|(name, _)| naming.parse(&name))
            .collect())
    }

    /// Harvested artifact names, sorted
    pub fn artifacts(&self, filter: &ArtifactFilter) -> LibraryResult<Vec<String>> {
        Ok(self
            .file_entries()?
            .into_iter()
            .map(|(name, _)| name)
            .filter(|name| filter.matches(name))
            .collect())
    }

    fn file_entries(&self) -> LibraryResult<Vec<(String, PathBuf)>> {
        list_files(&self.path)
    }
}

/// Name of the distribution recorded in `directory`.
///
/// This is the stem of the first `*.tag` file by name (files named `.tag*` are
/// ignored), or `default` when there is none or the directory does not exist.
pub fn distribution_name(directory: &Path, default: &str) -> LibraryResult<String> {
    if !directory.is_dir() {
        return Ok(default.to_string());
    }

    let name = list_files(directory)?
        .into_iter()
        .map(|(name, _)| name)
        .find(|name| name.ends_with(MARKER_EXTENSION) && !name.starts_with(MARKER_EXTENSION))
        .and_then(|name| name.strip_suffix(MARKER_EXTENSION).map(str::to_string))
        .unwrap_or_else(|| default.to_string());
    Ok(name)
}

/// Regular files of `dir` with UTF-8 names, sorted by name
fn list_files(dir: &Path) -> LibraryResult<Vec<(String, PathBuf)>> {
    let entries = fs::read_dir(dir).map_err(|e| LibraryError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| LibraryError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) => files.push((name.to_string(), path)),
            None => tracing::debug!("Skipping non UTF-8 file name {}", path.display()),
        }
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}
