//! Project entity representing the assembly working directory.

use crate::config::{AssemblyConfig, PROJECT_CONFIG_FILE};
use std::path::PathBuf;

/// Represents the directory the assembly runs in
#[derive(Debug, Clone)]
pub struct Project {
    /// Project root path
    pub root_path: PathBuf,
    /// Parent of staged working trees (absolute path)
    pub staging_directory: PathBuf,
    /// Library directory receiving jars and markers (absolute path)
    pub lib_directory: PathBuf,
    /// Loaded configuration
    pub config: AssemblyConfig,
}

impl Project {
    /// Create a new Project from a root path and configuration
    pub fn new(root_path: PathBuf, config: AssemblyConfig) -> Self {
        let staging_directory = root_path.join(&config.paths.staging);
        let lib_directory = root_path.join(&config.paths.lib);

        Self {
            root_path,
            staging_directory,
            lib_directory,
            config,
        }
    }

    /// Discover the project root by walking up to the nearest project config file
    pub fn discover(start_path: Option<PathBuf>) -> Option<PathBuf> {
        let start = start_path
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

        let mut current = start.as_path();
        loop {
            if current.join(PROJECT_CONFIG_FILE).is_file() {
                return Some(current.to_path_buf());
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    /// Tags currently staged, sorted by name
    pub fn staged_tags(&self) -> std::io::Result<Vec<String>> {
        let mut tags = Vec::new();
        if !self.staging_directory.is_dir() {
            return Ok(tags);
        }
        for entry in std::fs::read_dir(&self.staging_directory)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                tags.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        tags.sort();
        Ok(tags)
    }
}
