//! External tool resolution.

use crate::error::ToolError;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// An external executable resolved to an absolute path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolBinding {
    /// Name the tool was requested by
    pub name: String,
    /// Absolute path of the executable
    pub path: PathBuf,
}

/// Resolves executables on the command search path
#[derive(Debug, Clone)]
pub struct ToolLocator {
    which: PathBuf,
}

impl Default for ToolLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolLocator {
    pub fn new() -> Self {
        Self {
            which: PathBuf::from("which"),
        }
    }

    /// Resolve `name` to an absolute path.
    ///
    /// Bare names are looked up with `which`. Names containing a path separator
    /// are taken as paths and only checked for existence.
    pub fn resolve(&self, name: &str) -> Result<ToolBinding, ToolError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ToolError::NotFound(name.to_string()));
        }

        let path = if Path::new(name).components().count() > 1 || Path::new(name).is_absolute() {
            Self::check_path(name)?
        } else {
            self.search(name)?
        };

        tracing::debug!("Resolved {} to {}", name, path.display());
        Ok(ToolBinding {
            name: name.to_string(),
            path,
        })
    }

    fn check_path(name: &str) -> Result<PathBuf, ToolError> {
        let path = Path::new(name);
        if !path.is_file() {
            return Err(ToolError::NotFound(name.to_string()));
        }
        std::fs::canonicalize(path).map_err(|_| ToolError::NotFound(name.to_string()))
    }

    fn search(&self, name: &str) -> Result<PathBuf, ToolError> {
        let output = match Command::new(&self.which)
            .arg(name)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("Could not run {}: {}", self.which.display(), e);
                return Err(ToolError::NotFound(name.to_string()));
            }
        };

        if !output.status.success() {
            return Err(ToolError::NotFound(name.to_string()));
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))
    }
}
