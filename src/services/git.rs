//! Git service for staging tagged working trees.
//!
//! Shells out to the resolved git executable; all operations block until git exits.

use crate::domain::Tag;
use crate::error::{GitError, GitResult};
use crate::services::process::{command_line, path_arg, ProcessRunner};
use crate::services::ToolBinding;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Git service for cloning tags into a staging directory
pub struct GitService {
    git: ToolBinding,
    runner: ProcessRunner,
}

impl GitService {
    /// Create a new GitService around a resolved git binary
    pub fn new(git: ToolBinding, runner: ProcessRunner) -> Self {
        Self { git, runner }
    }

    /// Arguments of a shallow, single-branch clone of `tag` into `path`
    pub fn clone_args(repository: &str, tag: &Tag, path: &Path) -> Vec<OsString> {
        vec![
            "clone".into(),
            "-b".into(),
            tag.as_str().into(),
            "--depth".into(),
            "1".into(),
            repository.into(),
            path_arg(path),
        ]
    }

    /// Stage `tag` under `directory`, cloning only when `directory/tag` is absent.
    ///
    /// An existing tag directory is reused as is; its contents are not checked
    /// against the remote.
    pub fn stage(&self, repository: &str, tag: &Tag, directory: &Path) -> GitResult<PathBuf> {
        if !directory.is_dir() {
            return Err(GitError::InvalidDirectory(directory.to_path_buf()));
        }

        let path = directory.join(tag.as_str());
        if path.is_dir() {
            tracing::info!("Tag is already copied");
            tracing::warn!(
                "Reusing {} without verifying it matches {} at {}",
                path.display(),
                repository,
                tag
            );
            return Ok(path);
        }
        if path.exists() {
            return Err(GitError::InvalidDirectory(path));
        }

        tracing::info!("Create directory for tag {}", path.display());
        let args = Self::clone_args(repository, tag, &path);
        tracing::debug!("{}", command_line(&self.git.path, &args));

        let outcome = self.runner.run(&self.git.path, &args, None)?;
        if !outcome.success() {
            return Err(GitError::CloneFailed {
                repository: repository.to_string(),
                path,
                code: outcome.code,
                stderr_tail: outcome.stderr_tail,
            });
        }

        tracing::info!("Cloned repository into {}", path.display());
        Ok(path)
    }
}
