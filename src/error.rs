//! Unified error types for parquet-assembly.

use crate::services::ExitStatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error("Invalid tag '{0}': tags must be a single path component without whitespace")]
    InvalidTag(String),

    #[error("Only OS X and Linux are supported, found {0}")]
    UnsupportedPlatform(String),

    #[error("Invalid phase transition: {from} -> {to}")]
    PhaseTransition {
        from: &'static str,
        to: &'static str,
    },
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// External tool lookup errors
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Could not find {0}")]
    NotFound(String),
}

/// Repository staging errors
#[derive(Debug, Error)]
pub enum GitError {
    #[error("{0} is not a valid directory")]
    InvalidDirectory(PathBuf),

    #[error("Failed to clone repository {repository} into {path}, code={code}")]
    CloneFailed {
        repository: String,
        path: PathBuf,
        code: ExitStatusCode,
        stderr_tail: Vec<String>,
    },

    #[error(transparent)]
    Process(#[from] ProcessError),
}

/// External build errors
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{0} is not a valid directory")]
    InvalidDirectory(PathBuf),

    #[error("Failed to package project in {directory}, code={code}")]
    Failed {
        directory: PathBuf,
        code: ExitStatusCode,
        stderr_tail: Vec<String>,
    },

    #[error(transparent)]
    Process(#[from] ProcessError),
}

/// Library directory (harvest, cleanup, markers) errors
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("{0} is not a valid directory")]
    InvalidDirectory(PathBuf),

    #[error("I/O error at {path}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl LibraryError {
    /// Wrap a `std::io::Error` with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Subprocess spawning errors
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Failed to spawn {program}")]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to wait for {program}")]
    Wait {
        program: PathBuf,
        source: std::io::Error,
    },
}

impl AppError {
    /// Last lines the failing subprocess wrote to stderr, if any
    pub fn stderr_tail(&self) -> &[String] {
        match self {
            Self::Git(GitError::CloneFailed { stderr_tail, .. })
            | Self::Build(BuildError::Failed { stderr_tail, .. }) => stderr_tail,
            _ => &[],
        }
    }
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for Git operations
pub type GitResult<T> = std::result::Result<T, GitError>;

/// Result type alias for build operations
pub type BuildResult<T> = std::result::Result<T, BuildError>;

/// Result type alias for library directory operations
pub type LibraryResult<T> = std::result::Result<T, LibraryError>;
