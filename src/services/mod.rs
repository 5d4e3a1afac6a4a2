//! Infrastructure services for parquet-assembly.
//!
//! This module contains:
//! - ToolLocator: resolution of external executables
//! - ProcessRunner: blocking subprocess execution with stderr forwarding
//! - GitService: staging tagged working trees
//! - BuildService: running the external build
//! - LibraryDirectory: cleanup, harvest and completion markers

mod build;
mod git;
mod library;
pub mod process;
mod tools;

pub use build::{build_options, BuildService, BUILD_GOALS};
pub use git::GitService;
pub use library::{distribution_name, LibraryDirectory};
pub use process::{ExitStatusCode, ProcessOutcome, ProcessRunner};
pub use tools::{ToolBinding, ToolLocator};
