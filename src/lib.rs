//! parquet-assembly: build parquet-tools jars from a tagged apache/parquet-mr checkout
//!
//! This crate stages a shallow clone of a tag, runs the upstream Maven build for
//! the parquet-tools sub-project, and harvests the resulting jars into a local
//! library directory, recording completion with a marker file.

pub mod config;
pub mod domain;
pub mod error;
pub mod orchestrator;
pub mod services;

#[cfg(all(test, unix))]
mod test_support;

pub use config::AssemblyConfig;
pub use error::{AppError, Result};
pub use orchestrator::{AssemblyReport, AssemblyRequest, OrchestratorSettings, StagingOrchestrator};
