//! Domain entities for parquet-assembly.
//!
//! This module contains the core entities:
//! - Tag: the upstream revision being assembled
//! - ArtifactFilter/ArtifactSet: which build outputs are harvested
//! - MarkerNaming/CompletionMarker: the completion sentinel file
//! - AssemblyPhase: lifecycle of one run
//! - Project: the working directory layout

mod artifact;
mod marker;
mod phase;
mod project;
mod tag;

pub use artifact::{ArtifactFilter, ArtifactSet};
pub use marker::{CompletionMarker, MarkerNaming, MARKER_EXTENSION};
pub use phase::AssemblyPhase;
pub use project::Project;
pub use tag::Tag;
