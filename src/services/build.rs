//! Maven build invocation.

use crate::config::BuildConfig;
use crate::error::{BuildError, BuildResult};
use crate::services::process::{command_line, path_arg, ProcessRunner};
use crate::services::ToolBinding;
use std::ffi::OsString;
use std::path::Path;

/// Goals run for every build, before any extra options
pub const BUILD_GOALS: [&str; 2] = ["clean", "package"];

/// Runs the external build tool over a sub-project
pub struct BuildService {
    mvn: ToolBinding,
    runner: ProcessRunner,
}

impl BuildService {
    pub fn new(mvn: ToolBinding, runner: ProcessRunner) -> Self {
        Self { mvn, runner }
    }

    /// `-f <dir> clean package [options...]`
    pub fn package_args(directory: &Path, options: &[String]) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-f".into(), path_arg(directory)];
        args.extend(BUILD_GOALS.iter().map(OsString::from));
        args.extend(options.iter().map(OsString::from));
        args
    }

    /// Package the project in `directory`, streaming the tool's output
    pub fn package(&self, directory: &Path, options: &[String]) -> BuildResult<()> {
        if !directory.is_dir() {
            return Err(BuildError::InvalidDirectory(directory.to_path_buf()));
        }

        let args = Self::package_args(directory, options);
        tracing::debug!("{}", command_line(&self.mvn.path, &args));

        let outcome = self.runner.run(&self.mvn.path, &args, None)?;
        if !outcome.success() {
            return Err(BuildError::Failed {
                directory: directory.to_path_buf(),
                code: outcome.code,
                stderr_tail: outcome.stderr_tail,
            });
        }

        tracing::info!("Successfully packaged project in {}", directory.display());
        Ok(())
    }
}

/// Options for one build: tests are always skipped, the client profile is optional
pub fn build_options(config: &BuildConfig, client_mode: bool) -> Vec<String> {
    let mut options = Vec::new();
    if !config.skip_tests_option.is_empty() {
        options.push(config.skip_tests_option.clone());
    }
    if client_mode && !config.client_profile_option.is_empty() {
        options.push(config.client_profile_option.clone());
    }
    options
}
