//! parquet-assembly: prepare parquet-tools jars from a tagged apache/parquet-mr checkout.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use parquet_assembly::AppError;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli::init_tracing(&cli);

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(app) = err.downcast_ref::<AppError>() {
                for line in app.stderr_tail() {
                    tracing::debug!("stderr: {}", line);
                }
            }
            eprintln!("{}", error_report(&err));
            ExitCode::FAILURE
        }
    }
}

/// One-line report of a failure and its causes
fn error_report(err: &anyhow::Error) -> String {
    format!("[ERROR] {:#}", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use parquet_assembly::error::{ConfigError, GitError, LibraryError, ProcessError, ToolError};
    use parquet_assembly::services::ExitStatusCode;
    use std::io;
    use std::path::PathBuf;

    fn report(err: AppError) -> String {
        error_report(&anyhow::Error::from(err))
    }

    #[test]
    fn test_tool_error_reported_once() {
        let err = AppError::from(ToolError::NotFound("mvn".to_string()));
        assert_eq!(report(err), "[ERROR] Could not find mvn");
    }

    #[test]
    fn test_clone_error_reported_once() {
        let err = AppError::from(GitError::CloneFailed {
            repository: "r".to_string(),
            path: PathBuf::from("/s/t"),
            code: ExitStatusCode::from(Some(128)),
            stderr_tail: vec!["fatal: Remote branch not found".to_string()],
        });
        assert_eq!(
            report(err),
            "[ERROR] Failed to clone repository r into /s/t, code=128"
        );
    }

    #[test]
    fn test_io_error_includes_cause_once() {
        let source = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = AppError::from(LibraryError::io("/lib/x.jar", source));
        assert_eq!(report(err), "[ERROR] I/O error at /lib/x.jar: denied");
    }

    #[test]
    fn test_spawn_error_includes_cause_once() {
        let err = AppError::from(GitError::from(ProcessError::Spawn {
            program: PathBuf::from("/usr/bin/git"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        }));
        assert_eq!(report(err), "[ERROR] Failed to spawn /usr/bin/git: missing");
    }

    #[test]
    fn test_context_prefixes_config_error() {
        let result: std::result::Result<(), AppError> = Err(ConfigError::NotFound(
            PathBuf::from("/etc/assembly.toml"),
        )
        .into());
        let err = result.context("failed to load configuration").unwrap_err();
        assert_eq!(
            error_report(&err),
            "[ERROR] failed to load configuration: Configuration file not found: /etc/assembly.toml"
        );
    }
}
