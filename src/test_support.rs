//! Shared fixtures for tests that spawn fake external tools.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Serializes tests that write and then exec scripts.
///
/// A script still open for writing in one thread while another thread forks
/// makes exec fail with ETXTBSY.
pub fn process_lock() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Write an executable `/bin/sh` script
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Stand-ins for git and mvn that log their arguments
pub struct FakeTools {
    pub git: PathBuf,
    pub mvn: PathBuf,
    pub git_log: PathBuf,
    pub mvn_log: PathBuf,
}

impl FakeTools {
    /// Create both tools in `dir`, exiting with the given codes
    pub fn new(dir: &Path, git_exit: i32, mvn_exit: i32) -> Self {
        let git_log = dir.join("git.log");
        let mvn_log = dir.join("mvn.log");

        let git = write_script(
            dir,
            "fake-git",
            &format!(
                "echo \"$@\" >> \"{log}\"\n\
                 if [ {code} -ne 0 ]; then echo 'fatal: Remote branch not found' >&2; exit {code}; fi\n\
                 for last; do :; done\n\
                 mkdir -p \"$last/parquet-tools\"\n",
                log = git_log.display(),
                code = git_exit,
            ),
        );

        let mvn = write_script(
            dir,
            "fake-mvn",
            &format!(
                "echo \"$@\" >> \"{log}\"\n\
                 if [ {code} -ne 0 ]; then echo '[ERROR] BUILD FAILURE' >&2; exit {code}; fi\n\
                 mkdir -p \"$2/target/classes\"\n\
                 echo jar > \"$2/target/parquet-tools-1.8.1.jar\"\n\
                 echo pom > \"$2/target/parquet-tools-1.8.1.pom\"\n\
                 echo shaded > \"$2/target/original-parquet-tools-1.8.1.jar\"\n",
                log = mvn_log.display(),
                code = mvn_exit,
            ),
        );

        Self {
            git,
            mvn,
            git_log,
            mvn_log,
        }
    }

    /// Logged invocations of a tool, one line per call
    pub fn calls(log: &Path) -> Vec<String> {
        fs::read_to_string(log)
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
