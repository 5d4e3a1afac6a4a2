//! Process execution service for running external tools.
//!
//! Runs a command to completion on the calling thread. Stdout goes straight to
//! the console; stderr is forwarded line by line while the last few lines are
//! retained for error reports.

use crate::error::ProcessError;
use std::collections::VecDeque;
use std::ffi::{OsStr, OsString};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Command, Stdio};

/// Exit code of a finished process; `None` when it was terminated by a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatusCode(Option<i32>);

impl ExitStatusCode {
    pub fn code(&self) -> Option<i32> {
        self.0
    }

    pub fn is_success(&self) -> bool {
        self.0 == Some(0)
    }
}

impl From<Option<i32>> for ExitStatusCode {
    fn from(code: Option<i32>) -> Self {
        Self(code)
    }
}

impl std::fmt::Display for ExitStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(code) => write!(f, "{}", code),
            None => write!(f, "signal"),
        }
    }
}

/// Result of a finished process
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub code: ExitStatusCode,
    /// Last lines written to stderr, oldest first
    pub stderr_tail: Vec<String>,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        self.code.is_success()
    }
}

/// Blocking process runner
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    tail_lines: usize,
}

impl ProcessRunner {
    /// Create a runner keeping `tail_lines` lines of stderr
    pub fn new(tail_lines: usize) -> Self {
        Self { tail_lines }
    }

    /// Run `program` with `args` and wait for it to exit
    pub fn run<I, S>(
        &self,
        program: &Path,
        args: I,
        working_dir: Option<&Path>,
    ) -> Result<ProcessOutcome, ProcessError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        tracing::debug!("Running {} {:?}", program.display(), args);

        let mut command = Command::new(program);
        command
            .args(&args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped());
        if let Some(dir) = working_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| ProcessError::Spawn {
            program: program.to_path_buf(),
            source,
        })?;

        // Forward stderr on a helper thread so a chatty build cannot fill the pipe
        let tail_lines = self.tail_lines;
        let forwarder = child
            .stderr
            .take()
            .map(|stderr| std::thread::spawn(move || forward_stderr(stderr, tail_lines)));

        let status = child.wait().map_err(|source| ProcessError::Wait {
            program: program.to_path_buf(),
            source,
        })?;

        let stderr_tail = forwarder
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        tracing::debug!("{} exited with {:?}", program.display(), status.code());

        Ok(ProcessOutcome {
            code: ExitStatusCode::from(status.code()),
            stderr_tail,
        })
    }
}

fn forward_stderr(stderr: impl std::io::Read, tail_lines: usize) -> Vec<String> {
    let mut tail: VecDeque<String> = VecDeque::with_capacity(tail_lines);
    let mut reader = BufReader::new(stderr);
    let mut console = std::io::stderr();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(&buf);
                let line = text.trim_end_matches(['\n', '\r']).to_string();
                let _ = writeln!(console, "{}", line);
                if tail_lines > 0 {
                    if tail.len() == tail_lines {
                        tail.pop_front();
                    }
                    tail.push_back(line);
                }
            }
            Err(e) => {
                tracing::debug!("Stopped forwarding stderr: {}", e);
                break;
            }
        }
    }

    tail.into_iter().collect()
}

/// Display a command line for logs
pub fn command_line(program: &Path, args: &[OsString]) -> String {
    let mut parts = vec![program.display().to_string()];
    parts.extend(args.iter().map(|a| a.to_string_lossy().into_owned()));
    parts.join(" ")
}

/// Convert a path argument into an owned command argument
pub(crate) fn path_arg(path: &Path) -> OsString {
    path.as_os_str().to_owned()
}
