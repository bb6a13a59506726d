//! Shared process execution helpers.

use crate::runtime::error::{DocwardenError, DocwardenResult};
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default upper bound for a single child process.
pub const DEFAULT_PROCESS_TIMEOUT: Duration = Duration::from_secs(10);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Shared process runner for short-lived probe commands.
///
/// Every invocation is bounded by a timeout. A child that outlives it is killed and reported as
/// a [`DocwardenError::process_exit`] so callers can fall back instead of hanging.
#[derive(Clone, Copy, Debug)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner {
    /// Create a process runner with the default timeout.
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_PROCESS_TIMEOUT,
        }
    }

    /// Create a process runner with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Return whether the given program is available by checking `--version`.
    pub fn command_available(&self, program: &str) -> bool {
        Command::new(program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Run a command in `cwd` and capture its stdout.
    ///
    /// Non-zero exits, launch failures, and timeouts are all errors. Stderr is discarded. Stdout
    /// is drained on a separate thread so a chatty child never stalls on a full pipe.
    pub fn capture_stdout(
        &self,
        cwd: &Path,
        program: &str,
        args: &[&str],
    ) -> DocwardenResult<String> {
        debug!(program, ?args, cwd = %cwd.display(), "running probe command");
        let mut child = Command::new(program)
            .current_dir(cwd)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| {
                DocwardenError::process_launch(format!("failed to start `{program}`: {err}"))
            })?;

        let reader = child.stdout.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut stdout = String::new();
                pipe.read_to_string(&mut stdout).map(|_| stdout)
            })
        });

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    // The reader exits once every holder of the pipe is gone.
                    return Err(DocwardenError::process_exit(format!(
                        "`{program}` timed out after {}ms",
                        self.timeout.as_millis()
                    )));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(err) => {
                    let _ = child.kill();
                    return Err(DocwardenError::io(format!(
                        "failed to wait for `{program}`: {err}"
                    )));
                }
            }
        };

        let stdout = match reader.map(|reader| reader.join()) {
            None => String::new(),
            Some(Ok(Ok(stdout))) => stdout,
            Some(Ok(Err(err))) => {
                return Err(DocwardenError::io(format!(
                    "failed to read `{program}` output: {err}"
                )))
            }
            Some(Err(_)) => {
                return Err(DocwardenError::io(format!(
                    "output reader for `{program}` panicked"
                )))
            }
        };

        if status.success() {
            Ok(stdout)
        } else {
            Err(DocwardenError::process_exit(format!(
                "`{program}` exited with status {status}"
            )))
        }
    }
}
