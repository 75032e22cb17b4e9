//! Process-backed [`Backend`] running the kubectl executable.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use super::{Backend, OutputMode, Structured};
use crate::error::{ShellError, ShellResult};

/// Default executable, resolved through `PATH`.
pub const DEFAULT_KUBECTL: &str = "kubectl";

/// The kubectl executable.
#[derive(Debug, Clone)]
pub struct Kubectl {
    program: PathBuf,
}

impl Kubectl {
    /// Creates a backend that runs `program`.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Path of the executable.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn launch_error(&self, args: &[&str], err: &std::io::Error) -> ShellError {
        ShellError::backend(
            args,
            format!("failed to launch {}: {err}", self.program.display()),
        )
    }
}

impl Default for Kubectl {
    fn default() -> Self {
        Self::new(DEFAULT_KUBECTL)
    }
}

impl Backend for Kubectl {
    fn run_interactive(&self, args: &[&str]) -> ShellResult<i32> {
        debug!(program = %self.program.display(), ?args, "running backend interactively");
        let status = Command::new(&self.program)
            .args(args)
            .status()
            .map_err(|e| self.launch_error(args, &e))?;
        // Killed by a signal: no code, still a failure.
        Ok(status.code().unwrap_or(-1))
    }

    fn run_structured(&self, args: &[&str], mode: OutputMode) -> ShellResult<Structured> {
        let mut argv = args.to_vec();
        argv.extend(["-o", mode.format_flag()]);
        debug!(program = %self.program.display(), args = ?argv, "running structured query");

        let output = Command::new(&self.program)
            .args(&argv)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.launch_error(&argv, &e))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if !output.status.success() {
            let message = if stderr.is_empty() {
                format!("exit status {}", output.status.code().unwrap_or(-1))
            } else {
                stderr.to_string()
            };
            return Err(ShellError::backend(argv.as_slice(), message));
        }
        if !stderr.is_empty() {
            warn!(command = %argv.join(" "), stderr = %stderr, "backend reported diagnostics");
        }

        mode.parse(argv.as_slice(), &String::from_utf8_lossy(&output.stdout))
    }
}
