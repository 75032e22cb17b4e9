//! Shell error types.

use thiserror::Error;

/// Result type alias for shell operations.
pub type ShellResult<T> = Result<T, ShellError>;

/// Errors raised while dispatching lines, querying the backend or completing.
#[derive(Debug, Error)]
pub enum ShellError {
    /// Malformed internal command (missing name or missing required argument).
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Internal command name not present in the registry.
    #[error("unknown internal command: {0}")]
    UnknownCommand(String),

    /// The backend process failed to launch or exited non-zero.
    #[error("backend invocation failed ({command}): {message}")]
    BackendInvocation {
        /// Argument vector that was invoked, space-joined.
        command: String,
        /// Captured error text or launch failure reason.
        message: String,
    },

    /// A backend query issued on behalf of completion failed.
    #[error("completion query failed: {0}")]
    CompletionQuery(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShellError {
    /// Creates a syntax error.
    #[must_use]
    pub fn syntax(msg: impl Into<String>) -> Self {
        Self::Syntax(msg.into())
    }

    /// Creates a backend invocation error for the given argument vector.
    #[must_use]
    pub fn backend<S: AsRef<str>>(args: &[S], message: impl Into<String>) -> Self {
        let command = args
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        Self::BackendInvocation {
            command,
            message: message.into(),
        }
    }

    /// Whether this error, raised by a directly executed command, turns on
    /// the failure marker of the next prompt.
    ///
    /// Syntax and lookup errors are user mistakes reported in place; only
    /// results of actually running something count as command failures.
    #[must_use]
    pub const fn sets_failure_marker(&self) -> bool {
        matches!(self, Self::BackendInvocation { .. } | Self::Io(_))
    }
}
