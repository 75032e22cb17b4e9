//! # kubesh
//!
//! Interactive shell in front of `kubectl`.
//!
//! Provides:
//! - Internal commands behind a sentinel character (`/setns`, `/lsns`, `/help`, `/exit`)
//! - Passthrough of every other line to `kubectl`
//! - Context-sensitive tab completion (subcommands, resource types and names, files)
//! - A prompt showing the active namespace and whether the last line failed
//!
//! # Architecture
//!
//! The [`shell::Shell`] loop reads lines through a [`shell::LineReader`],
//! classifies them with [`grammar::parse_line`] and either dispatches to the
//! [`commands::CommandRegistry`] or hands the argument vector to the
//! [`backend::Backend`]. The [`complete::CompletionEngine`] answers tab
//! completion from the same registry and backend.
//!
//! ```text
//! ┌─────────────┐  line   ┌─────────┐  argv   ┌─────────┐
//! │ LineReader  │────────►│  Shell  │────────►│ kubectl │
//! └─────────────┘         └─────────┘         └─────────┘
//!        ▲ tab                 │ /cmd              ▲
//!        │                     ▼                   │ -o name / -o json
//! ┌──────────────────┐   ┌──────────┐              │
//! │ CompletionEngine │──►│ Registry │   CachedQueries
//! └──────────────────┘   └──────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
pub mod cli;
pub mod commands;
pub mod complete;
pub mod config;
pub mod error;
pub mod grammar;
pub mod session;
pub mod shell;

#[cfg(test)]
mod testing;

pub use backend::{Backend, Kubectl, KubectlQueries};
pub use cli::Cli;
pub use config::ShellConfig;
pub use error::{ShellError, ShellResult};
pub use session::SessionState;
pub use shell::Shell;
