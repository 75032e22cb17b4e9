//! Context-sensitive completion.
//!
//! Completion is a pure function of the line typed so far and the token
//! under the cursor; nothing is carried between requests except the
//! short-lived query cache. The decision order is:
//!
//! 1. blank line: every internal command and every kubectl sub-command
//! 2. sentinel line: internal command names, then the command's completer
//! 3. anything else: kubectl sub-command names, then the sub-command's
//!    completer (resource types, instances, or file paths)
//!
//! Backend failures never escape [`CompletionEngine::complete`]; they are
//! logged and produce no candidates.

mod cache;
pub mod kubectl;
pub mod path;

pub use cache::{CachedQueries, QueryKey};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::backend::Backend;
use crate::commands::CommandRegistry;
use crate::error::{ShellError, ShellResult};

/// Characters that separate completable words.
///
/// Neither the sentinel nor `-` splits a word: `/setns` and `--namespace`
/// are single tokens.
pub const WORD_DELIMITERS: &[char] = &[' ', '\t', '\n'];

/// Computes the argument candidates for one command.
pub type Completer = fn(&CompletionScope<'_>, &ArgCursor<'_>) -> ShellResult<Vec<String>>;

/// What a completer may consult.
pub struct CompletionScope<'a> {
    /// Backend listings.
    pub queries: &'a CachedQueries,
    /// Internal commands.
    pub commands: &'a CommandRegistry,
    /// Directory relative paths are completed against.
    pub directory: &'a Path,
}

/// Cursor position within a command's arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgCursor<'a> {
    /// Token under the cursor (possibly empty).
    pub text: &'a str,
    /// Arguments already completed before the cursor token.
    pub completed: Vec<&'a str>,
}

impl<'a> ArgCursor<'a> {
    /// Splits the argument text after a command name.
    ///
    /// `args` is everything after the command up to the cursor; `text` is
    /// its trailing token (empty when the cursor follows whitespace).
    #[must_use]
    pub fn new(args: &'a str, text: &'a str) -> Self {
        let before = if text.is_empty() {
            args
        } else {
            args.strip_suffix(text).unwrap_or(args)
        };
        Self {
            text,
            completed: before.split_whitespace().collect(),
        }
    }

    /// Zero-based index of the argument being completed.
    #[must_use]
    pub fn position(&self) -> usize {
        self.completed.len()
    }

    /// Last completed argument.
    #[must_use]
    pub fn previous(&self) -> Option<&'a str> {
        self.completed.last().copied()
    }
}

/// Start offset of the word ending at the end of `line`.
#[must_use]
pub fn word_start(line: &str) -> usize {
    line.char_indices()
        .rev()
        .find(|(_, c)| WORD_DELIMITERS.contains(c))
        .map_or(0, |(i, c)| i + c.len_utf8())
}

/// Keeps the items that extend `text`, dropping an exact match.
///
/// An item equal to the typed text would complete to itself.
#[must_use]
pub fn matching(items: Vec<String>, text: &str) -> Vec<String> {
    items
        .into_iter()
        .filter(|item| item.starts_with(text) && item != text)
        .collect()
}

/// Completion engine shared between the shell and the line editor.
pub struct CompletionEngine {
    queries: CachedQueries,
    commands: Arc<CommandRegistry>,
    sentinel: char,
    directory: PathBuf,
}

impl CompletionEngine {
    /// Creates an engine over `backend`, caching listings for `cache_ttl`.
    #[must_use]
    pub fn new(
        backend: Arc<dyn Backend>,
        commands: Arc<CommandRegistry>,
        sentinel: char,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            queries: CachedQueries::new(backend, cache_ttl),
            commands,
            sentinel,
            directory: PathBuf::from("."),
        }
    }

    /// Completes relative file paths against `directory` instead of the
    /// working directory.
    #[must_use]
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Candidates for `text`, the token under the cursor, given `line`, the
    /// input from its start up to the cursor.
    ///
    /// Never fails: backend errors degrade to an empty list.
    #[must_use]
    pub fn complete(&self, text: &str, line: &str) -> Vec<String> {
        match self.try_complete(text, line) {
            Ok(candidates) => {
                debug!(line, text, count = candidates.len(), "completed");
                candidates
            }
            Err(err) => {
                let err = match err {
                    ShellError::CompletionQuery(_) => err,
                    other => ShellError::CompletionQuery(other.to_string()),
                };
                warn!(line, error = %err, "completion unavailable");
                Vec::new()
            }
        }
    }

    /// Like [`complete`](Self::complete) but surfaces backend errors.
    ///
    /// # Errors
    ///
    /// Returns the error of any backend listing the completer needed.
    pub fn try_complete(&self, text: &str, line: &str) -> ShellResult<Vec<String>> {
        let line = line.trim_start();
        if line.trim().is_empty() {
            return Ok(self.all_commands());
        }

        let scope = CompletionScope {
            queries: &self.queries,
            commands: &self.commands,
            directory: &self.directory,
        };

        if let Some(body) = line.strip_prefix(self.sentinel) {
            return match body.split_once(WORD_DELIMITERS) {
                None => Ok(self.internal_names(body)),
                Some((name, args)) => match self.commands.get(name).and_then(|c| c.completer) {
                    Some(completer) => completer(&scope, &ArgCursor::new(args, text)),
                    None => Ok(Vec::new()),
                },
            };
        }

        match line.split_once(WORD_DELIMITERS) {
            None => Ok(kubectl::subcommands_matching(line)),
            Some((subcommand, args)) => match kubectl::completer_for(subcommand) {
                Some(completer) => completer(&scope, &ArgCursor::new(args, text)),
                None => Ok(Vec::new()),
            },
        }
    }

    /// Drops every cached listing; called when the session namespace changes.
    pub fn invalidate(&self) {
        self.queries.invalidate();
    }

    fn internal_names(&self, prefix: &str) -> Vec<String> {
        self.commands
            .names()
            .filter(|name| name.starts_with(prefix))
            .map(|name| format!("{}{name} ", self.sentinel))
            .collect()
    }

    fn all_commands(&self) -> Vec<String> {
        let mut candidates = self.internal_names("");
        candidates.extend(kubectl::subcommands_matching(""));
        candidates
    }
}
