//! rustyline integration.
//!
//! [`EditorSession`] owns the terminal line editor for the lifetime of the
//! shell loop. History is loaded when the session opens and saved when it
//! is dropped, so every way out of the loop (`/exit`, end of input, a
//! panic unwinding through it) leaves the history file written.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, Editor, Helper};
use tracing::{debug, warn};

use super::reader::{LineReader, ReadOutcome};
use crate::complete::{word_start, CompletionEngine};
use crate::error::{ShellError, ShellResult};

/// rustyline helper delegating tab completion to the [`CompletionEngine`].
pub struct ShellHelper {
    engine: Arc<CompletionEngine>,
}

impl ShellHelper {
    /// Creates a helper over `engine`.
    #[must_use]
    pub const fn new(engine: Arc<CompletionEngine>) -> Self {
        Self { engine }
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before = line.get(..pos).unwrap_or(line);
        let start = word_start(before);
        let candidates = self
            .engine
            .complete(&before[start..], before)
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}

/// Terminal line editor bound to one shell run.
pub struct EditorSession {
    editor: Editor<ShellHelper, DefaultHistory>,
    history_file: Option<PathBuf>,
}

impl EditorSession {
    /// Opens the editor, loading history from `history_file` if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialised.
    pub fn open(engine: Arc<CompletionEngine>, history_file: Option<PathBuf>) -> ShellResult<Self> {
        let config = Config::builder()
            .completion_type(CompletionType::List)
            .auto_add_history(false)
            .build();
        let mut editor: Editor<ShellHelper, DefaultHistory> = Editor::with_config(config)
            .map_err(|e| ShellError::Io(io::Error::other(e.to_string())))?;
        editor.set_helper(Some(ShellHelper::new(engine)));

        if let Some(path) = &history_file {
            if let Err(err) = editor.load_history(path) {
                debug!(path = %path.display(), error = %err, "no history loaded");
            }
        }

        Ok(Self {
            editor,
            history_file,
        })
    }
}

impl LineReader for EditorSession {
    fn read_line(&mut self, prompt: &str) -> ReadOutcome {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(err) = self.editor.add_history_entry(line.as_str()) {
                        debug!(error = %err, "failed to record history entry");
                    }
                }
                ReadOutcome::Line(line)
            }
            Err(ReadlineError::Interrupted) => ReadOutcome::Interrupted,
            Err(ReadlineError::Eof) => ReadOutcome::Eof,
            Err(err) => {
                warn!(error = %err, "input stream failed; treating as end of input");
                ReadOutcome::Eof
            }
        }
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        if let Some(path) = &self.history_file {
            if let Err(err) = self.editor.save_history(path) {
                warn!(path = %path.display(), error = %err, "failed to save history");
            }
        }
    }
}
