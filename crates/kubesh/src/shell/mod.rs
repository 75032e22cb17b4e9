//! The read-eval loop.
//!
//! Per input line: reset the failure flag, classify, run, update the
//! session, re-render the prompt. Everything is synchronous; a running
//! backend command blocks the prompt until it exits.

mod editor;
mod reader;

pub use editor::{EditorSession, ShellHelper};
pub use reader::{LineReader, ReadOutcome};

use std::io::Write;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::backend::{Backend, KubectlQueries};
use crate::commands::{CommandContext, CommandRegistry, Outcome};
use crate::complete::CompletionEngine;
use crate::config::ShellConfig;
use crate::error::{ShellError, ShellResult};
use crate::grammar::{parse_line, ParsedLine};
use crate::session::SessionState;

/// Interactive shell over a backend.
pub struct Shell<W: Write> {
    backend: Arc<dyn Backend>,
    commands: Arc<CommandRegistry>,
    completion: Arc<CompletionEngine>,
    session: SessionState,
    sentinel: char,
    refresh_namespace: bool,
    namespace_loaded: bool,
    out: W,
}

impl<W: Write> Shell<W> {
    /// Creates a shell with the built-in internal commands.
    pub fn new(backend: Arc<dyn Backend>, config: &ShellConfig, out: W) -> Self {
        Self::with_commands(backend, CommandRegistry::builtin(), config, out)
    }

    /// Creates a shell with a custom command registry.
    pub fn with_commands(
        backend: Arc<dyn Backend>,
        commands: CommandRegistry,
        config: &ShellConfig,
        out: W,
    ) -> Self {
        let commands = Arc::new(commands);
        let completion = Arc::new(CompletionEngine::new(
            Arc::clone(&backend),
            Arc::clone(&commands),
            config.sentinel,
            config.completion_cache_ttl(),
        ));
        Self {
            backend,
            commands,
            completion,
            session: SessionState::new(),
            sentinel: config.sentinel,
            refresh_namespace: config.refresh_namespace,
            namespace_loaded: false,
            out,
        }
    }

    /// Completion engine to hand to the line editor.
    #[must_use]
    pub fn completion_engine(&self) -> Arc<CompletionEngine> {
        Arc::clone(&self.completion)
    }

    /// Current session state.
    #[must_use]
    pub const fn session(&self) -> &SessionState {
        &self.session
    }

    /// Consumes the shell, returning its output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Writes the one-line greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn print_banner(&mut self) -> ShellResult<()> {
        writeln!(
            self.out,
            "kubesh: lines starting with '{s}' are shell commands ({s}help); \
             everything else runs as kubectl.",
            s = self.sentinel
        )?;
        Ok(())
    }

    /// Renders the prompt, reading the backend namespace when it is not
    /// known yet (or on every call with `refresh_namespace`).
    pub fn prompt(&mut self) -> String {
        if self.refresh_namespace || !self.namespace_loaded {
            self.reload_namespace();
        }
        self.session.render_prompt()
    }

    /// Runs until `exit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error only if the output stream fails.
    pub fn run<R: LineReader>(&mut self, reader: &mut R) -> ShellResult<()> {
        loop {
            let prompt = self.prompt();
            match reader.read_line(&prompt) {
                ReadOutcome::Line(line) => {
                    if self.eval_line(&line) == Outcome::Exit {
                        break;
                    }
                }
                ReadOutcome::Interrupted => {}
                ReadOutcome::Eof => {
                    writeln!(self.out)?;
                    break;
                }
            }
            self.out.flush()?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Evaluates one input line.
    pub fn eval_line(&mut self, line: &str) -> Outcome {
        self.session.begin_line();
        let parsed = match parse_line(line, self.sentinel) {
            Ok(parsed) => parsed,
            Err(err) => {
                self.report(&err);
                return Outcome::Continue;
            }
        };

        match parsed {
            ParsedLine::Empty => Outcome::Continue,
            ParsedLine::Internal { name, rest } => self.run_internal(name, rest),
            ParsedLine::Passthrough { args } => {
                self.run_passthrough(&args);
                Outcome::Continue
            }
        }
    }

    fn run_internal(&mut self, name: &str, rest: &str) -> Outcome {
        let commands = Arc::clone(&self.commands);
        let Some(command) = commands.get(name) else {
            self.report(&ShellError::UnknownCommand(name.to_string()));
            return Outcome::Continue;
        };
        debug!(command = name, rest, "running internal command");

        let namespace_before = self.session.namespace().map(ToOwned::to_owned);
        let result = {
            let mut ctx = CommandContext {
                backend: self.backend.as_ref(),
                session: &mut self.session,
                out: &mut self.out,
                commands: &commands,
                sentinel: self.sentinel,
            };
            (command.handler)(&mut ctx, rest)
        };
        if self.session.namespace() != namespace_before.as_deref() {
            self.completion.invalidate();
        }

        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                if err.sets_failure_marker() {
                    self.session.mark_failed();
                }
                self.report(&err);
                Outcome::Continue
            }
        }
    }

    fn run_passthrough(&mut self, args: &[&str]) {
        match self.backend.run_interactive(args) {
            Ok(0) => {}
            Ok(code) => {
                debug!(code, "backend exited non-zero");
                self.session.mark_failed();
            }
            Err(err) => {
                self.session.mark_failed();
                self.report(&err);
            }
        }
    }

    fn reload_namespace(&mut self) {
        match self.backend.current_namespace() {
            Ok(namespace) => {
                if self.session.set_namespace(namespace) {
                    self.completion.invalidate();
                }
            }
            Err(err) => warn!(error = %err, "failed to read current namespace"),
        }
        self.namespace_loaded = true;
    }

    fn report(&mut self, err: &ShellError) {
        debug!(error = ?err, "command error");
        if let Err(io_err) = writeln!(self.out, "*** {err}") {
            warn!(error = %io_err, "failed to report error");
        }
    }
}
