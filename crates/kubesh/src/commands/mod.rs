//! Internal commands.
//!
//! Each command is registered once under its name with a handler, an
//! optional argument completer and its documentation:
//! - [`namespace`] - `setns` and `lsns`
//! - [`help`] - `help`
//! - `exit`

pub mod help;
pub mod namespace;

use std::io::Write;

use crate::backend::Backend;
use crate::complete::Completer;
use crate::error::ShellResult;
use crate::session::SessionState;

/// What the shell loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Read the next line.
    Continue,
    /// Leave the loop.
    Exit,
}

/// Everything a handler may touch while it runs.
pub struct CommandContext<'a> {
    /// Backend gateway.
    pub backend: &'a dyn Backend,
    /// Session state, mutable only through the running handler.
    pub session: &'a mut SessionState,
    /// User-facing output.
    pub out: &'a mut dyn Write,
    /// The registry the command was resolved from.
    pub commands: &'a CommandRegistry,
    /// Sentinel character, for messages.
    pub sentinel: char,
}

/// Runs a command with its argument remainder.
pub type Handler = fn(&mut CommandContext<'_>, &str) -> ShellResult<Outcome>;

/// A registered internal command.
#[derive(Debug, Clone, Copy)]
pub struct InternalCommand {
    /// Name typed after the sentinel.
    pub name: &'static str,
    /// Argument synopsis, e.g. `<namespace>`.
    pub args: &'static str,
    /// Documentation; the first line is the summary.
    pub doc: &'static str,
    /// Handler.
    pub handler: Handler,
    /// Argument completer, if the command has one.
    pub completer: Option<Completer>,
}

impl InternalCommand {
    /// First line of the documentation.
    #[must_use]
    pub fn summary(&self) -> &'static str {
        self.doc.lines().next().unwrap_or_default()
    }

    /// `name args` as typed after the sentinel.
    #[must_use]
    pub fn synopsis(&self) -> String {
        if self.args.is_empty() {
            self.name.to_string()
        } else {
            format!("{} {}", self.name, self.args)
        }
    }
}

/// Name-indexed table of internal commands.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<InternalCommand>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Registry holding the shell's built-in commands.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(InternalCommand {
            name: "exit",
            args: "",
            doc: "Leave the shell.",
            handler: exit,
            completer: None,
        });
        registry.register(help::COMMAND);
        registry.register(namespace::LSNS);
        registry.register(namespace::SETNS);
        registry
    }

    /// Adds a command, replacing any previous one with the same name.
    pub fn register(&mut self, command: InternalCommand) {
        if let Some(slot) = self.commands.iter_mut().find(|c| c.name == command.name) {
            *slot = command;
        } else {
            self.commands.push(command);
        }
    }

    /// Looks a command up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&InternalCommand> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &InternalCommand> {
        self.commands.iter()
    }

    /// Command names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.iter().map(|c| c.name)
    }
}

fn exit(_ctx: &mut CommandContext<'_>, _rest: &str) -> ShellResult<Outcome> {
    Ok(Outcome::Exit)
}
