//! `help [command]`.

use super::{CommandContext, InternalCommand, Outcome};
use crate::complete::{matching, ArgCursor, CompletionScope};
use crate::error::{ShellError, ShellResult};

/// `help [command]`.
pub const COMMAND: InternalCommand = InternalCommand {
    name: "help",
    args: "[command]",
    doc: "Show internal commands, or the documentation of one command.\n\n\
          Lines that do not start with the sentinel are passed to kubectl.",
    handler: help,
    completer: Some(complete_help),
};

fn help(ctx: &mut CommandContext<'_>, rest: &str) -> ShellResult<Outcome> {
    let topic = rest.trim_start_matches(ctx.sentinel);
    if topic.is_empty() {
        write_overview(ctx)?;
        return Ok(Outcome::Continue);
    }

    let command = ctx
        .commands
        .get(topic)
        .ok_or_else(|| ShellError::UnknownCommand(topic.to_string()))?;
    writeln!(ctx.out, "usage: {}{}", ctx.sentinel, command.synopsis())?;
    writeln!(ctx.out)?;
    writeln!(ctx.out, "{}", command.doc)?;
    Ok(Outcome::Continue)
}

fn write_overview(ctx: &mut CommandContext<'_>) -> ShellResult<()> {
    let synopses: Vec<(String, &str)> = ctx
        .commands
        .iter()
        .map(|command| (command.synopsis(), command.summary()))
        .collect();
    let width = synopses
        .iter()
        .map(|(synopsis, _)| synopsis.len())
        .max()
        .unwrap_or(0);

    writeln!(ctx.out, "Internal commands:")?;
    for (synopsis, summary) in &synopses {
        writeln!(
            ctx.out,
            "  {}{:<width$}  {}",
            ctx.sentinel,
            synopsis,
            summary,
            width = width
        )?;
    }
    writeln!(ctx.out, "Anything else is run as a kubectl command.")?;
    Ok(())
}

fn complete_help(scope: &CompletionScope<'_>, cursor: &ArgCursor<'_>) -> ShellResult<Vec<String>> {
    if cursor.position() > 0 {
        return Ok(Vec::new());
    }
    let names = scope.commands.names().map(ToString::to_string).collect();
    Ok(matching(names, cursor.text))
}
