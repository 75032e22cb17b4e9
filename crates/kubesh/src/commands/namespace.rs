//! Namespace commands: `setns` and `lsns`.

use tracing::{debug, info};

use super::{CommandContext, InternalCommand, Outcome};
use crate::backend::KubectlQueries;
use crate::complete::{matching, ArgCursor, CompletionScope};
use crate::error::{ShellError, ShellResult};

/// `setns <namespace>`.
pub const SETNS: InternalCommand = InternalCommand {
    name: "setns",
    args: "<namespace>",
    doc: "Switch the active namespace.\n\n\
          The namespace is stored in the current kubectl context, so it also\n\
          applies to kubectl runs outside this shell.",
    handler: setns,
    completer: Some(complete_setns),
};

/// `lsns`.
pub const LSNS: InternalCommand = InternalCommand {
    name: "lsns",
    args: "",
    doc: "List namespaces, one per line.",
    handler: lsns,
    completer: None,
};

fn setns(ctx: &mut CommandContext<'_>, rest: &str) -> ShellResult<Outcome> {
    let mut words = rest.split_whitespace();
    let (Some(namespace), None) = (words.next(), words.next()) else {
        return Err(ShellError::syntax(format!(
            "usage: {}{}",
            ctx.sentinel,
            SETNS.synopsis()
        )));
    };

    ctx.backend.set_namespace(namespace)?;
    ctx.session.set_namespace(Some(namespace.to_string()));
    info!(namespace, "switched namespace");
    Ok(Outcome::Continue)
}

fn lsns(ctx: &mut CommandContext<'_>, rest: &str) -> ShellResult<Outcome> {
    if !rest.is_empty() {
        debug!(rest, "ignoring lsns arguments");
    }
    for namespace in ctx.backend.namespaces()? {
        writeln!(ctx.out, "{namespace}")?;
    }
    Ok(Outcome::Continue)
}

fn complete_setns(scope: &CompletionScope<'_>, cursor: &ArgCursor<'_>) -> ShellResult<Vec<String>> {
    if cursor.position() > 0 {
        return Ok(Vec::new());
    }
    Ok(matching(scope.queries.namespaces()?, cursor.text))
}
