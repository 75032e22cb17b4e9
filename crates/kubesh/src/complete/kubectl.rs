//! Argument completers for kubectl sub-commands.

use super::path::complete_path_in;
use super::{matching, ArgCursor, Completer, CompletionScope};
use crate::error::ShellResult;

/// Top-level kubectl sub-commands, alphabetical.
pub const SUBCOMMANDS: &[&str] = &[
    "annotate",
    "api-resources",
    "api-versions",
    "apply",
    "attach",
    "auth",
    "autoscale",
    "certificate",
    "cluster-info",
    "completion",
    "config",
    "cordon",
    "cp",
    "create",
    "debug",
    "delete",
    "describe",
    "diff",
    "drain",
    "edit",
    "events",
    "exec",
    "explain",
    "expose",
    "get",
    "kustomize",
    "label",
    "logs",
    "patch",
    "plugin",
    "port-forward",
    "proxy",
    "replace",
    "rollout",
    "run",
    "scale",
    "set",
    "taint",
    "top",
    "uncordon",
    "version",
    "wait",
];

/// Flags whose value is a manifest path.
const FILE_FLAGS: &[&str] = &["-f", "--filename"];

/// Sub-command names starting with `prefix`.
#[must_use]
pub fn subcommands_matching(prefix: &str) -> Vec<String> {
    SUBCOMMANDS
        .iter()
        .filter(|name| name.starts_with(prefix))
        .map(ToString::to_string)
        .collect()
}

/// Completer registered for a sub-command.
#[must_use]
pub fn completer_for(subcommand: &str) -> Option<Completer> {
    match subcommand {
        "get" | "describe" => Some(complete_resource),
        "delete" => Some(complete_delete),
        "apply" | "create" => Some(complete_manifest),
        "logs" => Some(complete_pod),
        "drain" | "cordon" | "uncordon" => Some(complete_node),
        _ => None,
    }
}

fn follows_file_flag(cursor: &ArgCursor<'_>) -> bool {
    cursor
        .previous()
        .is_some_and(|previous| FILE_FLAGS.contains(&previous))
}

/// `<type> <name>`: resource types first, then instances of that type.
fn complete_resource(
    scope: &CompletionScope<'_>,
    cursor: &ArgCursor<'_>,
) -> ShellResult<Vec<String>> {
    match cursor.completed.as_slice() {
        [] => Ok(matching(scope.queries.resource_types()?, cursor.text)),
        [kind] => Ok(matching(scope.queries.resources(kind)?, cursor.text)),
        _ => Ok(Vec::new()),
    }
}

fn complete_delete(
    scope: &CompletionScope<'_>,
    cursor: &ArgCursor<'_>,
) -> ShellResult<Vec<String>> {
    if follows_file_flag(cursor) {
        return Ok(complete_path_in(scope.directory, cursor.text));
    }
    complete_resource(scope, cursor)
}

fn complete_manifest(
    scope: &CompletionScope<'_>,
    cursor: &ArgCursor<'_>,
) -> ShellResult<Vec<String>> {
    if follows_file_flag(cursor) {
        return Ok(complete_path_in(scope.directory, cursor.text));
    }
    Ok(Vec::new())
}

fn complete_instance_of(
    kind: &str,
    scope: &CompletionScope<'_>,
    cursor: &ArgCursor<'_>,
) -> ShellResult<Vec<String>> {
    if cursor.position() > 0 {
        return Ok(Vec::new());
    }
    Ok(matching(scope.queries.resources(kind)?, cursor.text))
}

fn complete_pod(scope: &CompletionScope<'_>, cursor: &ArgCursor<'_>) -> ShellResult<Vec<String>> {
    complete_instance_of("pod", scope, cursor)
}

fn complete_node(scope: &CompletionScope<'_>, cursor: &ArgCursor<'_>) -> ShellResult<Vec<String>> {
    complete_instance_of("node", scope, cursor)
}
