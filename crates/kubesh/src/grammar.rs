//! Input line classification.
//!
//! One input channel carries two grammars:
//! - internal commands: `<sentinel><name>[ <rest>]`, handled by the shell
//! - passthrough commands: anything else, forwarded to the backend as a
//!   whitespace-split argument vector

use crate::error::{ShellError, ShellResult};

/// Default sentinel marking internal commands.
pub const DEFAULT_SENTINEL: char = '/';

/// A classified input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine<'a> {
    /// Blank input.
    Empty,
    /// Internal command with its unparsed argument remainder.
    Internal {
        /// Command name without the sentinel.
        name: &'a str,
        /// Trimmed text after the name, possibly empty.
        rest: &'a str,
    },
    /// Backend invocation.
    Passthrough {
        /// Argument vector, sub-command first.
        args: Vec<&'a str>,
    },
}

impl ParsedLine<'_> {
    /// Whether the line addresses the shell itself.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}

/// Classifies one input line.
///
/// # Errors
///
/// Returns [`ShellError::Syntax`] for a sentinel with no command name.
pub fn parse_line(raw: &str, sentinel: char) -> ShellResult<ParsedLine<'_>> {
    let line = raw.trim();
    if line.is_empty() {
        return Ok(ParsedLine::Empty);
    }

    let Some(body) = line.strip_prefix(sentinel) else {
        return Ok(ParsedLine::Passthrough {
            args: line.split_whitespace().collect(),
        });
    };

    let (name, rest) = match body.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (body, ""),
    };
    if name.is_empty() {
        return Err(ShellError::syntax(format!(
            "missing command name after '{sentinel}'"
        )));
    }
    Ok(ParsedLine::Internal { name, rest })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ShellResult<ParsedLine<'_>> {
        parse_line(raw, DEFAULT_SENTINEL)
    }

    #[test]
    fn blank_lines_are_empty() {
        assert_eq!(parse("").expect("parse"), ParsedLine::Empty);
        assert_eq!(parse("   \t").expect("parse"), ParsedLine::Empty);
    }

    #[test]
    fn bare_sentinel_is_syntax_error() {
        let err = parse("/").unwrap_err();
        assert!(matches!(err, ShellError::Syntax(_)));
        assert_eq!(err.to_string(), "syntax error: missing command name after '/'");
    }

    #[test]
    fn sentinel_followed_by_space_is_syntax_error() {
        assert!(matches!(parse("/ setns foo"), Err(ShellError::Syntax(_))));
    }

    #[test]
    fn internal_command_without_args() {
        let parsed = parse("/lsns").expect("parse");
        assert_eq!(parsed, ParsedLine::Internal { name: "lsns", rest: "" });
        assert!(parsed.is_internal());
    }

    #[test]
    fn internal_command_keeps_rest_trimmed() {
        let parsed = parse("  /setns   kube-system  ").expect("parse");
        assert_eq!(
            parsed,
            ParsedLine::Internal {
                name: "setns",
                rest: "kube-system"
            }
        );
    }

    #[test]
    fn passthrough_splits_on_whitespace() {
        let parsed = parse("get  pods\t-n kube-system").expect("parse");
        assert_eq!(
            parsed,
            ParsedLine::Passthrough {
                args: vec!["get", "pods", "-n", "kube-system"]
            }
        );
        assert!(!parsed.is_internal());
    }

    #[test]
    fn custom_sentinel() {
        let parsed = parse_line(":help setns", ':').expect("parse");
        assert_eq!(parsed, ParsedLine::Internal { name: "help", rest: "setns" });
        let passthrough = parse_line("/help", ':').expect("parse");
        assert!(!passthrough.is_internal());
    }
}
