//! Gateway to the backend cluster CLI.
//!
//! The shell never talks to the cluster itself; every real operation is an
//! invocation of the backend executable through the [`Backend`] trait:
//!
//! - [`Backend::run_interactive`] inherits the terminal and reports the exit code
//! - [`Backend::run_structured`] captures standard output and parses it
//!
//! [`KubectlQueries`] layers the handful of kubectl invocations the shell
//! needs (namespace read/switch, resource listings) on top of any backend.

mod kubectl;

pub use kubectl::{Kubectl, DEFAULT_KUBECTL};

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ShellError, ShellResult};

/// How captured backend output is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Newline-delimited resource names.
    Names,
    /// A JSON document.
    Records,
}

impl OutputMode {
    /// Value passed with the trailing `-o` flag.
    #[must_use]
    pub const fn format_flag(self) -> &'static str {
        match self {
            Self::Names => "name",
            Self::Records => "json",
        }
    }

    /// Parses captured standard output according to this mode.
    ///
    /// # Errors
    ///
    /// Returns a backend error if a records document is not valid JSON.
    pub fn parse<S: AsRef<str>>(self, args: &[S], stdout: &str) -> ShellResult<Structured> {
        match self {
            Self::Names => Ok(Structured::Names(parse_names(stdout))),
            Self::Records => serde_json::from_str(stdout)
                .map(Structured::Records)
                .map_err(|e| ShellError::backend(args, format!("invalid JSON output: {e}"))),
        }
    }
}

/// Parsed output of a structured query.
#[derive(Debug, Clone, PartialEq)]
pub enum Structured {
    /// Short resource names.
    Names(Vec<String>),
    /// Structured document.
    Records(Value),
}

/// Splits `-o name` output into short names.
///
/// Blank lines are dropped and any `kind/` qualification is stripped, so
/// `pod/web-0` becomes `web-0`.
#[must_use]
pub fn parse_names(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.rsplit('/').next().unwrap_or(line).to_string())
        .collect()
}

/// An executable that performs cluster operations.
pub trait Backend: Send + Sync {
    /// Runs the backend attached to the caller's standard streams.
    ///
    /// # Errors
    ///
    /// Returns an error only if the process could not be launched; a
    /// non-zero exit is reported through the returned code.
    fn run_interactive(&self, args: &[&str]) -> ShellResult<i32>;

    /// Runs the backend with an output-format flag appended and parses
    /// what it prints.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::BackendInvocation`] if the process fails to
    /// launch, exits non-zero, or prints unparseable output.
    fn run_structured(&self, args: &[&str], mode: OutputMode) -> ShellResult<Structured>;
}

/// Subset of `kubectl config view -o json` the shell reads.
#[derive(Debug, Default, Deserialize)]
struct ConfigView {
    #[serde(rename = "current-context", default)]
    current_context: Option<String>,
    #[serde(default)]
    contexts: Option<Vec<NamedContext>>,
}

#[derive(Debug, Deserialize)]
struct NamedContext {
    #[serde(default)]
    name: String,
    #[serde(default)]
    context: ContextFields,
}

#[derive(Debug, Default, Deserialize)]
struct ContextFields {
    #[serde(default)]
    namespace: Option<String>,
}

/// Extracts the active namespace from a `config view` document.
///
/// The context named by `current-context` wins; otherwise the first
/// context is used.
///
/// # Errors
///
/// Returns a backend error if the document does not have the shape of a
/// kubectl configuration.
pub fn namespace_from_config(view: &Value) -> ShellResult<Option<String>> {
    let view = ConfigView::deserialize(view).map_err(|e| {
        ShellError::backend(&["config", "view"], format!("unexpected document: {e}"))
    })?;
    let contexts = view.contexts.unwrap_or_default();
    let selected = view
        .current_context
        .as_deref()
        .and_then(|current| contexts.iter().find(|ctx| ctx.name == current))
        .or_else(|| contexts.first());
    Ok(selected
        .and_then(|ctx| ctx.context.namespace.clone())
        .filter(|ns| !ns.is_empty()))
}

fn expect_names(args: &[&str], output: Structured) -> ShellResult<Vec<String>> {
    match output {
        Structured::Names(names) => Ok(names),
        Structured::Records(_) => Err(ShellError::backend(args, "expected a name listing")),
    }
}

/// kubectl invocations used by the shell.
pub trait KubectlQueries {
    /// Reads the namespace persisted in the backend configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend query fails.
    fn current_namespace(&self) -> ShellResult<Option<String>>;

    /// Switches the persisted namespace of the current context.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::BackendInvocation`] if the backend exits non-zero.
    fn set_namespace(&self, namespace: &str) -> ShellResult<()>;

    /// Lists namespace names.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend query fails.
    fn namespaces(&self) -> ShellResult<Vec<String>>;

    /// Lists the resource types the cluster serves.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend query fails.
    fn resource_types(&self) -> ShellResult<Vec<String>>;

    /// Lists instance names of one resource type.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend query fails.
    fn resources_of_type(&self, kind: &str) -> ShellResult<Vec<String>>;
}

impl<B: Backend + ?Sized> KubectlQueries for B {
    fn current_namespace(&self) -> ShellResult<Option<String>> {
        let args = ["config", "view"];
        match self.run_structured(&args, OutputMode::Records)? {
            Structured::Records(view) => namespace_from_config(&view),
            Structured::Names(_) => Err(ShellError::backend(&args, "expected a JSON document")),
        }
    }

    fn set_namespace(&self, namespace: &str) -> ShellResult<()> {
        let flag = format!("--namespace={namespace}");
        let args = ["config", "set-context", "--current", flag.as_str()];
        match self.run_interactive(&args)? {
            0 => Ok(()),
            code => Err(ShellError::backend(&args, format!("exit status {code}"))),
        }
    }

    fn namespaces(&self) -> ShellResult<Vec<String>> {
        let args = ["get", "namespaces"];
        expect_names(&args, self.run_structured(&args, OutputMode::Names)?)
    }

    fn resource_types(&self) -> ShellResult<Vec<String>> {
        let args = ["api-resources"];
        expect_names(&args, self.run_structured(&args, OutputMode::Names)?)
    }

    fn resources_of_type(&self, kind: &str) -> ShellResult<Vec<String>> {
        let args = ["get", kind];
        expect_names(&args, self.run_structured(&args, OutputMode::Names)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use serde_json::json;

    #[test]
    fn names_strip_kind_prefix_and_blank_lines() {
        let names = parse_names("pod/web-0\n\npod/web-1\nnamespace/kube-system\n");
        assert_eq!(names, vec!["web-0", "web-1", "kube-system"]);
    }

    #[test]
    fn names_without_prefix_are_kept() {
        assert_eq!(parse_names("pods\ndeployments.apps"), vec!["pods", "deployments.apps"]);
    }

    #[test]
    fn records_mode_rejects_invalid_json() {
        let err = OutputMode::Records.parse(&["config", "view"], "not json").unwrap_err();
        assert!(err.to_string().contains("invalid JSON output"));
    }

    #[test]
    fn namespace_prefers_current_context() {
        let view = json!({
            "current-context": "prod",
            "contexts": [
                {"name": "dev", "context": {"namespace": "dev-ns"}},
                {"name": "prod", "context": {"namespace": "prod-ns"}}
            ]
        });
        assert_eq!(namespace_from_config(&view).expect("decode").as_deref(), Some("prod-ns"));
    }

    #[test]
    fn namespace_falls_back_to_first_context() {
        let view = json!({"contexts": [{"name": "a", "context": {"namespace": "first"}}]});
        assert_eq!(namespace_from_config(&view).expect("decode").as_deref(), Some("first"));
    }

    #[test]
    fn namespace_absent_without_contexts() {
        assert_eq!(namespace_from_config(&json!({"contexts": null})).expect("decode"), None);
        assert_eq!(namespace_from_config(&json!({})).expect("decode"), None);
        let no_ns = json!({"contexts": [{"name": "a", "context": {"cluster": "c"}}]});
        assert_eq!(namespace_from_config(&no_ns).expect("decode"), None);
    }

    #[test]
    fn malformed_config_view_is_backend_error() {
        let view = json!({"contexts": [{"name": "a", "context": null}]});
        let err = namespace_from_config(&view).unwrap_err();
        assert!(matches!(err, ShellError::BackendInvocation { .. }));
        assert!(err.to_string().contains("unexpected document"));

        let backend = FakeBackend::new().with_records("config view", view);
        assert!(backend.current_namespace().is_err());
    }

    #[test]
    fn set_namespace_uses_current_context() {
        let backend = FakeBackend::new();
        backend.set_namespace("team-a").expect("switch");
        assert_eq!(
            backend.interactive_calls(),
            vec!["config set-context --current --namespace=team-a"]
        );
    }

    #[test]
    fn set_namespace_failure_is_backend_error() {
        let backend = FakeBackend::new().with_exit_code(
            "config set-context --current --namespace=nope",
            1,
        );
        let err = backend.set_namespace("nope").unwrap_err();
        assert!(matches!(err, ShellError::BackendInvocation { .. }));
    }

    #[test]
    fn listing_queries_use_expected_arguments() {
        let backend = FakeBackend::new()
            .with_names("get namespaces", &["default", "kube-system"])
            .with_names("api-resources", &["pods", "nodes"])
            .with_names("get pods", &["web-0"]);

        assert_eq!(backend.namespaces().expect("ns"), vec!["default", "kube-system"]);
        assert_eq!(backend.resource_types().expect("types"), vec!["pods", "nodes"]);
        assert_eq!(backend.resources_of_type("pods").expect("pods"), vec!["web-0"]);
    }
}
