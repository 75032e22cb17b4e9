//! Session state and prompt rendering.

/// Placeholder shown in the prompt when no namespace is known.
pub const NO_NAMESPACE: &str = "---";

/// Marker prefixed to the prompt after a failed command.
pub const FAILURE_MARKER: char = '!';

/// Shell-local state carried between input lines.
///
/// The namespace mirrors what the backend had persisted at the last read or
/// successful switch. Changes made outside the shell are not noticed until
/// the next read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    namespace: Option<String>,
    last_command_failed: bool,
}

impl SessionState {
    /// Creates an empty session.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            namespace: None,
            last_command_failed: false,
        }
    }

    /// Active namespace, if known.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Records the namespace read from or switched on the backend.
    ///
    /// Returns `true` if the value changed.
    pub fn set_namespace(&mut self, namespace: Option<String>) -> bool {
        let namespace = namespace.filter(|ns| !ns.is_empty());
        let changed = self.namespace != namespace;
        self.namespace = namespace;
        changed
    }

    /// Whether the last evaluated line's command failed.
    #[must_use]
    pub const fn last_command_failed(&self) -> bool {
        self.last_command_failed
    }

    /// Clears the failure flag; called before every line is evaluated.
    pub fn begin_line(&mut self) {
        self.last_command_failed = false;
    }

    /// Marks the current line's command as failed.
    pub fn mark_failed(&mut self) {
        self.last_command_failed = true;
    }

    /// Renders the prompt, e.g. `!(kube-system) ` or `(---) `.
    #[must_use]
    pub fn render_prompt(&self) -> String {
        let mut prompt = String::new();
        if self.last_command_failed {
            prompt.push(FAILURE_MARKER);
        }
        prompt.push('(');
        prompt.push_str(self.namespace().unwrap_or(NO_NAMESPACE));
        prompt.push_str(") ");
        prompt
    }
}
