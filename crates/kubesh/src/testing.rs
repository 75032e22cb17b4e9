//! Recording fakes for unit tests.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::backend::{Backend, OutputMode, Structured};
use crate::error::{ShellError, ShellResult};
use crate::shell::{LineReader, ReadOutcome};

/// Canned structured responses keyed by the space-joined argument vector
/// (without the output flag).
#[derive(Debug, Default)]
pub struct FakeBackend {
    names: HashMap<String, Vec<String>>,
    records: HashMap<String, Value>,
    failing: HashMap<String, String>,
    exit_codes: HashMap<String, i32>,
    interactive: Mutex<Vec<String>>,
    structured: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_names(mut self, args: &str, names: &[&str]) -> Self {
        self.names
            .insert(args.into(), names.iter().map(ToString::to_string).collect());
        self
    }

    pub fn with_records(mut self, args: &str, value: Value) -> Self {
        self.records.insert(args.into(), value);
        self
    }

    pub fn with_namespace(self, namespace: &str) -> Self {
        self.with_records(
            "config view",
            json!({
                "current-context": "test",
                "contexts": [{"name": "test", "context": {"namespace": namespace}}]
            }),
        )
    }

    pub fn with_failure(mut self, args: &str, message: &str) -> Self {
        self.failing.insert(args.into(), message.into());
        self
    }

    pub fn with_exit_code(mut self, args: &str, code: i32) -> Self {
        self.exit_codes.insert(args.into(), code);
        self
    }

    pub fn interactive_calls(&self) -> Vec<String> {
        self.interactive.lock().clone()
    }

    pub fn structured_calls(&self) -> Vec<String> {
        self.structured.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.interactive.lock().len() + self.structured.lock().len()
    }
}

impl Backend for FakeBackend {
    fn run_interactive(&self, args: &[&str]) -> ShellResult<i32> {
        let key = args.join(" ");
        self.interactive.lock().push(key.clone());
        Ok(self.exit_codes.get(&key).copied().unwrap_or(0))
    }

    fn run_structured(&self, args: &[&str], mode: OutputMode) -> ShellResult<Structured> {
        let key = args.join(" ");
        self.structured.lock().push(key.clone());
        if let Some(message) = self.failing.get(&key) {
            return Err(ShellError::backend(args, message.clone()));
        }
        match mode {
            OutputMode::Names => Ok(Structured::Names(
                self.names.get(&key).cloned().unwrap_or_default(),
            )),
            OutputMode::Records => Ok(Structured::Records(
                self.records.get(&key).cloned().unwrap_or_else(|| json!({})),
            )),
        }
    }
}

/// Reader replaying a fixed list of outcomes, then end of input.
///
/// Remembers every prompt it was shown.
#[derive(Debug, Clone, Default)]
pub struct ScriptedReader {
    pending: VecDeque<ReadOutcome>,
    prompts: Vec<String>,
}

impl ScriptedReader {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pending: lines
                .into_iter()
                .map(|line| ReadOutcome::Line(line.into()))
                .collect(),
            prompts: Vec::new(),
        }
    }

    pub fn then(mut self, outcome: ReadOutcome) -> Self {
        self.pending.push_back(outcome);
        self
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, prompt: &str) -> ReadOutcome {
        self.prompts.push(prompt.to_string());
        self.pending.pop_front().unwrap_or(ReadOutcome::Eof)
    }
}
