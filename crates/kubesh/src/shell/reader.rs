//! Line input abstraction.

/// Result of reading one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A line of input, without the trailing newline.
    Line(String),
    /// The user abandoned the current line (Ctrl-C).
    Interrupted,
    /// End of input, or an input stream that can no longer be read.
    Eof,
}

/// Source of input lines for the shell loop.
pub trait LineReader {
    /// Shows `prompt` and reads the next line.
    fn read_line(&mut self, prompt: &str) -> ReadOutcome;
}
