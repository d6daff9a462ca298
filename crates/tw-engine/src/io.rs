//! Text input and output.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Where the engine writes text and asks for answers.
pub trait Io {
    /// Show text to the player.
    fn render(&mut self, text: &str);

    /// Read one line of input. `None` means no answer is available yet.
    fn request_line(&mut self) -> Option<String>;
}

/// Io backed by queued input lines and captured output. Used in tests and
/// for replaying transcripts.
#[derive(Debug, Clone, Default)]
pub struct ScriptedIo {
    input: VecDeque<String>,
    output: Vec<String>,
}

impl ScriptedIo {
    /// Create an Io with no queued input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an Io that will answer with these lines in order.
    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            output: Vec::new(),
        }
    }

    /// Queue another input line.
    pub fn push_input(&mut self, line: impl Into<String>) {
        self.input.push_back(line.into());
    }

    /// Everything rendered so far.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// The most recent rendered text.
    pub fn last_output(&self) -> Option<&str> {
        self.output.last().map(String::as_str)
    }

    /// Rendered text joined by newlines.
    pub fn transcript(&self) -> String {
        self.output.join("\n")
    }

    /// Drain the captured output.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }
}

impl Io for ScriptedIo {
    fn render(&mut self, text: &str) {
        self.output.push(text.to_string());
    }

    fn request_line(&mut self) -> Option<String> {
        self.input.pop_front()
    }
}

/// Io over the process's standard streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdIo;

impl Io for StdIo {
    fn render(&mut self, text: &str) {
        let mut out = std::io::stdout().lock();
        // A closed stdout has nowhere to report to.
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }

    fn request_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}
