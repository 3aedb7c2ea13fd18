//! Diagnostics for errors surfaced to the user
//!
//! Lex, parse, and runtime failures all render through `Diagnostic`, which
//! carries the position, the offending source line, and a caret label.

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// A diagnostic message with source context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Main message
    pub message: String,
    /// File path, or `<input>` when evaluating a string
    pub file: String,
    /// Line number (1-based; 0 when unknown)
    pub line: usize,
    /// Column number (1-based; 0 when unknown)
    pub column: usize,
    /// Width of the caret underline
    pub length: usize,
    /// The source line the diagnostic points at
    pub snippet: String,
}

impl Diagnostic {
    /// Create a diagnostic from a message and position
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            file: "<input>".to_string(),
            line: span.line as usize,
            column: span.column as usize,
            length: 1,
            snippet: String::new(),
        }
    }

    /// Set the file path
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    /// Set the caret width (at least 1)
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length.max(1);
        self
    }

    /// Attach the offending source line, looked up from the full source
    pub fn with_source(mut self, source: &str) -> Self {
        if self.line > 0 {
            self.snippet = source
                .lines()
                .nth(self.line - 1)
                .unwrap_or("")
                .to_string();
        }
        self
    }

    /// Format as a human-readable block with a caret under the offending
    /// token when a snippet is available
    pub fn to_human_string(&self) -> String {
        let mut out = format!("error: {}\n", self.message);

        if self.line > 0 {
            out.push_str(&format!(
                "  --> {}:{}:{}\n",
                self.file, self.line, self.column
            ));
        }

        if !self.snippet.is_empty() {
            let line_label = self.line.to_string();
            let gutter = " ".repeat(line_label.len());
            out.push_str(&format!("{} |\n", gutter));
            out.push_str(&format!("{} | {}\n", line_label, self.snippet));
            let pad = " ".repeat(self.column.saturating_sub(1));
            out.push_str(&format!("{} | {}{}\n", gutter, pad, "^".repeat(self.length)));
        }

        out
    }
}
