//! REPL core
//!
//! Frontend-agnostic REPL state: lines accumulate in a buffer until one
//! contains `;` or `}`, then the buffer is parsed and executed against a
//! persistent interpreter. Errors are reported, never fatal.

use crate::diagnostic::Diagnostic;
use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::stdlib::OutputWriter;
use crate::value::Value;

/// Result of feeding one line to the REPL
#[derive(Debug)]
pub struct ReplOutcome {
    /// Value of the last statement, when the buffer was executed cleanly
    pub value: Option<Value>,
    /// Errors from parsing or execution
    pub diagnostics: Vec<Diagnostic>,
    /// True when the line was buffered awaiting more input
    pub pending: bool,
}

impl ReplOutcome {
    fn pending() -> Self {
        Self {
            value: None,
            diagnostics: Vec::new(),
            pending: true,
        }
    }
}

/// Persistent REPL state
pub struct ReplCore {
    interpreter: Interpreter,
    buffer: String,
}

impl ReplCore {
    /// Create a REPL printing to stdout
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
            buffer: String::new(),
        }
    }

    /// Create a REPL with a custom output writer
    pub fn with_output(output: OutputWriter) -> Self {
        Self {
            interpreter: Interpreter::with_output(output),
            buffer: String::new(),
        }
    }

    /// Whether a line asks the REPL to quit
    pub fn is_exit(line: &str) -> bool {
        line.trim() == "exit"
    }

    /// Feed one input line. The buffer executes once a line contains `;` or
    /// `}`; otherwise the line is held for continuation.
    pub fn eval_line(&mut self, line: &str) -> ReplOutcome {
        self.buffer.push_str(line);
        self.buffer.push('\n');

        if !line.contains(';') && !line.contains('}') {
            return ReplOutcome::pending();
        }

        let source = std::mem::take(&mut self.buffer);
        self.eval_source(&source)
    }

    /// Drop any buffered partial input
    pub fn reset_buffer(&mut self) {
        self.buffer.clear();
    }

    fn eval_source(&mut self, source: &str) -> ReplOutcome {
        let tokens = Lexer::new(source).tokenize();
        let program = match Parser::new(tokens).parse() {
            Ok(program) => program,
            Err(e) => {
                let diag = Diagnostic::error(&e.message, e.span())
                    .with_length(e.lexeme.chars().count().max(1))
                    .with_source(source);
                return ReplOutcome {
                    value: None,
                    diagnostics: vec![diag],
                    pending: false,
                };
            }
        };

        match self.interpreter.run(&program) {
            Ok(value) => ReplOutcome {
                value: Some(value),
                diagnostics: Vec::new(),
                pending: false,
            },
            Err(e) => {
                let diag = Diagnostic::error(e.to_string(), e.span()).with_source(source);
                ReplOutcome {
                    value: None,
                    diagnostics: vec![diag],
                    pending: false,
                }
            }
        }
    }
}

impl Default for ReplCore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_detection() {
        assert!(ReplCore::is_exit("exit"));
        assert!(ReplCore::is_exit("  exit  "));
        assert!(!ReplCore::is_exit("exit;"));
    }

    #[test]
    fn test_buffering_until_terminator() {
        let mut repl = ReplCore::new();
        assert!(repl.eval_line("var x: int").pending);
        let outcome = repl.eval_line("= 41;");
        assert!(!outcome.pending);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_state_persists_across_lines() {
        let mut repl = ReplCore::new();
        repl.eval_line("var x: int = 41;");
        let outcome = repl.eval_line("x + 1;");
        assert_eq!(outcome.value, Some(Value::Int(42)));
    }

    #[test]
    fn test_error_does_not_kill_repl() {
        let mut repl = ReplCore::new();
        let outcome = repl.eval_line("nope;");
        assert_eq!(outcome.diagnostics.len(), 1);

        let after = repl.eval_line("1 + 1;");
        assert_eq!(after.value, Some(Value::Int(2)));
    }

    #[test]
    fn test_parse_error_reported_with_position() {
        let mut repl = ReplCore::new();
        let outcome = repl.eval_line("var x: int = ;");
        assert_eq!(outcome.diagnostics.len(), 1);
        assert!(outcome.diagnostics[0].message.contains("(line 1, col 14)"));
    }
}
