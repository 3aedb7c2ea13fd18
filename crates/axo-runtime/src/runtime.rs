//! Axo runtime API for embedding
//!
//! `Axo` wraps a persistent interpreter behind a small facade: evaluate a
//! source string or run a script file, with failures surfaced as
//! presentation-ready diagnostics.

use crate::diagnostic::Diagnostic;
use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::parser::{ParseError, Parser};
use crate::stdlib::OutputWriter;
use crate::value::{RuntimeError, Value};
use std::cell::RefCell;
use std::path::Path;

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, Vec<Diagnostic>>;

/// Axo runtime instance
///
/// # Examples
///
/// ```
/// use axo_runtime::{Axo, Value};
///
/// let runtime = Axo::new();
/// assert_eq!(runtime.eval("1 + 2;"), Ok(Value::Int(3)));
/// ```
pub struct Axo {
    interpreter: RefCell<Interpreter>,
}

impl Axo {
    /// Create a runtime printing to stdout
    pub fn new() -> Self {
        Self {
            interpreter: RefCell::new(Interpreter::new()),
        }
    }

    /// Create a runtime with a custom output writer
    pub fn with_output(output: OutputWriter) -> Self {
        Self {
            interpreter: RefCell::new(Interpreter::with_output(output)),
        }
    }

    /// Evaluate Axo source text; module paths resolve against the process
    /// working directory
    pub fn eval(&self, source: &str) -> RuntimeResult<Value> {
        self.eval_named(source, "<input>")
    }

    /// Run an Axo script file; module paths resolve against the script's
    /// directory
    pub fn run_file(&self, path: impl AsRef<Path>) -> RuntimeResult<Value> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            vec![Diagnostic::error(
                format!("could not read '{}': {}", path.display(), e),
                crate::span::Span::dummy(),
            )]
        })?;

        {
            let mut interp = self.interpreter.borrow_mut();
            if let Some(dir) = path.parent() {
                if !dir.as_os_str().is_empty() {
                    interp.set_entry_dir(dir.to_path_buf());
                }
            }
            // The entry module itself never re-executes through an import
            if let Ok(canonical) = path.canonicalize() {
                interp.mark_entry_path(canonical);
            }
        }

        self.eval_named(&source, &path.display().to_string())
    }

    fn eval_named(&self, source: &str, file: &str) -> RuntimeResult<Value> {
        let tokens = Lexer::new(source).tokenize();
        let program = Parser::new(tokens)
            .parse()
            .map_err(|e| vec![parse_error_to_diagnostic(&e, source, file)])?;

        self.interpreter
            .borrow_mut()
            .run(&program)
            .map_err(|e| vec![runtime_error_to_diagnostic(&e, source, file)])
    }
}

impl Default for Axo {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a parse error into a diagnostic with snippet and caret width
pub fn parse_error_to_diagnostic(e: &ParseError, source: &str, file: &str) -> Diagnostic {
    Diagnostic::error(&e.message, e.span())
        .with_file(file)
        .with_length(e.lexeme.chars().count().max(1))
        .with_source(source)
}

/// Convert a runtime error into a diagnostic
pub fn runtime_error_to_diagnostic(e: &RuntimeError, source: &str, file: &str) -> Diagnostic {
    Diagnostic::error(e.to_string(), e.span())
        .with_file(file)
        .with_source(source)
}
