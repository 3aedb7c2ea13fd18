//! Axo Runtime - Core language implementation
//!
//! This library provides the complete Axo language runtime:
//! - Lexical analysis and parsing (including the recursive type grammar)
//! - Tree-walking evaluation with structural runtime type checking
//! - The module system (`import`, `use`, `export`)
//! - The reactive pending-`when` scheduler
//! - Standard library functions and the REPL core

/// Axo runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod ast;
pub mod diagnostic;
pub mod environment;
pub mod interpreter;
pub mod lexer;
pub mod module_loader;
pub mod parser;
pub mod reactive;
pub mod repl;
pub mod runtime;
pub mod span;
pub mod stdlib;
pub mod token;
pub mod typechecker;
pub mod types;
pub mod value;

// Re-export commonly used types
pub use diagnostic::Diagnostic;
pub use environment::{Environment, Variable};
pub use interpreter::Interpreter;
pub use lexer::Lexer;
pub use module_loader::{Module, ModuleSet};
pub use parser::{ParseError, Parser};
pub use repl::{ReplCore, ReplOutcome};
pub use runtime::{parse_error_to_diagnostic, runtime_error_to_diagnostic, Axo, RuntimeResult};
pub use span::Span;
pub use stdlib::{stdout_writer, OutputWriter};
pub use token::{Token, TokenKind};
pub use typechecker::TypeRegistry;
pub use types::TypeExpr;
pub use value::{FunctionRef, RuntimeError, Value};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoke() {
        assert_eq!(VERSION, "0.1.0");
    }
}
