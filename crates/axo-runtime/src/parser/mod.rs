//! Parsing (tokens to AST)
//!
//! Recursive descent with precedence climbing for expressions and a
//! dedicated sub-parser for the type grammar. The parser fails fast: the
//! first unexpected token raises a `ParseError` carrying the offending
//! token's line, column, and lexeme.

mod expr;
mod stmt;
mod types;

use crate::ast::Program;
use crate::span::Span;
use crate::token::{Token, TokenKind};
use thiserror::Error;

/// Parse error with the offending token's position and lexeme
///
/// The message itself includes "(line L, col C)" so the position survives
/// conversion into a plainer error type.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub line: u32,
    pub column: u32,
    pub lexeme: String,
}

impl ParseError {
    /// Create a parse error pointing at `token`
    pub fn at(message: impl AsRef<str>, token: &Token) -> Self {
        Self {
            message: format!(
                "{} (line {}, col {})",
                message.as_ref(),
                token.span.line,
                token.span.column
            ),
            line: token.span.line,
            column: token.span.column,
            lexeme: token.lexeme.clone(),
        }
    }

    /// Source position of the offending token
    pub fn span(&self) -> Span {
        Span::new(self.line, self.column)
    }
}

pub(crate) type PResult<T> = Result<T, ParseError>;

/// Parser state for building an AST from tokens
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    /// Create a new parser for the given tokens
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    /// Parse tokens into a program
    pub fn parse(&mut self) -> PResult<Program> {
        let mut items = Vec::new();
        while !self.is_at_end() {
            items.push(self.parse_item()?);
        }
        Ok(Program { items })
    }

    /// Parse a single expression and require that it consumes all input.
    ///
    /// Used for `${...}` template holes, which are lexed and parsed on
    /// demand.
    pub fn parse_single_expression(&mut self) -> PResult<crate::ast::Expr> {
        let expr = self.parse_expression()?;
        if !self.is_at_end() {
            return Err(ParseError::at(
                format!("Unexpected token: '{}'", self.peek().lexeme),
                self.peek(),
            ));
        }
        Ok(expr)
    }

    // === Token navigation ===

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn consume(&mut self, kind: TokenKind, message: &str) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.advance().clone())
        } else {
            Err(ParseError::at(message, self.peek()))
        }
    }

    pub(crate) fn consume_identifier(&mut self, what: &str) -> PResult<Token> {
        if self.check(TokenKind::Identifier) {
            Ok(self.advance().clone())
        } else {
            Err(ParseError::at(format!("Expected {}", what), self.peek()))
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(source: &str) -> PResult<Program> {
        Parser::new(Lexer::new(source).tokenize()).parse()
    }

    #[test]
    fn test_empty_program() {
        let program = parse("").unwrap();
        assert!(program.items.is_empty());
    }

    #[test]
    fn test_error_carries_position() {
        let err = parse("var x: int = ;").unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 14);
        assert!(err.message.contains("(line 1, col 14)"));
        assert_eq!(err.lexeme, ";");
    }

    #[test]
    fn test_unknown_token_reported() {
        let err = parse("var x: int = @;").unwrap_err();
        assert!(err.message.contains("(line 1, col 14)"));
    }
}
