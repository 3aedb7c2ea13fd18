//! Lexical analysis (tokenization)
//!
//! The lexer converts Axo source code into a stream of tokens carrying
//! line/column positions. Unrecognized characters become `Unknown` tokens;
//! the parser turns those into position-annotated errors.

use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Lexer state for tokenizing source code
pub struct Lexer {
    /// Characters of source code
    chars: Vec<char>,
    /// Current position in chars
    current: usize,
    /// Current line number (1-indexed)
    line: u32,
    /// Current column number (1-indexed)
    column: u32,
    /// Start line of current token
    start_line: u32,
    /// Start column of current token
    start_column: u32,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: impl AsRef<str>) -> Self {
        Self {
            chars: source.as_ref().chars().collect(),
            current: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
        }
    }

    /// Tokenize the source code; the final token is always `Eof`
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        tokens
    }

    /// Scan the next token
    fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        self.start_line = self.line;
        self.start_column = self.column;

        if self.is_at_end() {
            return self.make_token(TokenKind::Eof, "");
        }

        let c = self.advance();

        match c {
            '(' => self.make_token(TokenKind::LeftParen, "("),
            ')' => self.make_token(TokenKind::RightParen, ")"),
            '{' => self.make_token(TokenKind::LeftBrace, "{"),
            '}' => self.make_token(TokenKind::RightBrace, "}"),
            '[' => self.make_token(TokenKind::LeftBracket, "["),
            ']' => self.make_token(TokenKind::RightBracket, "]"),
            ';' => self.make_token(TokenKind::Semicolon, ";"),
            ',' => self.make_token(TokenKind::Comma, ","),
            '.' => self.make_token(TokenKind::Dot, "."),
            ':' => self.make_token(TokenKind::Colon, ":"),
            '+' => self.make_token(TokenKind::Plus, "+"),
            '*' => self.make_token(TokenKind::Star, "*"),
            '/' => self.make_token(TokenKind::Slash, "/"),
            '%' => self.make_token(TokenKind::Percent, "%"),

            // Two-character operators are matched before their prefixes
            '-' => {
                if self.match_char('>') {
                    self.make_token(TokenKind::Arrow, "->")
                } else {
                    self.make_token(TokenKind::Minus, "-")
                }
            }
            '=' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::EqualEqual, "==")
                } else {
                    self.make_token(TokenKind::Assign, "=")
                }
            }
            '!' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::BangEqual, "!=")
                } else {
                    self.make_token(TokenKind::Bang, "!")
                }
            }
            '<' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::LessEqual, "<=")
                } else {
                    self.make_token(TokenKind::Less, "<")
                }
            }
            '>' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::GreaterEqual, ">=")
                } else {
                    self.make_token(TokenKind::Greater, ">")
                }
            }
            '&' => {
                if self.match_char('&') {
                    self.make_token(TokenKind::AmpAmp, "&&")
                } else {
                    self.make_token(TokenKind::Unknown, "&")
                }
            }
            '|' => {
                if self.match_char('|') {
                    self.make_token(TokenKind::PipePipe, "||")
                } else {
                    // Single pipe separates union type components
                    self.make_token(TokenKind::Pipe, "|")
                }
            }

            '"' => self.string(),

            c if c.is_ascii_digit() => self.number(),

            c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),

            c => self.make_token(TokenKind::Unknown, c.to_string()),
        }
    }

    /// Skip whitespace (including newlines) and `//` comments
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            if self.is_at_end() {
                return;
            }

            match self.peek() {
                ' ' | '\r' | '\t' | '\n' => {
                    self.advance();
                }
                '/' => {
                    if self.peek_next() == Some('/') {
                        while !self.is_at_end() && self.peek() != '\n' {
                            self.advance();
                        }
                    } else {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    /// Scan a string literal
    ///
    /// Escapes `\n \t \r \" \\` are processed; any other backslashed
    /// character passes through literally. `${...}` interpolation markers are
    /// preserved verbatim for the evaluator.
    fn string(&mut self) -> Token {
        let mut value = String::new();

        while !self.is_at_end() && self.peek() != '"' {
            if self.peek() == '\\' {
                self.advance();
                if self.is_at_end() {
                    break;
                }
                let c = self.advance();
                match c {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    'r' => value.push('\r'),
                    '"' => value.push('"'),
                    '\\' => value.push('\\'),
                    other => value.push(other),
                }
            } else {
                value.push(self.advance());
            }
        }

        if self.is_at_end() {
            return self.make_token(TokenKind::Unknown, "unterminated string literal");
        }

        self.advance(); // Closing "
        self.make_token(TokenKind::Str, value)
    }

    /// Scan an integer or float literal
    fn number(&mut self) -> Token {
        let start = self.current - 1;
        let mut is_float = false;

        while !self.is_at_end() && self.peek().is_ascii_digit() {
            self.advance();
        }

        // A dot only belongs to the number when a digit follows it
        if self.peek() == '.' {
            if let Some(c) = self.peek_next() {
                if c.is_ascii_digit() {
                    is_float = true;
                    self.advance();
                    while !self.is_at_end() && self.peek().is_ascii_digit() {
                        self.advance();
                    }
                }
            }
        }

        let lexeme: String = self.chars[start..self.current].iter().collect();
        let kind = if is_float {
            TokenKind::Float
        } else {
            TokenKind::Int
        };
        self.make_token(kind, lexeme)
    }

    /// Scan an identifier or keyword
    fn identifier(&mut self) -> Token {
        let start = self.current - 1;

        while !self.is_at_end() {
            let c = self.peek();
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let lexeme: String = self.chars[start..self.current].iter().collect();
        let kind = TokenKind::is_keyword(&lexeme).unwrap_or(TokenKind::Identifier);

        self.make_token(kind, lexeme)
    }

    // === Character navigation ===

    /// Advance to next character and return it
    fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    /// Peek at current character without advancing
    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.current]
        }
    }

    /// Peek at next character (current + 1)
    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.current + 1).copied()
    }

    /// Check if current character matches expected, and advance if so
    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.chars[self.current] != expected {
            false
        } else {
            self.advance();
            true
        }
    }

    /// Check if we've reached the end of source
    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    /// Create a token starting at the recorded start position
    fn make_token(&self, kind: TokenKind, lexeme: impl Into<String>) -> Token {
        Token::new(kind, lexeme, Span::new(self.start_line, self.start_column))
    }
}
