//! Type grammar parsing
//!
//! Parses the recursive type annotations into structural `TypeExpr` values:
//! base types, literal types, arrays `[T]`, fixed tuples `[T1,T2]`, object
//! shapes `{f:T}`, unions `a|b`, and function types `(A,B)->R`. Bracket and
//! brace nesting balances by construction.

use super::{PResult, ParseError, Parser};
use crate::token::TokenKind;
use crate::types::TypeExpr;

impl Parser {
    /// Parse a full type, including unions at the top level
    pub(crate) fn parse_type(&mut self) -> PResult<TypeExpr> {
        let first = self.parse_type_atom()?;

        if !self.check(TokenKind::Pipe) {
            return Ok(first);
        }

        let mut parts = vec![first];
        while self.match_token(TokenKind::Pipe) {
            parts.push(self.parse_type_atom()?);
        }
        Ok(TypeExpr::Union(parts))
    }

    /// Parse a single type component (everything but `|`)
    fn parse_type_atom(&mut self) -> PResult<TypeExpr> {
        match self.peek().kind {
            TokenKind::KwInt
            | TokenKind::KwFloat
            | TokenKind::KwString
            | TokenKind::KwBool
            | TokenKind::KwVoid
            | TokenKind::KwAny
            | TokenKind::KwObject => {
                let name = self.advance().lexeme.clone();
                Ok(TypeExpr::Name(name))
            }
            TokenKind::Func => {
                self.advance();
                Ok(TypeExpr::Name("func".to_string()))
            }
            TokenKind::Identifier => {
                let name = self.advance().lexeme.clone();
                Ok(TypeExpr::Name(name))
            }
            TokenKind::Int => {
                let token = self.advance().clone();
                let n = token
                    .lexeme
                    .parse::<i64>()
                    .map_err(|_| ParseError::at("Integer literal type out of range", &token))?;
                Ok(TypeExpr::IntLiteral(n))
            }
            TokenKind::Minus => {
                self.advance();
                let token = self.consume(TokenKind::Int, "Expected integer after '-' in type")?;
                let n = token
                    .lexeme
                    .parse::<i64>()
                    .map_err(|_| ParseError::at("Integer literal type out of range", &token))?;
                Ok(TypeExpr::IntLiteral(-n))
            }
            TokenKind::Str => {
                let lexeme = self.advance().lexeme.clone();
                Ok(TypeExpr::StrLiteral(lexeme))
            }
            TokenKind::True => {
                self.advance();
                Ok(TypeExpr::BoolLiteral(true))
            }
            TokenKind::False => {
                self.advance();
                Ok(TypeExpr::BoolLiteral(false))
            }
            TokenKind::LeftBracket => self.parse_bracket_type(),
            TokenKind::LeftBrace => self.parse_object_type(),
            TokenKind::LeftParen => self.parse_function_type(),
            _ => Err(ParseError::at(
                format!("Expected a type, found '{}'", self.peek().lexeme),
                self.peek(),
            )),
        }
    }

    /// Parse `[T]` (uniform array) or `[T1,T2,...]` (fixed tuple)
    fn parse_bracket_type(&mut self) -> PResult<TypeExpr> {
        self.consume(TokenKind::LeftBracket, "Expected '['")?;
        let first = self.parse_type()?;

        if self.match_token(TokenKind::Comma) {
            let mut slots = vec![first];
            loop {
                slots.push(self.parse_type()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
            self.consume(TokenKind::RightBracket, "Expected ']' after tuple type")?;
            Ok(TypeExpr::Tuple(slots))
        } else {
            self.consume(TokenKind::RightBracket, "Expected ']' after array type")?;
            Ok(TypeExpr::Array(Box::new(first)))
        }
    }

    /// Parse `{field:type, ...}`
    fn parse_object_type(&mut self) -> PResult<TypeExpr> {
        self.consume(TokenKind::LeftBrace, "Expected '{'")?;
        let mut fields = Vec::new();

        if !self.check(TokenKind::RightBrace) {
            loop {
                let name = self.consume_identifier("a field name in object type")?;
                self.consume(TokenKind::Colon, "Expected ':' after field name")?;
                let ty = self.parse_type()?;
                fields.push((name.lexeme, ty));
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.consume(TokenKind::RightBrace, "Expected '}' after object type")?;
        Ok(TypeExpr::Object(fields))
    }

    /// Parse `(T1,T2,...)->R`
    fn parse_function_type(&mut self) -> PResult<TypeExpr> {
        self.consume(TokenKind::LeftParen, "Expected '(' in function type")?;
        let mut params = Vec::new();

        if !self.check(TokenKind::RightParen) {
            loop {
                params.push(self.parse_type()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.consume(TokenKind::RightParen, "Expected ')' in function type")?;
        self.consume(TokenKind::Arrow, "Expected '->' in function type")?;
        let ret = self.parse_type()?;

        Ok(TypeExpr::Function {
            params,
            ret: Box::new(ret),
        })
    }
}
