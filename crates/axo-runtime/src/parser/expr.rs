//! Expression parsing
//!
//! Precedence climbing, lowest to highest: assignment (right-associative),
//! logical-or, logical-and, equality, comparison, additive, multiplicative,
//! unary (`!`, `-`, `typeof`, `await`), postfix (call, index, field).

use super::{PResult, ParseError, Parser};
use crate::ast::*;
use crate::token::TokenKind;
use std::rc::Rc;

impl Parser {
    /// Parse an expression
    pub(crate) fn parse_expression(&mut self) -> PResult<Expr> {
        self.parse_assignment()
    }

    /// Parse assignment; the LHS shape decides which assignment node the
    /// expression rewrites into
    fn parse_assignment(&mut self) -> PResult<Expr> {
        let expr = self.parse_or()?;

        if self.match_token(TokenKind::Assign) {
            let assign_token = self.previous().clone();
            let span = expr.span();
            let value = Box::new(self.parse_assignment()?);

            return match expr {
                Expr::Ident(name) => Ok(Expr::Assign(AssignExpr { name, value, span })),
                Expr::Index(ix) => Ok(Expr::IndexAssign(IndexAssignExpr {
                    target: ix.target,
                    index: ix.index,
                    value,
                    span,
                })),
                Expr::Field(fx) => Ok(Expr::FieldAssign(FieldAssignExpr {
                    target: fx.target,
                    field: fx.field,
                    value,
                    span,
                })),
                _ => Err(ParseError::at("Invalid assignment target", &assign_token)),
            };
        }

        Ok(expr)
    }

    fn parse_or(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_and()?;
        while self.match_token(TokenKind::PipePipe) {
            let span = expr.span();
            let right = self.parse_and()?;
            expr = Expr::Binary(BinaryExpr {
                left: Box::new(expr),
                op: BinaryOp::Or,
                right: Box::new(right),
                span,
            });
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_equality()?;
        while self.match_token(TokenKind::AmpAmp) {
            let span = expr.span();
            let right = self.parse_equality()?;
            expr = Expr::Binary(BinaryExpr {
                left: Box::new(expr),
                op: BinaryOp::And,
                right: Box::new(right),
                span,
            });
        }
        Ok(expr)
    }

    fn parse_equality(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_comparison()?;
        loop {
            let op = if self.match_token(TokenKind::EqualEqual) {
                BinaryOp::Eq
            } else if self.match_token(TokenKind::BangEqual) {
                BinaryOp::Ne
            } else {
                break;
            };
            let span = expr.span();
            let right = self.parse_comparison()?;
            expr = Expr::Binary(BinaryExpr {
                left: Box::new(expr),
                op,
                right: Box::new(right),
                span,
            });
        }
        Ok(expr)
    }

    fn parse_comparison(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_term()?;
        loop {
            let op = if self.match_token(TokenKind::Less) {
                BinaryOp::Lt
            } else if self.match_token(TokenKind::LessEqual) {
                BinaryOp::Le
            } else if self.match_token(TokenKind::Greater) {
                BinaryOp::Gt
            } else if self.match_token(TokenKind::GreaterEqual) {
                BinaryOp::Ge
            } else {
                break;
            };
            let span = expr.span();
            let right = self.parse_term()?;
            expr = Expr::Binary(BinaryExpr {
                left: Box::new(expr),
                op,
                right: Box::new(right),
                span,
            });
        }
        Ok(expr)
    }

    fn parse_term(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_factor()?;
        loop {
            let op = if self.match_token(TokenKind::Plus) {
                BinaryOp::Add
            } else if self.match_token(TokenKind::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };
            let span = expr.span();
            let right = self.parse_factor()?;
            expr = Expr::Binary(BinaryExpr {
                left: Box::new(expr),
                op,
                right: Box::new(right),
                span,
            });
        }
        Ok(expr)
    }

    fn parse_factor(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_unary()?;
        loop {
            let op = if self.match_token(TokenKind::Star) {
                BinaryOp::Mul
            } else if self.match_token(TokenKind::Slash) {
                BinaryOp::Div
            } else if self.match_token(TokenKind::Percent) {
                BinaryOp::Mod
            } else {
                break;
            };
            let span = expr.span();
            let right = self.parse_unary()?;
            expr = Expr::Binary(BinaryExpr {
                left: Box::new(expr),
                op,
                right: Box::new(right),
                span,
            });
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        let span = self.peek().span;

        if self.match_token(TokenKind::Bang) {
            let operand = Box::new(self.parse_unary()?);
            return Ok(Expr::Unary(UnaryExpr {
                op: UnaryOp::Not,
                operand,
                span,
            }));
        }
        if self.match_token(TokenKind::Minus) {
            let operand = Box::new(self.parse_unary()?);
            return Ok(Expr::Unary(UnaryExpr {
                op: UnaryOp::Neg,
                operand,
                span,
            }));
        }
        if self.match_token(TokenKind::Typeof) {
            let operand = Box::new(self.parse_unary()?);
            return Ok(Expr::Unary(UnaryExpr {
                op: UnaryOp::Typeof,
                operand,
                span,
            }));
        }
        if self.match_token(TokenKind::Await) {
            let expr = Box::new(self.parse_unary()?);
            return Ok(Expr::Await(AwaitExpr { expr, span }));
        }

        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.match_token(TokenKind::LeftParen) {
                let span = expr.span();
                let mut args = Vec::new();
                if !self.check(TokenKind::RightParen) {
                    loop {
                        args.push(self.parse_expression()?);
                        if !self.match_token(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.consume(TokenKind::RightParen, "Expected ')' after arguments")?;
                expr = Expr::Call(CallExpr {
                    callee: Box::new(expr),
                    args,
                    span,
                });
            } else if self.match_token(TokenKind::LeftBracket) {
                let span = expr.span();
                let index = Box::new(self.parse_expression()?);
                self.consume(TokenKind::RightBracket, "Expected ']' after index")?;
                expr = Expr::Index(IndexExpr {
                    target: Box::new(expr),
                    index,
                    span,
                });
            } else if self.match_token(TokenKind::Dot) {
                let span = expr.span();
                let field = self.consume_identifier("a field name after '.'")?;
                expr = Expr::Field(FieldExpr {
                    target: Box::new(expr),
                    field: field.lexeme,
                    span,
                });
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        let span = self.peek().span;

        match self.peek().kind {
            TokenKind::True => {
                self.advance();
                Ok(Expr::Bool(true, span))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Bool(false, span))
            }
            TokenKind::Int => {
                let token = self.advance().clone();
                let n = token
                    .lexeme
                    .parse::<i64>()
                    .map_err(|_| ParseError::at("Integer literal out of range", &token))?;
                Ok(Expr::Int(n, span))
            }
            TokenKind::Float => {
                let token = self.advance().clone();
                let n = token
                    .lexeme
                    .parse::<f32>()
                    .map_err(|_| ParseError::at("Malformed float literal", &token))?;
                Ok(Expr::Float(n, span))
            }
            TokenKind::Str => {
                let lexeme = self.advance().lexeme.clone();
                Ok(Expr::Str(lexeme, span))
            }
            TokenKind::LeftBracket => self.parse_array_literal(),
            TokenKind::LeftBrace => self.parse_object_literal(),
            TokenKind::Func => self.parse_function_expr(),
            TokenKind::Identifier => {
                let name = self.advance().lexeme.clone();
                Ok(Expr::Ident(Ident { name, span }))
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.consume(TokenKind::RightParen, "Expected ')' after expression")?;
                Ok(expr)
            }
            _ => Err(ParseError::at(
                format!("Unexpected token: '{}'", self.peek().lexeme),
                self.peek(),
            )),
        }
    }

    /// Parse `[e1, e2, ...]`
    fn parse_array_literal(&mut self) -> PResult<Expr> {
        let span = self.peek().span;
        self.consume(TokenKind::LeftBracket, "Expected '['")?;

        let mut elements = Vec::new();
        if !self.check(TokenKind::RightBracket) {
            loop {
                elements.push(self.parse_expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightBracket, "Expected ']' after array elements")?;

        Ok(Expr::Array(ArrayLit { elements, span }))
    }

    /// Parse `{key: value, ...}` with identifier keys
    fn parse_object_literal(&mut self) -> PResult<Expr> {
        let span = self.peek().span;
        self.consume(TokenKind::LeftBrace, "Expected '{'")?;

        let mut fields = Vec::new();
        if !self.check(TokenKind::RightBrace) {
            loop {
                let key = self.consume_identifier("a property name")?;
                self.consume(TokenKind::Colon, "Expected ':' after property name")?;
                let value = self.parse_expression()?;
                fields.push((key.lexeme, value));
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightBrace, "Expected '}' after object fields")?;

        Ok(Expr::Object(ObjectLit { fields, span }))
    }

    /// Parse `func (params) -> T { body }`
    fn parse_function_expr(&mut self) -> PResult<Expr> {
        let span = self.peek().span;
        self.consume(TokenKind::Func, "Expected 'func'")?;
        let params = self.parse_params()?;
        self.consume(TokenKind::Arrow, "Expected '->' before return type")?;
        let return_type = self.parse_type()?;
        let body = self.parse_block()?;

        Ok(Expr::Function(Rc::new(FunctionExpr {
            params,
            return_type,
            body,
            span,
        })))
    }

    /// Parse a parenthesized parameter list: `(name: T, ...)`
    pub(crate) fn parse_params(&mut self) -> PResult<Vec<Param>> {
        self.consume(TokenKind::LeftParen, "Expected '(' before parameters")?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                let span = self.peek().span;
                let name = self.consume_identifier("a parameter name")?;
                self.consume(TokenKind::Colon, "Expected ':' after parameter name")?;
                let type_expr = self.parse_type()?;
                params.push(Param {
                    name: name.lexeme,
                    type_expr,
                    span,
                });
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.consume(TokenKind::RightParen, "Expected ')' after parameters")?;
        Ok(params)
    }
}
