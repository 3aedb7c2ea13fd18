//! Statement and declaration parsing

use super::{PResult, ParseError, Parser};
use crate::ast::*;
use crate::token::TokenKind;
use std::rc::Rc;

impl Parser {
    /// Parse a top-level item
    pub(crate) fn parse_item(&mut self) -> PResult<Item> {
        match self.peek().kind {
            TokenKind::Import => Ok(Item::Import(self.parse_import()?)),
            TokenKind::Use => Ok(Item::Use(self.parse_use()?)),
            TokenKind::Export => Ok(Item::Export(self.parse_export()?)),
            TokenKind::Type => Ok(Item::TypeAlias(self.parse_type_decl()?)),
            TokenKind::Func => Ok(Item::Function(Rc::new(self.parse_function_decl()?))),
            TokenKind::Program => Ok(Item::Program(Rc::new(self.parse_program_decl()?))),
            _ => Ok(Item::Statement(self.parse_statement()?)),
        }
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> PResult<Stmt> {
        match self.peek().kind {
            TokenKind::Var | TokenKind::Const => {
                let decl = self.parse_var_decl_core()?;
                self.consume(
                    TokenKind::Semicolon,
                    "Expected ';' after variable declaration",
                )?;
                Ok(Stmt::VarDecl(decl))
            }
            TokenKind::Func => Ok(Stmt::Function(Rc::new(self.parse_function_decl()?))),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Throw => self.parse_throw(),
            TokenKind::Try => self.parse_try(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::When => self.parse_when(),
            TokenKind::Break => {
                let span = self.advance().span;
                self.consume(TokenKind::Semicolon, "Expected ';' after 'break'")?;
                Ok(Stmt::Break(span))
            }
            TokenKind::Continue => {
                let span = self.advance().span;
                self.consume(TokenKind::Semicolon, "Expected ';' after 'continue'")?;
                Ok(Stmt::Continue(span))
            }
            TokenKind::LeftBrace => Ok(Stmt::Block(self.parse_block()?)),
            _ => {
                let expr = self.parse_expression()?;
                self.consume(TokenKind::Semicolon, "Expected ';' after expression")?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    /// Parse `{ statements }`
    pub(crate) fn parse_block(&mut self) -> PResult<Block> {
        let span = self.peek().span;
        self.consume(TokenKind::LeftBrace, "Expected '{'")?;

        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        self.consume(TokenKind::RightBrace, "Expected '}'")?;
        Ok(Block { statements, span })
    }

    /// Parse `var`/`const` name, type, and optional initializer, without the
    /// trailing semicolon (the for-loop init reuses this)
    fn parse_var_decl_core(&mut self) -> PResult<VarDecl> {
        let span = self.peek().span;
        let is_const = self.peek().kind == TokenKind::Const;
        self.advance(); // var or const

        let name = self.consume_identifier("a variable name")?;
        self.consume(TokenKind::Colon, "Expected ':' after variable name")?;
        let declared_type = self.parse_type()?;

        let init = if self.match_token(TokenKind::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(VarDecl {
            name: name.lexeme,
            is_const,
            declared_type,
            init,
            span,
        })
    }

    fn parse_if(&mut self) -> PResult<Stmt> {
        let span = self.consume(TokenKind::If, "Expected 'if'")?.span;
        self.consume(TokenKind::LeftParen, "Expected '(' after 'if'")?;
        let cond = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "Expected ')' after if condition")?;

        let then_block = self.parse_block()?;

        let else_block = if self.match_token(TokenKind::Else) {
            if self.check(TokenKind::If) {
                // else-if chains nest in the else block
                let else_span = self.peek().span;
                let nested = self.parse_if()?;
                Some(Block {
                    statements: vec![nested],
                    span: else_span,
                })
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };

        Ok(Stmt::If(IfStmt {
            cond,
            then_block,
            else_block,
            span,
        }))
    }

    fn parse_while(&mut self) -> PResult<Stmt> {
        let span = self.consume(TokenKind::While, "Expected 'while'")?.span;
        self.consume(TokenKind::LeftParen, "Expected '(' after 'while'")?;
        let cond = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "Expected ')' after while condition")?;
        let body = self.parse_block()?;

        Ok(Stmt::While(WhileStmt { cond, body, span }))
    }

    fn parse_for(&mut self) -> PResult<Stmt> {
        let span = self.consume(TokenKind::For, "Expected 'for'")?.span;
        self.consume(TokenKind::LeftParen, "Expected '(' after 'for'")?;

        let init = if self.check(TokenKind::Semicolon) {
            None
        } else if self.check(TokenKind::Var) || self.check(TokenKind::Const) {
            Some(Box::new(Stmt::VarDecl(self.parse_var_decl_core()?)))
        } else {
            Some(Box::new(Stmt::Expr(self.parse_expression()?)))
        };
        self.consume(TokenKind::Semicolon, "Expected ';' after for init")?;

        let cond = self.parse_expression()?;
        self.consume(TokenKind::Semicolon, "Expected ';' after for condition")?;

        let update = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "Expected ')' after for clauses")?;

        let body = self.parse_block()?;

        Ok(Stmt::For(ForStmt {
            init,
            cond,
            update,
            body,
            span,
        }))
    }

    fn parse_return(&mut self) -> PResult<Stmt> {
        let span = self.consume(TokenKind::Return, "Expected 'return'")?.span;
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume(TokenKind::Semicolon, "Expected ';' after return")?;

        Ok(Stmt::Return(ReturnStmt { value, span }))
    }

    fn parse_throw(&mut self) -> PResult<Stmt> {
        let span = self.consume(TokenKind::Throw, "Expected 'throw'")?.span;
        let value = self.parse_expression()?;
        self.consume(TokenKind::Semicolon, "Expected ';' after throw")?;

        Ok(Stmt::Throw(ThrowStmt { value, span }))
    }

    fn parse_try(&mut self) -> PResult<Stmt> {
        let span = self.consume(TokenKind::Try, "Expected 'try'")?.span;
        let try_block = self.parse_block()?;

        let (catch_var, catch_block) = if self.match_token(TokenKind::Catch) {
            self.consume(TokenKind::LeftParen, "Expected '(' after 'catch'")?;
            let var = self.consume_identifier("a catch variable name")?;
            self.consume(TokenKind::RightParen, "Expected ')' after catch variable")?;
            (Some(var.lexeme), Some(self.parse_block()?))
        } else {
            (None, None)
        };

        let finally_block = if self.match_token(TokenKind::Finally) {
            Some(self.parse_block()?)
        } else {
            None
        };

        if catch_block.is_none() && finally_block.is_none() {
            return Err(ParseError::at(
                "Expected 'catch' or 'finally' after try block",
                self.peek(),
            ));
        }

        Ok(Stmt::Try(TryStmt {
            try_block,
            catch_var,
            catch_block,
            finally_block,
            span,
        }))
    }

    fn parse_switch(&mut self) -> PResult<Stmt> {
        let span = self.consume(TokenKind::Switch, "Expected 'switch'")?.span;
        self.consume(TokenKind::LeftParen, "Expected '(' after 'switch'")?;
        let discriminant = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "Expected ')' after switch value")?;
        self.consume(TokenKind::LeftBrace, "Expected '{' before switch cases")?;

        let mut cases = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            let case_span = self.peek().span;
            let value = if self.match_token(TokenKind::Case) {
                let v = self.parse_expression()?;
                self.consume(TokenKind::Colon, "Expected ':' after case value")?;
                Some(v)
            } else if self.match_token(TokenKind::Default) {
                self.consume(TokenKind::Colon, "Expected ':' after 'default'")?;
                None
            } else {
                return Err(ParseError::at(
                    "Expected 'case' or 'default' in switch body",
                    self.peek(),
                ));
            };

            let mut body = Vec::new();
            while !self.check(TokenKind::Case)
                && !self.check(TokenKind::Default)
                && !self.check(TokenKind::RightBrace)
                && !self.is_at_end()
            {
                body.push(self.parse_statement()?);
            }

            cases.push(CaseClause {
                value,
                body,
                span: case_span,
            });
        }

        self.consume(TokenKind::RightBrace, "Expected '}' after switch cases")?;

        Ok(Stmt::Switch(SwitchStmt {
            discriminant,
            cases,
            span,
        }))
    }

    fn parse_when(&mut self) -> PResult<Stmt> {
        let span = self.consume(TokenKind::When, "Expected 'when'")?.span;
        self.consume(TokenKind::LeftParen, "Expected '(' after 'when'")?;
        let cond = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "Expected ')' after when condition")?;
        let body = self.parse_block()?;

        Ok(Stmt::When(Rc::new(WhenStmt { cond, body, span })))
    }

    /// Parse `func name(params) -> R { body }`
    pub(crate) fn parse_function_decl(&mut self) -> PResult<FunctionDecl> {
        let span = self.consume(TokenKind::Func, "Expected 'func'")?.span;
        let name = self.consume_identifier("a function name")?;
        let params = self.parse_params()?;
        self.consume(TokenKind::Arrow, "Expected '->' before return type")?;
        let return_type = self.parse_type()?;
        let body = self.parse_block()?;

        Ok(FunctionDecl {
            name: name.lexeme,
            params,
            return_type,
            body,
            span,
        })
    }

    /// Parse `program name(params) { body }`
    fn parse_program_decl(&mut self) -> PResult<ProgramDecl> {
        let span = self.consume(TokenKind::Program, "Expected 'program'")?.span;
        let name = self.consume_identifier("a program name")?;
        let params = self.parse_params()?;
        let body = self.parse_block()?;

        Ok(ProgramDecl {
            name: name.lexeme,
            params,
            body,
            span,
        })
    }

    /// Parse the four import forms
    fn parse_import(&mut self) -> PResult<ImportDecl> {
        let span = self.consume(TokenKind::Import, "Expected 'import'")?.span;

        // Bare side-effect import: `import "path";`
        if self.check(TokenKind::Str) {
            let path = self.advance().lexeme.clone();
            self.consume(TokenKind::Semicolon, "Expected ';' after import")?;
            return Ok(ImportDecl {
                path,
                default_binding: None,
                named: Vec::new(),
                span,
            });
        }

        let mut default_binding = None;
        let mut named = Vec::new();

        if self.check(TokenKind::Identifier) {
            default_binding = Some(self.advance().lexeme.clone());
            // Mixed form: `import d, {a, b} from "path";`
            if self.match_token(TokenKind::Comma) {
                named = self.parse_import_names()?;
            }
        } else if self.check(TokenKind::LeftBrace) {
            named = self.parse_import_names()?;
        } else {
            return Err(ParseError::at(
                "Expected import path or bindings after 'import'",
                self.peek(),
            ));
        }

        self.consume(TokenKind::From, "Expected 'from' after import bindings")?;
        let path = self
            .consume(TokenKind::Str, "Expected string path in import")?
            .lexeme;
        self.consume(TokenKind::Semicolon, "Expected ';' after import")?;

        Ok(ImportDecl {
            path,
            default_binding,
            named,
            span,
        })
    }

    fn parse_import_names(&mut self) -> PResult<Vec<String>> {
        self.consume(TokenKind::LeftBrace, "Expected '{' before import names")?;
        let mut names = Vec::new();
        if !self.check(TokenKind::RightBrace) {
            loop {
                names.push(self.consume_identifier("an import name")?.lexeme);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightBrace, "Expected '}' after import names")?;
        Ok(names)
    }

    fn parse_use(&mut self) -> PResult<UseDecl> {
        let span = self.consume(TokenKind::Use, "Expected 'use'")?.span;
        let path = self
            .consume(TokenKind::Str, "Expected string path in use")?
            .lexeme;
        self.consume(TokenKind::Semicolon, "Expected ';' after use")?;

        Ok(UseDecl { path, span })
    }

    /// Parse the three export forms
    fn parse_export(&mut self) -> PResult<ExportDecl> {
        let span = self.consume(TokenKind::Export, "Expected 'export'")?.span;

        if self.match_token(TokenKind::Default) {
            let item = self.parse_exportable_item()?;
            return Ok(ExportDecl {
                kind: ExportKind::Default(Box::new(item)),
                span,
            });
        }

        if self.check(TokenKind::LeftBrace) {
            let names = self.parse_import_names()?;
            self.consume(TokenKind::Semicolon, "Expected ';' after export list")?;
            return Ok(ExportDecl {
                kind: ExportKind::Named(names),
                span,
            });
        }

        let item = self.parse_exportable_item()?;
        Ok(ExportDecl {
            kind: ExportKind::Decl(Box::new(item)),
            span,
        })
    }

    /// The declarations that may follow `export` / `export default`
    fn parse_exportable_item(&mut self) -> PResult<Item> {
        match self.peek().kind {
            TokenKind::Func => Ok(Item::Function(Rc::new(self.parse_function_decl()?))),
            TokenKind::Program => Ok(Item::Program(Rc::new(self.parse_program_decl()?))),
            TokenKind::Type => Ok(Item::TypeAlias(self.parse_type_decl()?)),
            TokenKind::Var | TokenKind::Const => {
                let decl = self.parse_var_decl_core()?;
                self.consume(
                    TokenKind::Semicolon,
                    "Expected ';' after variable declaration",
                )?;
                Ok(Item::Statement(Stmt::VarDecl(decl)))
            }
            _ => Err(ParseError::at(
                "Expected a declaration after 'export'",
                self.peek(),
            )),
        }
    }

    /// Parse `type Name = <type>;`
    fn parse_type_decl(&mut self) -> PResult<TypeDecl> {
        let span = self.consume(TokenKind::Type, "Expected 'type'")?.span;
        let name = self.consume_identifier("a type name")?;
        self.consume(TokenKind::Assign, "Expected '=' in type declaration")?;
        let ty = self.parse_type()?;
        self.consume(TokenKind::Semicolon, "Expected ';' after type declaration")?;

        Ok(TypeDecl {
            name: name.lexeme,
            ty,
            span,
        })
    }
}
