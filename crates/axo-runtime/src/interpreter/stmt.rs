//! Statement execution

use super::{ControlFlow, Interpreter};
use crate::ast::*;
use crate::environment::Variable;
use crate::reactive::PendingWhen;
use crate::typechecker::matches;
use crate::types::TypeExpr;
use crate::value::{RuntimeError, Value};
use std::rc::Rc;

impl Interpreter {
    /// Execute a statement
    pub(crate) fn eval_statement(&mut self, stmt: &Stmt) -> Result<Value, RuntimeError> {
        match stmt {
            Stmt::VarDecl(decl) => self.eval_var_decl(decl),
            Stmt::Function(func) => {
                self.register_function(func);
                Ok(Value::unit())
            }
            Stmt::If(if_stmt) => self.eval_if(if_stmt),
            Stmt::While(while_stmt) => self.eval_while(while_stmt),
            Stmt::For(for_stmt) => self.eval_for(for_stmt),
            Stmt::Return(return_stmt) => self.eval_return(return_stmt),
            Stmt::Break(_) => {
                self.control_flow = ControlFlow::Break;
                Ok(Value::unit())
            }
            Stmt::Continue(_) => {
                self.control_flow = ControlFlow::Continue;
                Ok(Value::unit())
            }
            Stmt::Throw(throw_stmt) => {
                let value = self.eval_expr(&throw_stmt.value)?;
                Err(RuntimeError::Thrown {
                    value,
                    span: throw_stmt.span,
                })
            }
            Stmt::Try(try_stmt) => self.eval_try(try_stmt),
            Stmt::Switch(switch_stmt) => self.eval_switch(switch_stmt),
            Stmt::When(when_stmt) => {
                self.pending.push(PendingWhen::new(Rc::clone(when_stmt)));
                Ok(Value::unit())
            }
            Stmt::Block(block) => self.eval_block(block),
            Stmt::Expr(expr) => {
                let value = self.eval_expr(expr)?;
                // Guards with no dependencies re-check after every
                // expression statement
                self.run_pending(None)?;
                Ok(value)
            }
        }
    }

    /// Declare a variable: default-initialize by declared type, or evaluate
    /// and structurally check the initializer
    fn eval_var_decl(&mut self, decl: &VarDecl) -> Result<Value, RuntimeError> {
        let value = match &decl.init {
            Some(init) => {
                let value = self.eval_expr(init)?;
                if !matches(&value, &decl.declared_type, &self.types) {
                    return Err(RuntimeError::Type {
                        msg: format!(
                            "initializer for '{}' does not match declared type '{}' (got {}: {})",
                            decl.name,
                            decl.declared_type,
                            value.type_name(),
                            value.canonical()
                        ),
                        span: decl.span,
                    });
                }
                value
            }
            None => match &decl.declared_type {
                TypeExpr::Name(n) if n == "object" => Value::empty_object(),
                TypeExpr::Name(n) if n == "string" => Value::string(""),
                _ => Value::Int(0),
            },
        };

        self.env.define(
            decl.name.clone(),
            Variable::new(value, decl.declared_type.clone(), decl.is_const),
        );
        Ok(Value::unit())
    }

    fn eval_if(&mut self, if_stmt: &IfStmt) -> Result<Value, RuntimeError> {
        let cond = self.eval_expr(&if_stmt.cond)?;

        if cond.is_truthy() {
            self.eval_block(&if_stmt.then_block)
        } else if let Some(else_block) = &if_stmt.else_block {
            self.eval_block(else_block)
        } else {
            Ok(Value::unit())
        }
    }

    fn eval_while(&mut self, while_stmt: &WhileStmt) -> Result<Value, RuntimeError> {
        loop {
            let cond = self.eval_expr(&while_stmt.cond)?;
            if !cond.is_truthy() {
                break;
            }

            self.eval_block(&while_stmt.body)?;

            match self.control_flow {
                ControlFlow::Break => {
                    self.control_flow = ControlFlow::None;
                    break;
                }
                ControlFlow::Continue => {
                    self.control_flow = ControlFlow::None;
                }
                ControlFlow::Return(_) => break,
                ControlFlow::None => {}
            }
        }

        Ok(Value::unit())
    }

    /// The for loop's init/cond/update triple runs in its own scope
    fn eval_for(&mut self, for_stmt: &ForStmt) -> Result<Value, RuntimeError> {
        self.env.push_scope();
        let result = self.eval_for_inner(for_stmt);
        self.env.pop_scope();
        result
    }

    fn eval_for_inner(&mut self, for_stmt: &ForStmt) -> Result<Value, RuntimeError> {
        if let Some(init) = &for_stmt.init {
            self.eval_statement(init)?;
        }

        loop {
            let cond = self.eval_expr(&for_stmt.cond)?;
            if !cond.is_truthy() {
                break;
            }

            self.eval_block(&for_stmt.body)?;

            match self.control_flow {
                ControlFlow::Break => {
                    self.control_flow = ControlFlow::None;
                    break;
                }
                ControlFlow::Continue => {
                    // Fall through to the update expression
                    self.control_flow = ControlFlow::None;
                }
                ControlFlow::Return(_) => break,
                ControlFlow::None => {}
            }

            self.eval_expr(&for_stmt.update)?;
        }

        Ok(Value::unit())
    }

    fn eval_return(&mut self, return_stmt: &ReturnStmt) -> Result<Value, RuntimeError> {
        let value = match &return_stmt.value {
            Some(expr) => self.eval_expr(expr)?,
            None => Value::unit(),
        };
        self.control_flow = ControlFlow::Return(value);
        Ok(Value::unit())
    }

    /// try/catch/finally: a catch block intercepts only thrown user values;
    /// other runtime errors stay fatal. The finally block runs exactly once
    /// on every path, including return/break/continue and fatal errors.
    fn eval_try(&mut self, try_stmt: &TryStmt) -> Result<Value, RuntimeError> {
        let result = self.eval_block(&try_stmt.try_block);

        let result = match result {
            Err(RuntimeError::Thrown { value, .. }) if try_stmt.catch_block.is_some() => {
                let catch_block = try_stmt.catch_block.as_ref().expect("checked above");
                self.env.push_scope();
                if let Some(var) = &try_stmt.catch_var {
                    self.env
                        .define(var.clone(), Variable::new(value, TypeExpr::any(), false));
                }
                let catch_result = self.exec_statements(&catch_block.statements);
                self.env.pop_scope();
                catch_result
            }
            other => other,
        };

        if let Some(finally_block) = &try_stmt.finally_block {
            // Stash any pending return/break/continue so the finally body
            // actually executes, then restore it
            let saved = std::mem::replace(&mut self.control_flow, ControlFlow::None);
            let finally_result = self.eval_block(finally_block);
            match finally_result {
                Ok(_) => {
                    if self.control_flow == ControlFlow::None {
                        self.control_flow = saved;
                    }
                    result
                }
                Err(e) => Err(e),
            }
        } else {
            result
        }
    }

    /// switch: cases match by canonical string equality and fall through
    /// until `break`; `default` joins the ordered match unconditionally
    fn eval_switch(&mut self, switch_stmt: &SwitchStmt) -> Result<Value, RuntimeError> {
        let discriminant = self.eval_expr(&switch_stmt.discriminant)?.canonical();

        self.env.push_scope();
        let result = self.eval_switch_cases(switch_stmt, &discriminant);
        self.env.pop_scope();
        result
    }

    fn eval_switch_cases(
        &mut self,
        switch_stmt: &SwitchStmt,
        discriminant: &str,
    ) -> Result<Value, RuntimeError> {
        let mut matched = false;

        'cases: for case in &switch_stmt.cases {
            if !matched {
                match &case.value {
                    None => matched = true,
                    Some(value_expr) => {
                        let value = self.eval_expr(value_expr)?;
                        if value.canonical() == discriminant {
                            matched = true;
                        }
                    }
                }
            }

            if matched {
                for stmt in &case.body {
                    self.eval_statement(stmt)?;
                    match self.control_flow {
                        ControlFlow::Break => {
                            self.control_flow = ControlFlow::None;
                            break 'cases;
                        }
                        ControlFlow::None => {}
                        // continue/return propagate to the enclosing construct
                        _ => break 'cases,
                    }
                }
            }
        }

        Ok(Value::unit())
    }
}
