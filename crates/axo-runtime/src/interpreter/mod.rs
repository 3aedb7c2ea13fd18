//! AST interpreter (tree-walking)
//!
//! Direct AST evaluation with environment-based variable storage. Control
//! flow (`return`/`break`/`continue`) travels in a control-flow slot that
//! unwinds statement execution; thrown user values travel as the `Thrown`
//! error kind so `try`/`catch` can intercept exactly them and nothing else.

mod expr;
mod stmt;
mod template;

use crate::ast::{Block, FunctionDecl, Item, Param, Program, ProgramDecl};
use crate::environment::{Environment, Variable};
use crate::module_loader::ModuleSet;
use crate::reactive::PendingWhen;
use crate::span::Span;
use crate::stdlib::{stdout_writer, OutputWriter};
use crate::typechecker::TypeRegistry;
use crate::types::TypeExpr;
use crate::value::{FunctionRef, RuntimeError, Value};
use std::collections::HashMap;
use std::rc::Rc;

/// Control flow signal for return, break, and continue
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ControlFlow {
    None,
    Break,
    Continue,
    Return(Value),
}

/// Interpreter state
pub struct Interpreter {
    /// Scope stack
    pub(crate) env: Environment,
    /// Named function registry
    pub(crate) functions: HashMap<String, Rc<FunctionDecl>>,
    /// Program registry (awaitable tasks)
    pub(crate) programs: HashMap<String, Rc<ProgramDecl>>,
    /// Custom type registry
    pub(crate) types: TypeRegistry,
    /// Current control flow state
    pub(crate) control_flow: ControlFlow,
    /// Identifier metadata from the most recent load, consumed by `typeof`
    pub(crate) last_ident: Option<(String, TypeExpr)>,
    /// Registered `when` guards awaiting their condition
    pub(crate) pending: Vec<PendingWhen>,
    /// Loaded modules, visited set, and resolution state
    pub(crate) modules: ModuleSet,
    /// Where `print` goes
    pub(crate) output: OutputWriter,
}

impl Interpreter {
    /// Create a new interpreter printing to stdout
    pub fn new() -> Self {
        Self::with_output(stdout_writer())
    }

    /// Create a new interpreter with a custom output writer
    pub fn with_output(output: OutputWriter) -> Self {
        Self {
            env: Environment::new(),
            functions: HashMap::new(),
            programs: HashMap::new(),
            types: TypeRegistry::new(),
            control_flow: ControlFlow::None,
            last_ident: None,
            pending: Vec::new(),
            modules: ModuleSet::new(),
            output,
        }
    }

    /// Set the directory module paths resolve against for the entry source
    pub fn set_entry_dir(&mut self, dir: std::path::PathBuf) {
        self.modules.entry_dir = dir;
    }

    /// Mark the entry module path as loaded so it is never re-imported
    pub fn mark_entry_path(&mut self, path: std::path::PathBuf) {
        self.modules.visited.insert(path);
    }

    /// Evaluate a program; returns the value of the last top-level statement
    pub fn run(&mut self, program: &Program) -> Result<Value, RuntimeError> {
        self.run_items(&program.items)
    }

    /// Evaluate a sequence of items (the entry program or a module body)
    pub(crate) fn run_items(&mut self, items: &[Item]) -> Result<Value, RuntimeError> {
        let mut last_value = Value::unit();

        for item in items {
            last_value = self.eval_item(item)?;

            if let ControlFlow::Return(value) =
                std::mem::replace(&mut self.control_flow, ControlFlow::None)
            {
                return Ok(value);
            }
        }

        Ok(last_value)
    }

    /// Evaluate a single top-level item
    pub(crate) fn eval_item(&mut self, item: &Item) -> Result<Value, RuntimeError> {
        match item {
            Item::Function(func) => {
                self.register_function(func);
                Ok(Value::unit())
            }
            Item::Program(prog) => {
                self.register_program(prog);
                Ok(Value::unit())
            }
            Item::TypeAlias(decl) => {
                self.types.define(decl.name.clone(), decl.ty.clone());
                Ok(Value::unit())
            }
            Item::Import(decl) => self.eval_import(decl),
            Item::Use(decl) => self.eval_use(decl),
            Item::Export(decl) => self.eval_export(decl),
            Item::Statement(stmt) => self.eval_statement(stmt),
        }
    }

    /// Register a named function and bind it as a value for first-class use
    pub(crate) fn register_function(&mut self, func: &Rc<FunctionDecl>) {
        self.functions.insert(func.name.clone(), Rc::clone(func));
        self.env.define(
            func.name.clone(),
            Variable::new(
                Value::Function(FunctionRef::Decl(Rc::clone(func))),
                TypeExpr::name("function"),
                false,
            ),
        );
    }

    /// Register a program declaration
    pub(crate) fn register_program(&mut self, prog: &Rc<ProgramDecl>) {
        self.programs.insert(prog.name.clone(), Rc::clone(prog));
    }

    /// Invoke a parameterized body: push exactly one scope, bind arguments
    /// positionally with exact arity, run, and pop the scope on every exit
    /// path. A `return` signal becomes the call's value; falling off the end
    /// yields the unit value.
    pub(crate) fn call_with_params(
        &mut self,
        name: &str,
        params: &[Param],
        body: &Block,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value, RuntimeError> {
        if args.len() != params.len() {
            return Err(RuntimeError::Type {
                msg: format!(
                    "{}() expects {} argument(s), got {}",
                    name,
                    params.len(),
                    args.len()
                ),
                span,
            });
        }

        self.env.push_scope();
        for (param, arg) in params.iter().zip(args) {
            // Parameter binding does not re-check types
            self.env.define(
                param.name.clone(),
                Variable::new(arg, param.type_expr.clone(), false),
            );
        }

        let result = self.exec_statements(&body.statements);
        let outcome = match result {
            Ok(_) => match std::mem::replace(&mut self.control_flow, ControlFlow::None) {
                ControlFlow::Return(value) => Ok(value),
                _ => Ok(Value::unit()),
            },
            Err(e) => Err(e),
        };
        self.env.pop_scope();
        outcome
    }

    /// Evaluate a block in its own scope
    pub(crate) fn eval_block(&mut self, block: &Block) -> Result<Value, RuntimeError> {
        self.env.push_scope();
        let result = self.exec_statements(&block.statements);
        self.env.pop_scope();
        result
    }

    /// Run statements in the current scope, stopping on any control signal
    pub(crate) fn exec_statements(
        &mut self,
        statements: &[crate::ast::Stmt],
    ) -> Result<Value, RuntimeError> {
        let mut last_value = Value::unit();

        for stmt in statements {
            last_value = self.eval_statement(stmt)?;
            if self.control_flow != ControlFlow::None {
                break;
            }
        }

        Ok(last_value)
    }

    /// Re-check pending `when` guards after an assignment to `name`, or
    /// (with `None`) the entries with empty dependency lists after an
    /// expression statement. A truthy condition fires the body once in the
    /// current scope and drops the entry; condition errors are swallowed and
    /// the entry retained.
    pub(crate) fn run_pending(&mut self, changed: Option<&str>) -> Result<(), RuntimeError> {
        let mut i = 0;
        while i < self.pending.len() {
            let entry = self.pending[i].clone();
            let relevant = match changed {
                Some(name) => entry.depends_on(name),
                None => entry.deps.is_empty(),
            };
            if !relevant {
                i += 1;
                continue;
            }

            let truthy = match self.eval_expr(&entry.stmt.cond) {
                Ok(v) => v.is_truthy(),
                Err(_) => {
                    i += 1;
                    continue;
                }
            };

            if truthy {
                self.pending.remove(i);
                self.eval_block(&entry.stmt.body)?;
            } else {
                i += 1;
            }
        }
        Ok(())
    }

    /// Resolve a name's declared array element type, following custom type
    /// aliases, for `push`/element-assignment enforcement
    pub(crate) fn declared_element_type(&self, name: &str) -> Option<TypeExpr> {
        let mut ty = self.env.get(name)?.declared_type.clone();
        let mut hops = 0;
        while let TypeExpr::Name(alias) = &ty {
            match self.types.resolve(alias) {
                Some(resolved) if hops < 16 => {
                    ty = resolved.clone();
                    hops += 1;
                }
                _ => return None,
            }
        }
        ty.array_element().cloned()
    }

    /// Resolve a name's declared object field types the same way
    pub(crate) fn declared_field_type(&self, name: &str, field: &str) -> Option<TypeExpr> {
        let mut ty = self.env.get(name)?.declared_type.clone();
        let mut hops = 0;
        while let TypeExpr::Name(alias) = &ty {
            match self.types.resolve(alias) {
                Some(resolved) if hops < 16 => {
                    ty = resolved.clone();
                    hops += 1;
                }
                _ => return None,
            }
        }
        match ty {
            TypeExpr::Object(fields) => fields
                .iter()
                .find(|(f, _)| f == field)
                .map(|(_, t)| t.clone()),
            _ => None,
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
