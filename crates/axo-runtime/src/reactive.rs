//! Reactive pending-when tracking
//!
//! A `when (cond) { body }` statement registers a pending entry whose
//! dependency list is the set of identifiers appearing in the condition.
//! The evaluator re-checks entries after name assignments (and, for entries
//! with no dependencies, after every expression statement); a truthy
//! condition fires the body exactly once and drops the entry.

use crate::ast::{Expr, WhenStmt};
use std::rc::Rc;

/// A registered `when` guard waiting for its condition to become true
#[derive(Debug, Clone)]
pub struct PendingWhen {
    /// The guard's condition and body
    pub stmt: Rc<WhenStmt>,
    /// Variable names the condition syntactically depends on; an empty list
    /// means "re-check after anything"
    pub deps: Vec<String>,
}

impl PendingWhen {
    /// Register a guard, collecting its condition's dependencies
    pub fn new(stmt: Rc<WhenStmt>) -> Self {
        let deps = collect_dependencies(&stmt.cond);
        Self { stmt, deps }
    }

    /// Whether an assignment to `name` should re-check this entry
    pub fn depends_on(&self, name: &str) -> bool {
        self.deps.is_empty() || self.deps.iter().any(|d| d == name)
    }
}

/// Collect the identifiers appearing anywhere in an expression, in first
/// occurrence order, deduplicated
pub fn collect_dependencies(expr: &Expr) -> Vec<String> {
    let mut deps = Vec::new();
    walk(expr, &mut deps);
    deps
}

fn add(deps: &mut Vec<String>, name: &str) {
    if !deps.iter().any(|d| d == name) {
        deps.push(name.to_string());
    }
}

fn walk(expr: &Expr, deps: &mut Vec<String>) {
    match expr {
        Expr::Int(..) | Expr::Float(..) | Expr::Str(..) | Expr::Bool(..) | Expr::Function(_) => {}
        Expr::Ident(id) => add(deps, &id.name),
        Expr::Binary(b) => {
            walk(&b.left, deps);
            walk(&b.right, deps);
        }
        Expr::Unary(u) => walk(&u.operand, deps),
        Expr::Call(c) => {
            walk(&c.callee, deps);
            for arg in &c.args {
                walk(arg, deps);
            }
        }
        Expr::Index(ix) => {
            walk(&ix.target, deps);
            walk(&ix.index, deps);
        }
        Expr::Field(fx) => walk(&fx.target, deps),
        Expr::Array(arr) => {
            for elem in &arr.elements {
                walk(elem, deps);
            }
        }
        Expr::Object(obj) => {
            for (_, value) in &obj.fields {
                walk(value, deps);
            }
        }
        Expr::Assign(a) => {
            add(deps, &a.name.name);
            walk(&a.value, deps);
        }
        Expr::IndexAssign(a) => {
            walk(&a.target, deps);
            walk(&a.index, deps);
            walk(&a.value, deps);
        }
        Expr::FieldAssign(a) => {
            walk(&a.target, deps);
            walk(&a.value, deps);
        }
        Expr::Await(a) => walk(&a.expr, deps),
    }
}
