//! Runtime value representation
//!
//! Shared value representation for the evaluator.
//! - Ints, floats, bools: immediate values
//! - Strings: heap-allocated, reference-counted, immutable
//! - Arrays: `Rc<RefCell<Vec<Value>>>`, mutable through any alias
//! - Objects: `Rc<RefCell<IndexMap>>`, insertion-order preserved
//! - Functions: handles to reference-counted AST nodes

use crate::ast::{FunctionDecl, FunctionExpr};
use crate::span::Span;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Runtime value type
#[derive(Debug, Clone)]
pub enum Value {
    /// Integer value
    Int(i64),
    /// Float value
    Float(f32),
    /// Boolean value
    Bool(bool),
    /// String value (reference-counted, immutable)
    Str(Rc<String>),
    /// Array value (reference semantics)
    Array(Rc<RefCell<Vec<Value>>>),
    /// Object value (reference semantics, insertion-order preserved)
    Object(Rc<RefCell<IndexMap<String, Value>>>),
    /// Function handle
    Function(FunctionRef),
}

/// Handle to a function declaration or function expression AST node
#[derive(Debug, Clone)]
pub enum FunctionRef {
    Decl(Rc<FunctionDecl>),
    Expr(Rc<FunctionExpr>),
}

impl FunctionRef {
    /// Number of declared parameters
    pub fn arity(&self) -> usize {
        match self {
            FunctionRef::Decl(f) => f.params.len(),
            FunctionRef::Expr(f) => f.params.len(),
        }
    }
}

impl PartialEq for FunctionRef {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FunctionRef::Decl(a), FunctionRef::Decl(b)) => Rc::ptr_eq(a, b),
            (FunctionRef::Expr(a), FunctionRef::Expr(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    /// The unit value: what statements and value-less returns evaluate to
    pub fn unit() -> Self {
        Value::Int(0)
    }

    /// Create a new string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Rc::new(s.into()))
    }

    /// Create a new array value
    pub fn array(values: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(values)))
    }

    /// Create a new object value
    pub fn object(fields: IndexMap<String, Value>) -> Self {
        Value::Object(Rc::new(RefCell::new(fields)))
    }

    /// Create a new empty object value
    pub fn empty_object() -> Self {
        Value::object(IndexMap::new())
    }

    /// Get the runtime type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    /// Truthiness: a bool is itself, nonzero numerics are true, nonempty
    /// strings/arrays/objects are true, everything else is false
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Array(arr) => !arr.borrow().is_empty(),
            Value::Object(obj) => !obj.borrow().is_empty(),
            Value::Function(_) => false,
        }
    }

    /// Canonical string form, used for printing and aggregate equality.
    ///
    /// The printer keeps a visited set of aggregate addresses so reference
    /// cycles terminate; a revisited array renders as `[...]` and a
    /// revisited object as `{...}`.
    pub fn canonical(&self) -> String {
        let mut visited = Vec::new();
        self.canonical_inner(&mut visited)
    }

    fn canonical_inner(&self, visited: &mut Vec<usize>) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Str(s) => s.as_ref().clone(),
            Value::Function(_) => "[function]".to_string(),
            Value::Array(arr) => {
                let addr = Rc::as_ptr(arr) as usize;
                if visited.contains(&addr) {
                    return "[...]".to_string();
                }
                visited.push(addr);
                let rendered: Vec<String> = arr
                    .borrow()
                    .iter()
                    .map(|v| v.canonical_inner(visited))
                    .collect();
                visited.pop();
                format!("[{}]", rendered.join(", "))
            }
            Value::Object(obj) => {
                let addr = Rc::as_ptr(obj) as usize;
                if visited.contains(&addr) {
                    return "{...}".to_string();
                }
                visited.push(addr);
                let rendered: Vec<String> = obj
                    .borrow()
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v.canonical_inner(visited)))
                    .collect();
                visited.pop();
                format!("{{{}}}", rendered.join(", "))
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            // Aggregates compare by canonical string form
            (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
                self.canonical() == other.canonical()
            }
            _ => false,
        }
    }
}

/// Runtime error taxonomy with source positions
///
/// `Thrown` carries a user-level `throw` value; it is the only kind a
/// `catch` block may intercept. Everything else is fatal to interpretation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    /// Declared/observed type mismatch or arity mismatch
    #[error("Type error: {msg}")]
    Type { msg: String, span: Span },
    /// Undefined variable
    #[error("Undefined variable: {name}")]
    UndefinedVariable { name: String, span: Span },
    /// Undefined function
    #[error("Undefined function: {name}")]
    UndefinedFunction { name: String, span: Span },
    /// Array or string index out of bounds
    #[error("Index out of bounds: {msg}")]
    IndexOutOfBounds { msg: String, span: Span },
    /// Operation applied to the wrong kind of value
    #[error("{msg}")]
    Kind { msg: String, span: Span },
    /// Integer division or modulo by zero
    #[error("Division by zero")]
    DivideByZero { span: Span },
    /// File open/read/write failure
    #[error("IO error: {msg}")]
    Io { msg: String, span: Span },
    /// User-level thrown value, catchable by `try`/`catch`
    #[error("Uncaught thrown value: {}", .value.canonical())]
    Thrown { value: Value, span: Span },
}

impl RuntimeError {
    /// Get the source position for this error
    pub fn span(&self) -> Span {
        match self {
            RuntimeError::Type { span, .. } => *span,
            RuntimeError::UndefinedVariable { span, .. } => *span,
            RuntimeError::UndefinedFunction { span, .. } => *span,
            RuntimeError::IndexOutOfBounds { span, .. } => *span,
            RuntimeError::Kind { span, .. } => *span,
            RuntimeError::DivideByZero { span } => *span,
            RuntimeError::Io { span, .. } => *span,
            RuntimeError::Thrown { span, .. } => *span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Int(42).type_name(), "int");
        assert_eq!(Value::Float(1.5).type_name(), "float");
        assert_eq!(Value::string("hi").type_name(), "string");
        assert_eq!(Value::Bool(true).type_name(), "bool");
        assert_eq!(Value::array(vec![]).type_name(), "array");
        assert_eq!(Value::empty_object().type_name(), "object");
    }

    #[test]
    fn test_truthiness() {
        assert!(Value::Bool(true).is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Int(1).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(Value::Float(0.5).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(Value::string("x").is_truthy());
        assert!(!Value::string("").is_truthy());
        assert!(Value::array(vec![Value::Int(1)]).is_truthy());
        assert!(!Value::array(vec![]).is_truthy());
        assert!(!Value::empty_object().is_truthy());
    }

    #[test]
    fn test_canonical_primitives() {
        assert_eq!(Value::Int(42).canonical(), "42");
        assert_eq!(Value::Float(3.14).canonical(), "3.14");
        assert_eq!(Value::Float(2.0).canonical(), "2");
        assert_eq!(Value::Bool(true).canonical(), "true");
        assert_eq!(Value::string("hi").canonical(), "hi");
    }

    #[test]
    fn test_canonical_aggregates() {
        let arr = Value::array(vec![Value::Int(1), Value::string("a")]);
        assert_eq!(arr.canonical(), "[1, a]");

        let mut fields = IndexMap::new();
        fields.insert("b".to_string(), Value::Int(2));
        fields.insert("a".to_string(), Value::Int(1));
        // Insertion order, not key order
        assert_eq!(Value::object(fields).canonical(), "{b: 2, a: 1}");
    }

    #[test]
    fn test_canonical_cycle_terminates() {
        let arr = Value::array(vec![Value::Int(1)]);
        if let Value::Array(inner) = &arr {
            inner.borrow_mut().push(arr.clone());
        }
        assert_eq!(arr.canonical(), "[1, [...]]");
    }

    #[test]
    fn test_aliasing() {
        let a = Value::array(vec![Value::Int(1)]);
        let b = a.clone();
        if let Value::Array(arr) = &a {
            arr.borrow_mut().push(Value::Int(2));
        }
        if let Value::Array(arr) = &b {
            assert_eq!(arr.borrow().len(), 2);
        }
    }

    #[test]
    fn test_aggregate_equality_is_canonical() {
        let a = Value::array(vec![Value::Int(1), Value::Int(2)]);
        let b = Value::array(vec![Value::Int(1), Value::Int(2)]);
        // Distinct references with the same canonical form compare equal
        assert_eq!(a, b);
        if let Value::Array(arr) = &b {
            arr.borrow_mut().push(Value::Int(3));
        }
        assert_ne!(a, b);
    }

    #[test]
    fn test_error_display() {
        let err = RuntimeError::DivideByZero { span: Span::dummy() };
        assert_eq!(err.to_string(), "Division by zero");

        let err = RuntimeError::UndefinedVariable {
            name: "foo".to_string(),
            span: Span::new(1, 2),
        };
        assert_eq!(err.to_string(), "Undefined variable: foo");
    }
}
