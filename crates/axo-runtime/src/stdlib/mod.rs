//! Standard library functions
//!
//! Built-ins are plain functions in a process-wide registry, dispatched by
//! name after user programs, functions, and variables have had their chance
//! to resolve the callee.

pub mod array;
pub mod convert;
pub mod io;
pub mod math;
pub mod object;
pub mod string;

use crate::span::Span;
use crate::value::{RuntimeError, Value};
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex, OnceLock};

/// Shared output writer; defaults to stdout, swappable for tests and the REPL
pub type OutputWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Construct a writer that goes to real stdout (the default)
pub fn stdout_writer() -> OutputWriter {
    Arc::new(Mutex::new(Box::new(std::io::stdout())))
}

/// A builtin dispatch function
pub type BuiltinFn = fn(&[Value], Span, &OutputWriter) -> Result<Value, RuntimeError>;

/// Construct an arity error for a builtin
pub(crate) fn arity_error(
    name: &str,
    expected: &str,
    actual: usize,
    span: Span,
) -> RuntimeError {
    RuntimeError::Kind {
        msg: format!("{}() expects {} argument(s), got {}", name, expected, actual),
        span,
    }
}

/// Construct a wrong-kind argument error for a builtin
pub(crate) fn arg_error(name: &str, expected: &str, actual: &Value, span: Span) -> RuntimeError {
    RuntimeError::Kind {
        msg: format!(
            "{}() requires {}, got {}",
            name,
            expected,
            actual.type_name()
        ),
        span,
    }
}

/// Require an exact argument count
pub(crate) fn check_arity(
    name: &str,
    args: &[Value],
    expected: usize,
    span: Span,
) -> Result<(), RuntimeError> {
    if args.len() != expected {
        return Err(arity_error(name, &expected.to_string(), args.len(), span));
    }
    Ok(())
}

/// Extract a string argument
pub(crate) fn want_string(
    name: &str,
    v: &Value,
    span: Span,
) -> Result<String, RuntimeError> {
    match v {
        Value::Str(s) => Ok(s.as_ref().clone()),
        other => Err(arg_error(name, "a string", other, span)),
    }
}

/// Extract an integer argument
pub(crate) fn want_int(name: &str, v: &Value, span: Span) -> Result<i64, RuntimeError> {
    match v {
        Value::Int(n) => Ok(*n),
        other => Err(arg_error(name, "an int", other, span)),
    }
}

/// Extract a numeric argument as f32
pub(crate) fn want_number(name: &str, v: &Value, span: Span) -> Result<f32, RuntimeError> {
    match v {
        Value::Int(n) => Ok(*n as f32),
        Value::Float(n) => Ok(*n),
        other => Err(arg_error(name, "a number", other, span)),
    }
}

static BUILTIN_REGISTRY: OnceLock<HashMap<&'static str, BuiltinFn>> = OnceLock::new();

/// Look up a builtin by name
pub fn lookup(name: &str) -> Option<BuiltinFn> {
    registry().get(name).copied()
}

/// Whether a builtin with this name exists
pub fn is_builtin(name: &str) -> bool {
    registry().contains_key(name)
}

fn registry() -> &'static HashMap<&'static str, BuiltinFn> {
    BUILTIN_REGISTRY.get_or_init(|| {
        let mut m: HashMap<&'static str, BuiltinFn> = HashMap::with_capacity(64);

        // Core and I/O
        m.insert("print", io::print);
        m.insert("write", io::write_file);
        m.insert("read", io::read_file);
        m.insert("readDir", io::read_dir);
        m.insert("copy", io::copy_file);
        m.insert("millis", io::millis);
        m.insert("sleep", io::sleep);
        m.insert("assert", io::assert_cond);
        m.insert("error", io::raise_error);

        // Strings
        m.insert("substr", string::substr);
        m.insert("toUpper", string::to_upper);
        m.insert("toLower", string::to_lower);
        m.insert("indexOf", string::index_of);
        m.insert("contains", string::contains);
        m.insert("trim", string::trim);
        m.insert("replace", string::replace);
        m.insert("split", string::split);
        m.insert("startsWith", string::starts_with);
        m.insert("endsWith", string::ends_with);
        m.insert("repeat", string::repeat);
        m.insert("charAt", string::char_at);
        m.insert("charCodeAt", string::char_code_at);

        // Arrays (len also covers strings)
        m.insert("len", array::len);
        m.insert("push", array::push);
        m.insert("pop", array::pop);
        m.insert("slice", array::slice);
        m.insert("reverse", array::reverse);
        m.insert("join", array::join);
        m.insert("sort", array::sort);
        m.insert("find", array::find);
        m.insert("includes", array::includes);

        // Objects
        m.insert("keys", object::keys);
        m.insert("values", object::values);
        m.insert("hasKey", object::has_key);
        m.insert("clone", object::clone_value);
        m.insert("merge", object::merge);

        // Math
        m.insert("sin", math::sin);
        m.insert("cos", math::cos);
        m.insert("tan", math::tan);
        m.insert("asin", math::asin);
        m.insert("acos", math::acos);
        m.insert("atan", math::atan);
        m.insert("atan2", math::atan2);
        m.insert("sqrt", math::sqrt);
        m.insert("pow", math::pow);
        m.insert("abs", math::abs);
        m.insert("floor", math::floor);
        m.insert("ceil", math::ceil);
        m.insert("round", math::round);
        m.insert("min", math::min);
        m.insert("max", math::max);
        m.insert("log", math::log);
        m.insert("log10", math::log10);
        m.insert("exp", math::exp);
        m.insert("clamp", math::clamp);
        m.insert("lerp", math::lerp);
        m.insert("random", math::random);

        // Conversions
        m.insert("toString", convert::to_string);
        m.insert("toInt", convert::to_int);
        m.insert("toFloat", convert::to_float);
        m.insert("toBool", convert::to_bool);

        m
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        assert!(is_builtin("print"));
        assert!(is_builtin("len"));
        assert!(is_builtin("charCodeAt"));
        assert!(is_builtin("lerp"));
        assert!(!is_builtin("no_such_builtin"));
    }

    #[test]
    fn test_arity_helper() {
        let err = check_arity("len", &[], 1, Span::dummy()).unwrap_err();
        assert!(err.to_string().contains("len() expects 1 argument(s)"));
    }
}
