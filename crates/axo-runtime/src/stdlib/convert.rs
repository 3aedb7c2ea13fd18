//! Conversion built-ins

use super::{check_arity, OutputWriter};
use crate::span::Span;
use crate::value::{RuntimeError, Value};

/// `toString(v) -> string`: the canonical form
pub fn to_string(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("toString", args, 1, span)?;
    Ok(Value::string(args[0].canonical()))
}

/// `toInt(v) -> int`
///
/// Floats truncate toward zero, bools become 0/1, strings parse after
/// trimming. A string that does not parse is an error.
pub fn to_int(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("toInt", args, 1, span)?;
    match &args[0] {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Float(n) => Ok(Value::Int(*n as i64)),
        Value::Bool(b) => Ok(Value::Int(if *b { 1 } else { 0 })),
        Value::Str(s) => s.trim().parse::<i64>().map(Value::Int).map_err(|_| {
            RuntimeError::Kind {
                msg: format!("toInt() cannot parse '{}'", s),
                span,
            }
        }),
        other => Err(RuntimeError::Kind {
            msg: format!("toInt() cannot convert {}", other.type_name()),
            span,
        }),
    }
}

/// `toFloat(v) -> float`
pub fn to_float(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("toFloat", args, 1, span)?;
    match &args[0] {
        Value::Int(n) => Ok(Value::Float(*n as f32)),
        Value::Float(n) => Ok(Value::Float(*n)),
        Value::Bool(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
        Value::Str(s) => s.trim().parse::<f32>().map(Value::Float).map_err(|_| {
            RuntimeError::Kind {
                msg: format!("toFloat() cannot parse '{}'", s),
                span,
            }
        }),
        other => Err(RuntimeError::Kind {
            msg: format!("toFloat() cannot convert {}", other.type_name()),
            span,
        }),
    }
}

/// `toBool(v) -> bool`
///
/// The strings "true" and "false" convert to their named value; everything
/// else follows truthiness.
pub fn to_bool(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("toBool", args, 1, span)?;
    let result = match &args[0] {
        Value::Str(s) if s.as_str() == "true" => true,
        Value::Str(s) if s.as_str() == "false" => false,
        other => other.is_truthy(),
    };
    Ok(Value::Bool(result))
}
