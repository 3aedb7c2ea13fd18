//! Numeric built-ins
//!
//! The trigonometric/exponential family and `lerp` always return floats.
//! `floor`, `ceil`, and `round` return ints. `abs`, `min`, `max`, `clamp`,
//! and `pow` preserve int when every operand is an int.

use super::{check_arity, want_number, OutputWriter};
use crate::span::Span;
use crate::value::{RuntimeError, Value};

fn all_ints(args: &[Value]) -> bool {
    args.iter().all(|v| matches!(v, Value::Int(_)))
}

macro_rules! unary_float_fn {
    ($name:ident, $label:literal, $method:ident) => {
        #[doc = concat!("`", $label, "(x) -> float`")]
        pub fn $name(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
            check_arity($label, args, 1, span)?;
            let x = want_number($label, &args[0], span)?;
            Ok(Value::Float(x.$method()))
        }
    };
}

unary_float_fn!(sin, "sin", sin);
unary_float_fn!(cos, "cos", cos);
unary_float_fn!(tan, "tan", tan);
unary_float_fn!(asin, "asin", asin);
unary_float_fn!(acos, "acos", acos);
unary_float_fn!(atan, "atan", atan);
unary_float_fn!(sqrt, "sqrt", sqrt);
unary_float_fn!(log, "log", ln);
unary_float_fn!(log10, "log10", log10);
unary_float_fn!(exp, "exp", exp);

/// `atan2(y, x) -> float`
pub fn atan2(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("atan2", args, 2, span)?;
    let y = want_number("atan2", &args[0], span)?;
    let x = want_number("atan2", &args[1], span)?;
    Ok(Value::Float(y.atan2(x)))
}

/// `pow(base, exp)`: int when both operands are non-negative-exponent ints
pub fn pow(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("pow", args, 2, span)?;

    if let (Value::Int(base), Value::Int(exp)) = (&args[0], &args[1]) {
        if *exp >= 0 {
            if let Ok(exp) = u32::try_from(*exp) {
                if let Some(result) = base.checked_pow(exp) {
                    return Ok(Value::Int(result));
                }
            }
        }
    }

    let base = want_number("pow", &args[0], span)?;
    let exp = want_number("pow", &args[1], span)?;
    Ok(Value::Float(base.powf(exp)))
}

/// `abs(x)`: preserves int
pub fn abs(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("abs", args, 1, span)?;
    match &args[0] {
        Value::Int(n) => Ok(Value::Int(n.abs())),
        _ => Ok(Value::Float(want_number("abs", &args[0], span)?.abs())),
    }
}

/// `floor(x) -> int`
pub fn floor(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("floor", args, 1, span)?;
    let x = want_number("floor", &args[0], span)?;
    Ok(Value::Int(x.floor() as i64))
}

/// `ceil(x) -> int`
pub fn ceil(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("ceil", args, 1, span)?;
    let x = want_number("ceil", &args[0], span)?;
    Ok(Value::Int(x.ceil() as i64))
}

/// `round(x) -> int`
pub fn round(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("round", args, 1, span)?;
    let x = want_number("round", &args[0], span)?;
    Ok(Value::Int(x.round() as i64))
}

/// `min(a, b)`: preserves int when both are ints
pub fn min(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("min", args, 2, span)?;
    if let (Value::Int(a), Value::Int(b)) = (&args[0], &args[1]) {
        return Ok(Value::Int(*a.min(b)));
    }
    let a = want_number("min", &args[0], span)?;
    let b = want_number("min", &args[1], span)?;
    Ok(Value::Float(a.min(b)))
}

/// `max(a, b)`: preserves int when both are ints
pub fn max(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("max", args, 2, span)?;
    if let (Value::Int(a), Value::Int(b)) = (&args[0], &args[1]) {
        return Ok(Value::Int(*a.max(b)));
    }
    let a = want_number("max", &args[0], span)?;
    let b = want_number("max", &args[1], span)?;
    Ok(Value::Float(a.max(b)))
}

/// `clamp(v, lo, hi)`: preserves int when every operand is an int
pub fn clamp(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("clamp", args, 3, span)?;
    if all_ints(args) {
        if let (Value::Int(v), Value::Int(lo), Value::Int(hi)) = (&args[0], &args[1], &args[2]) {
            return Ok(Value::Int((*v).max(*lo).min(*hi)));
        }
    }
    let v = want_number("clamp", &args[0], span)?;
    let lo = want_number("clamp", &args[1], span)?;
    let hi = want_number("clamp", &args[2], span)?;
    Ok(Value::Float(v.max(lo).min(hi)))
}

/// `lerp(a, b, t) -> float`
pub fn lerp(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("lerp", args, 3, span)?;
    let a = want_number("lerp", &args[0], span)?;
    let b = want_number("lerp", &args[1], span)?;
    let t = want_number("lerp", &args[2], span)?;
    Ok(Value::Float(a + (b - a) * t))
}

/// `random() -> float` in [0, 1)
pub fn random(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("random", args, 0, span)?;
    Ok(Value::Float(rand::random::<f32>()))
}
