//! String built-ins
//!
//! All positions are character-based, not byte-based.

use super::{check_arity, want_int, want_string, OutputWriter};
use crate::span::Span;
use crate::value::{RuntimeError, Value};

/// `substr(s, start, len)`: out-of-range start yields the empty string
pub fn substr(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("substr", args, 3, span)?;
    let s = want_string("substr", &args[0], span)?;
    let start = want_int("substr", &args[1], span)?;
    let len = want_int("substr", &args[2], span)?;

    let chars: Vec<char> = s.chars().collect();
    if start < 0 || start as usize >= chars.len() || len <= 0 {
        return Ok(Value::string(""));
    }
    let start = start as usize;
    let end = (start + len as usize).min(chars.len());
    Ok(Value::string(chars[start..end].iter().collect::<String>()))
}

/// `toUpper(s)` (ASCII)
pub fn to_upper(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("toUpper", args, 1, span)?;
    let s = want_string("toUpper", &args[0], span)?;
    Ok(Value::string(s.to_ascii_uppercase()))
}

/// `toLower(s)` (ASCII)
pub fn to_lower(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("toLower", args, 1, span)?;
    let s = want_string("toLower", &args[0], span)?;
    Ok(Value::string(s.to_ascii_lowercase()))
}

/// `indexOf(s, sub) -> int`: character index of the first occurrence, -1 if absent
pub fn index_of(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("indexOf", args, 2, span)?;
    let s = want_string("indexOf", &args[0], span)?;
    let sub = want_string("indexOf", &args[1], span)?;

    match s.find(&sub) {
        Some(byte_pos) => Ok(Value::Int(s[..byte_pos].chars().count() as i64)),
        None => Ok(Value::Int(-1)),
    }
}

/// `contains(s, sub) -> bool`
pub fn contains(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("contains", args, 2, span)?;
    let s = want_string("contains", &args[0], span)?;
    let sub = want_string("contains", &args[1], span)?;
    Ok(Value::Bool(s.contains(&sub)))
}

/// `trim(s)`
pub fn trim(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("trim", args, 1, span)?;
    let s = want_string("trim", &args[0], span)?;
    Ok(Value::string(s.trim()))
}

/// `replace(s, from, to)`: first occurrence only
pub fn replace(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("replace", args, 3, span)?;
    let s = want_string("replace", &args[0], span)?;
    let from = want_string("replace", &args[1], span)?;
    let to = want_string("replace", &args[2], span)?;

    if from.is_empty() {
        return Ok(Value::string(s));
    }
    Ok(Value::string(s.replacen(&from, &to, 1)))
}

/// `split(s, d) -> array`
pub fn split(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("split", args, 2, span)?;
    let s = want_string("split", &args[0], span)?;
    let d = want_string("split", &args[1], span)?;

    if d.is_empty() {
        return Ok(Value::array(vec![Value::string(s)]));
    }
    Ok(Value::array(
        s.split(&d).map(Value::string).collect(),
    ))
}

/// `startsWith(s, prefix) -> bool`
pub fn starts_with(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("startsWith", args, 2, span)?;
    let s = want_string("startsWith", &args[0], span)?;
    let prefix = want_string("startsWith", &args[1], span)?;
    Ok(Value::Bool(s.starts_with(&prefix)))
}

/// `endsWith(s, suffix) -> bool`
pub fn ends_with(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("endsWith", args, 2, span)?;
    let s = want_string("endsWith", &args[0], span)?;
    let suffix = want_string("endsWith", &args[1], span)?;
    Ok(Value::Bool(s.ends_with(&suffix)))
}

/// `repeat(s, n)`
pub fn repeat(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("repeat", args, 2, span)?;
    let s = want_string("repeat", &args[0], span)?;
    let n = want_int("repeat", &args[1], span)?;
    if n <= 0 {
        return Ok(Value::string(""));
    }
    Ok(Value::string(s.repeat(n as usize)))
}

/// `charAt(s, i)`: one-character string, empty when out of range
pub fn char_at(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("charAt", args, 2, span)?;
    let s = want_string("charAt", &args[0], span)?;
    let i = want_int("charAt", &args[1], span)?;

    if i < 0 {
        return Ok(Value::string(""));
    }
    match s.chars().nth(i as usize) {
        Some(c) => Ok(Value::string(c.to_string())),
        None => Ok(Value::string("")),
    }
}

/// `charCodeAt(s, i) -> int`: out-of-range index is an error
pub fn char_code_at(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("charCodeAt", args, 2, span)?;
    let s = want_string("charCodeAt", &args[0], span)?;
    let i = want_int("charCodeAt", &args[1], span)?;

    if i < 0 {
        return Err(RuntimeError::IndexOutOfBounds {
            msg: format!("charCodeAt index {} is negative", i),
            span,
        });
    }
    match s.chars().nth(i as usize) {
        Some(c) => Ok(Value::Int(c as i64)),
        None => Err(RuntimeError::IndexOutOfBounds {
            msg: format!("charCodeAt index {} is past the end", i),
            span,
        }),
    }
}
