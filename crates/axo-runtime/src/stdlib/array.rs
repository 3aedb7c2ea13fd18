//! Array built-ins
//!
//! Arrays have reference semantics: `push` and `pop` mutate in place
//! through the shared handle, the rest return fresh arrays.

use super::{arg_error, check_arity, want_int, OutputWriter};
use crate::span::Span;
use crate::value::{RuntimeError, Value};
use std::cell::RefCell;
use std::rc::Rc;

fn want_array(
    name: &str,
    v: &Value,
    span: Span,
) -> Result<Rc<RefCell<Vec<Value>>>, RuntimeError> {
    match v {
        Value::Array(arr) => Ok(Rc::clone(arr)),
        other => Err(arg_error(name, "an array", other, span)),
    }
}

/// `len(seq) -> int`: array length or string character count
pub fn len(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("len", args, 1, span)?;
    match &args[0] {
        Value::Array(arr) => Ok(Value::Int(arr.borrow().len() as i64)),
        Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
        other => Err(arg_error("len", "an array or string", other, span)),
    }
}

/// `push(arr, v)`: append in place
///
/// Element typing against a named array's declared `[T]` happens in the
/// evaluator before dispatch reaches here.
pub fn push(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("push", args, 2, span)?;
    let arr = want_array("push", &args[0], span)?;
    arr.borrow_mut().push(args[1].clone());
    Ok(Value::unit())
}

/// `pop(arr)`: remove and return the last element; on an empty array,
/// returns the empty string and leaves the array untouched
pub fn pop(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("pop", args, 1, span)?;
    let arr = want_array("pop", &args[0], span)?;
    let popped = arr.borrow_mut().pop();
    Ok(popped.unwrap_or_else(|| Value::string("")))
}

/// `slice(arr, start, end) -> array` (end exclusive, clamped)
pub fn slice(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("slice", args, 3, span)?;
    let arr = want_array("slice", &args[0], span)?;
    let start = want_int("slice", &args[1], span)?;
    let end = want_int("slice", &args[2], span)?;

    let arr = arr.borrow();
    let start = start.max(0) as usize;
    let end = (end.max(0) as usize).min(arr.len());
    if start >= end {
        return Ok(Value::array(Vec::new()));
    }
    Ok(Value::array(arr[start..end].to_vec()))
}

/// `reverse(arr) -> array`: a fresh array in reverse order
pub fn reverse(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("reverse", args, 1, span)?;
    let arr = want_array("reverse", &args[0], span)?;
    let reversed: Vec<Value> = arr.borrow().iter().rev().cloned().collect();
    Ok(Value::array(reversed))
}

/// `join(arr, sep) -> string` of canonical element forms
pub fn join(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("join", args, 2, span)?;
    let arr = want_array("join", &args[0], span)?;
    let sep = match &args[1] {
        Value::Str(s) => s.as_ref().clone(),
        other => return Err(arg_error("join", "a string separator", other, span)),
    };

    let joined = arr
        .borrow()
        .iter()
        .map(|v| v.canonical())
        .collect::<Vec<_>>()
        .join(&sep);
    Ok(Value::string(joined))
}

/// `sort(arr) -> array`: fresh array sorted lexicographically on canonical
/// string form
pub fn sort(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("sort", args, 1, span)?;
    let arr = want_array("sort", &args[0], span)?;
    let mut sorted: Vec<Value> = arr.borrow().clone();
    sorted.sort_by_key(|v| v.canonical());
    Ok(Value::array(sorted))
}

/// `find(arr, v) -> int`: index of the first canonical-equal element, -1 if
/// absent
pub fn find(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("find", args, 2, span)?;
    let arr = want_array("find", &args[0], span)?;
    let needle = args[1].canonical();

    let index = arr
        .borrow()
        .iter()
        .position(|v| v.canonical() == needle)
        .map(|i| i as i64)
        .unwrap_or(-1);
    Ok(Value::Int(index))
}

/// `includes(arr, v) -> bool`
pub fn includes(args: &[Value], span: Span, output: &OutputWriter) -> Result<Value, RuntimeError> {
    let index = find(args, span, output)?;
    Ok(Value::Bool(index != Value::Int(-1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdlib::stdout_writer;

    fn ints(ns: &[i64]) -> Value {
        Value::array(ns.iter().map(|n| Value::Int(*n)).collect())
    }

    #[test]
    fn test_len() {
        let out = stdout_writer();
        assert_eq!(len(&[ints(&[1, 2, 3])], Span::dummy(), &out).unwrap(), Value::Int(3));
        assert_eq!(
            len(&[Value::string("hello")], Span::dummy(), &out).unwrap(),
            Value::Int(5)
        );
        assert!(len(&[Value::Int(1)], Span::dummy(), &out).is_err());
    }

    #[test]
    fn test_push_mutates_shared() {
        let out = stdout_writer();
        let arr = ints(&[1]);
        let alias = arr.clone();
        push(&[arr, Value::Int(2)], Span::dummy(), &out).unwrap();
        assert_eq!(alias.canonical(), "[1, 2]");
    }

    #[test]
    fn test_pop() {
        let out = stdout_writer();
        let arr = ints(&[1, 2]);
        assert_eq!(pop(&[arr.clone()], Span::dummy(), &out).unwrap(), Value::Int(2));
        assert_eq!(arr.canonical(), "[1]");
    }

    #[test]
    fn test_pop_empty_returns_empty_string() {
        let out = stdout_writer();
        let arr = ints(&[]);
        assert_eq!(
            pop(&[arr.clone()], Span::dummy(), &out).unwrap(),
            Value::string("")
        );
        assert_eq!(arr.canonical(), "[]");
    }

    #[test]
    fn test_slice_whole_is_identity() {
        let out = stdout_writer();
        let arr = ints(&[1, 2, 3]);
        let sliced = slice(
            &[arr.clone(), Value::Int(0), Value::Int(3)],
            Span::dummy(),
            &out,
        )
        .unwrap();
        assert_eq!(sliced, arr);
    }

    #[test]
    fn test_reverse_twice_is_identity() {
        let out = stdout_writer();
        let arr = ints(&[1, 2, 3]);
        let once = reverse(&[arr.clone()], Span::dummy(), &out).unwrap();
        let twice = reverse(&[once], Span::dummy(), &out).unwrap();
        assert_eq!(twice, arr);
    }

    #[test]
    fn test_join() {
        let out = stdout_writer();
        assert_eq!(
            join(&[ints(&[1, 2, 3]), Value::string("-")], Span::dummy(), &out).unwrap(),
            Value::string("1-2-3")
        );
    }

    #[test]
    fn test_sort_canonical() {
        let out = stdout_writer();
        let arr = Value::array(vec![
            Value::string("pear"),
            Value::string("apple"),
            Value::string("banana"),
        ]);
        let sorted = sort(&[arr], Span::dummy(), &out).unwrap();
        assert_eq!(sorted.canonical(), "[apple, banana, pear]");
    }

    #[test]
    fn test_find_and_includes() {
        let out = stdout_writer();
        let arr = ints(&[10, 20, 30]);
        assert_eq!(
            find(&[arr.clone(), Value::Int(20)], Span::dummy(), &out).unwrap(),
            Value::Int(1)
        );
        assert_eq!(
            find(&[arr.clone(), Value::Int(99)], Span::dummy(), &out).unwrap(),
            Value::Int(-1)
        );
        assert_eq!(
            includes(&[arr.clone(), Value::Int(30)], Span::dummy(), &out).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            includes(&[arr, Value::Int(99)], Span::dummy(), &out).unwrap(),
            Value::Bool(false)
        );
    }
}
