//! Object built-ins

use super::{arg_error, check_arity, want_string, OutputWriter};
use crate::span::Span;
use crate::value::{RuntimeError, Value};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

fn want_object(
    name: &str,
    v: &Value,
    span: Span,
) -> Result<Rc<RefCell<IndexMap<String, Value>>>, RuntimeError> {
    match v {
        Value::Object(obj) => Ok(Rc::clone(obj)),
        other => Err(arg_error(name, "an object", other, span)),
    }
}

/// `keys(obj) -> array` of field names in insertion order
pub fn keys(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("keys", args, 1, span)?;
    let obj = want_object("keys", &args[0], span)?;
    let names: Vec<Value> = obj.borrow().keys().map(Value::string).collect();
    Ok(Value::array(names))
}

/// `values(obj) -> array` of field values in insertion order
pub fn values(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("values", args, 1, span)?;
    let obj = want_object("values", &args[0], span)?;
    let vals: Vec<Value> = obj.borrow().values().cloned().collect();
    Ok(Value::array(vals))
}

/// `hasKey(obj, key) -> bool`
pub fn has_key(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("hasKey", args, 2, span)?;
    let obj = want_object("hasKey", &args[0], span)?;
    let key = want_string("hasKey", &args[1], span)?;
    let present = obj.borrow().contains_key(&key);
    Ok(Value::Bool(present))
}

/// `clone(v)`: shallow copy; a cloned aggregate is a fresh container whose
/// elements still alias the originals
pub fn clone_value(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("clone", args, 1, span)?;
    match &args[0] {
        Value::Array(arr) => Ok(Value::array(arr.borrow().clone())),
        Value::Object(obj) => Ok(Value::object(obj.borrow().clone())),
        primitive => Ok(primitive.clone()),
    }
}

/// `merge(o1, o2) -> object`: fresh object with o1's fields, then o2's
/// overriding on collision
pub fn merge(args: &[Value], span: Span, _: &OutputWriter) -> Result<Value, RuntimeError> {
    check_arity("merge", args, 2, span)?;
    let first = want_object("merge", &args[0], span)?;
    let second = want_object("merge", &args[1], span)?;

    let mut merged = first.borrow().clone();
    for (k, v) in second.borrow().iter() {
        merged.insert(k.clone(), v.clone());
    }
    Ok(Value::object(merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdlib::stdout_writer;

    fn obj(pairs: &[(&str, Value)]) -> Value {
        let mut map = IndexMap::new();
        for (k, v) in pairs {
            map.insert(k.to_string(), v.clone());
        }
        Value::object(map)
    }

    #[test]
    fn test_keys_in_insertion_order() {
        let out = stdout_writer();
        let o = obj(&[("b", Value::Int(1)), ("a", Value::Int(2))]);
        assert_eq!(keys(&[o], Span::dummy(), &out).unwrap().canonical(), "[b, a]");
    }

    #[test]
    fn test_values() {
        let out = stdout_writer();
        let o = obj(&[("a", Value::Int(1)), ("b", Value::string("x"))]);
        assert_eq!(values(&[o], Span::dummy(), &out).unwrap().canonical(), "[1, x]");
    }

    #[test]
    fn test_has_key() {
        let out = stdout_writer();
        let o = obj(&[("a", Value::Int(1))]);
        assert_eq!(
            has_key(&[o.clone(), Value::string("a")], Span::dummy(), &out).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            has_key(&[o, Value::string("z")], Span::dummy(), &out).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_clone_is_shallow() {
        let out = stdout_writer();
        let inner = Value::array(vec![Value::Int(1)]);
        let o = obj(&[("xs", inner.clone())]);
        let copy = clone_value(&[o.clone()], Span::dummy(), &out).unwrap();

        // New top-level container
        if let (Value::Object(a), Value::Object(b)) = (&o, &copy) {
            assert!(!Rc::ptr_eq(a, b));
        } else {
            panic!("expected objects");
        }

        // Inner array is still shared
        if let Value::Array(arr) = &inner {
            arr.borrow_mut().push(Value::Int(2));
        }
        assert_eq!(copy.canonical(), "{xs: [1, 2]}");
    }

    #[test]
    fn test_merge_overrides() {
        let out = stdout_writer();
        let a = obj(&[("x", Value::Int(1)), ("y", Value::Int(2))]);
        let b = obj(&[("y", Value::Int(9)), ("z", Value::Int(3))]);
        let merged = merge(&[a, b], Span::dummy(), &out).unwrap();
        assert_eq!(merged.canonical(), "{x: 1, y: 9, z: 3}");
    }
}
