//! Structural runtime type checking
//!
//! `matches` decides whether a value conforms to a type descriptor. The
//! check is structural: arrays by element, tuples by position, objects by
//! required fields (extra fields allowed), unions by any alternative.

use crate::types::TypeExpr;
use crate::value::Value;
use std::collections::HashMap;

/// Registry of custom types declared with `type Name = ...;`
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, TypeExpr>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a custom type
    pub fn define(&mut self, name: impl Into<String>, ty: TypeExpr) {
        self.types.insert(name.into(), ty);
    }

    /// Resolve a custom type by name
    pub fn resolve(&self, name: &str) -> Option<&TypeExpr> {
        self.types.get(name)
    }

    /// Whether a custom type with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }
}

/// Check whether a value matches a type descriptor
pub fn matches(value: &Value, ty: &TypeExpr, registry: &TypeRegistry) -> bool {
    let mut resolving = Vec::new();
    matches_inner(value, ty, registry, &mut resolving)
}

fn matches_inner(
    value: &Value,
    ty: &TypeExpr,
    registry: &TypeRegistry,
    resolving: &mut Vec<String>,
) -> bool {
    match ty {
        TypeExpr::Name(name) => {
            // Custom types resolve through the registry first; the resolving
            // stack breaks self-referential aliases
            if let Some(resolved) = registry.resolve(name) {
                if resolving.iter().any(|n| n == name) {
                    return false;
                }
                resolving.push(name.clone());
                let result = matches_inner(value, resolved, registry, resolving);
                resolving.pop();
                return result;
            }
            match name.as_str() {
                "any" => true,
                "int" => matches!(value, Value::Int(_)),
                "float" => matches!(value, Value::Float(_)),
                "string" => matches!(value, Value::Str(_)),
                "bool" => matches!(value, Value::Bool(_)),
                "object" => matches!(value, Value::Object(_)),
                "func" | "function" => matches!(value, Value::Function(_)),
                _ => false,
            }
        }
        TypeExpr::IntLiteral(expected) => matches!(value, Value::Int(n) if n == expected),
        TypeExpr::StrLiteral(expected) => {
            matches!(value, Value::Str(s) if s.as_str() == expected)
        }
        TypeExpr::BoolLiteral(expected) => matches!(value, Value::Bool(b) if b == expected),
        TypeExpr::Array(inner) => match value {
            Value::Array(arr) => arr
                .borrow()
                .iter()
                .all(|elem| matches_inner(elem, inner, registry, resolving)),
            _ => false,
        },
        TypeExpr::Tuple(slots) => match value {
            Value::Array(arr) => {
                let arr = arr.borrow();
                arr.len() == slots.len()
                    && arr
                        .iter()
                        .zip(slots.iter())
                        .all(|(elem, slot)| matches_inner(elem, slot, registry, resolving))
            }
            _ => false,
        },
        TypeExpr::Object(fields) => match value {
            Value::Object(obj) => {
                let obj = obj.borrow();
                // Every listed field must exist and match; extras are fine
                fields.iter().all(|(name, field_ty)| {
                    obj.get(name)
                        .map(|v| matches_inner(v, field_ty, registry, resolving))
                        .unwrap_or(false)
                })
            }
            _ => false,
        },
        TypeExpr::Union(parts) => parts
            .iter()
            .any(|part| matches_inner(value, part, registry, resolving)),
        TypeExpr::Function { .. } => matches!(value, Value::Function(_)),
    }
}
