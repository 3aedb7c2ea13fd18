//! Type descriptors
//!
//! The parser builds a structural `TypeExpr` for every annotation; the
//! runtime checker matches values against it and `Display` renders the
//! canonical textual form (used by `typeof` and in diagnostics).

use std::fmt;

/// A parsed type descriptor
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// Base type (`int`, `float`, `string`, `bool`, `object`, `any`, `void`,
    /// `func`) or the name of a custom type resolved through the registry
    Name(String),
    /// Integer literal type (`3`)
    IntLiteral(i64),
    /// String literal type (`"ok"`)
    StrLiteral(String),
    /// Boolean literal type (`true` / `false`)
    BoolLiteral(bool),
    /// Uniform array type `[T]`
    Array(Box<TypeExpr>),
    /// Fixed-length positional array type `[T1,T2,...]`
    Tuple(Vec<TypeExpr>),
    /// Structural object type `{f1:T1, f2:T2, ...}`
    Object(Vec<(String, TypeExpr)>),
    /// Union `T1|T2|...`
    Union(Vec<TypeExpr>),
    /// Function type `(T1,T2)->R`
    Function {
        params: Vec<TypeExpr>,
        ret: Box<TypeExpr>,
    },
}

impl TypeExpr {
    /// Shorthand for a named type
    pub fn name(s: impl Into<String>) -> Self {
        TypeExpr::Name(s.into())
    }

    /// The `any` type
    pub fn any() -> Self {
        TypeExpr::Name("any".to_string())
    }

    /// Whether this descriptor is "complex": it contains a union or an
    /// array/tuple form at any depth, or is `any`. Assignment to a binding
    /// with a simple base type skips the structural check entirely.
    pub fn is_complex(&self) -> bool {
        match self {
            TypeExpr::Name(n) => n == "any",
            TypeExpr::Union(_) | TypeExpr::Array(_) | TypeExpr::Tuple(_) => true,
            TypeExpr::Object(fields) => fields.iter().any(|(_, t)| t.is_complex()),
            TypeExpr::Function { params, ret } => {
                params.iter().any(|t| t.is_complex()) || ret.is_complex()
            }
            TypeExpr::IntLiteral(_) | TypeExpr::StrLiteral(_) | TypeExpr::BoolLiteral(_) => false,
        }
    }

    /// The element type when this is an array descriptor `[T]`
    pub fn array_element(&self) -> Option<&TypeExpr> {
        match self {
            TypeExpr::Array(inner) => Some(inner),
            _ => None,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Name(n) => write!(f, "{}", n),
            TypeExpr::IntLiteral(n) => write!(f, "{}", n),
            TypeExpr::StrLiteral(s) => write!(f, "\"{}\"", s),
            TypeExpr::BoolLiteral(b) => write!(f, "{}", b),
            TypeExpr::Array(inner) => write!(f, "[{}]", inner),
            TypeExpr::Tuple(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            TypeExpr::Object(fields) => {
                write!(f, "{{")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}:{}", name, ty)?;
                }
                write!(f, "}}")
            }
            TypeExpr::Union(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    write!(f, "{}", part)?;
                }
                Ok(())
            }
            TypeExpr::Function { params, ret } => {
                write!(f, "(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", p)?;
                }
                write!(f, ")->{}", ret)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_base() {
        assert_eq!(TypeExpr::name("int").to_string(), "int");
        assert_eq!(TypeExpr::IntLiteral(7).to_string(), "7");
        assert_eq!(TypeExpr::StrLiteral("on".into()).to_string(), "\"on\"");
    }

    #[test]
    fn test_render_nested() {
        let ty = TypeExpr::Array(Box::new(TypeExpr::Union(vec![
            TypeExpr::name("int"),
            TypeExpr::name("string"),
        ])));
        assert_eq!(ty.to_string(), "[int|string]");

        let obj = TypeExpr::Object(vec![
            ("name".into(), TypeExpr::name("string")),
            ("tags".into(), TypeExpr::Array(Box::new(TypeExpr::name("string")))),
        ]);
        assert_eq!(obj.to_string(), "{name:string,tags:[string]}");
    }

    #[test]
    fn test_render_function() {
        let ty = TypeExpr::Function {
            params: vec![TypeExpr::name("int"), TypeExpr::name("string")],
            ret: Box::new(TypeExpr::name("bool")),
        };
        assert_eq!(ty.to_string(), "(int,string)->bool");
    }

    #[test]
    fn test_complexity() {
        assert!(!TypeExpr::name("int").is_complex());
        assert!(!TypeExpr::name("P").is_complex());
        assert!(TypeExpr::any().is_complex());
        assert!(TypeExpr::Array(Box::new(TypeExpr::name("int"))).is_complex());
        assert!(TypeExpr::Union(vec![TypeExpr::name("int"), TypeExpr::name("string")]).is_complex());
        // An object type is only complex when a field type is
        assert!(!TypeExpr::Object(vec![("a".into(), TypeExpr::name("int"))]).is_complex());
        assert!(TypeExpr::Object(vec![(
            "a".into(),
            TypeExpr::Array(Box::new(TypeExpr::name("int")))
        )])
        .is_complex());
    }
}
