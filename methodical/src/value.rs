//! A dynamic value type for dispatching over loosely-typed data.

use std::fmt;

use indexmap::IndexMap;

use crate::dispatch::{PrimitiveKind, TypeTag};
use crate::hierarchy::Dispatchable;

/// Nominal type of every [`Value::List`].
pub const ARRAY_TYPE: &str = "Array";

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// An ordered list, nominally typed as `Array`.
    List(Vec<Value>),
    /// An instance of a named type.
    Object(Object),
}

/// An instance of a nominal type with named fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub class: TypeTag,
    pub fields: IndexMap<String, Value>,
}

impl Object {
    pub fn new(class: impl Into<TypeTag>) -> Self {
        Self {
            class: class.into(),
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }
}

impl Value {
    /// An instance of `class` with no fields.
    pub fn object(class: impl Into<TypeTag>) -> Self {
        Value::Object(Object::new(class))
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// A list of numbers.
    pub fn numbers(items: impl IntoIterator<Item = f64>) -> Self {
        Value::List(items.into_iter().map(Value::Number).collect())
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl Dispatchable for Value {
    fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Value::Null => Some(PrimitiveKind::Null),
            Value::Bool(_) => Some(PrimitiveKind::Boolean),
            Value::Number(_) => Some(PrimitiveKind::Number),
            Value::Text(_) => Some(PrimitiveKind::String),
            Value::List(_) | Value::Object(_) => None,
        }
    }

    fn nominal_tag(&self) -> Option<TypeTag> {
        match self {
            Value::List(_) => Some(TypeTag::new(ARRAY_TYPE)),
            Value::Object(object) => Some(object.class.clone()),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Object(object) => {
                write!(f, "{} {{", object.class)?;
                for (i, (name, value)) in object.fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {}: {}", name, value)?;
                }
                if !object.fields.is_empty() {
                    f.write_str(" ")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_are_nominal_arrays() {
        let list = Value::numbers([1.0, 2.0]);
        assert_eq!(list.nominal_tag(), Some(TypeTag::new(ARRAY_TYPE)));
        assert_eq!(list.primitive_kind(), None);
    }

    #[test]
    fn test_primitives_have_no_nominal_tag() {
        for value in [Value::Null, Value::Bool(true), Value::Number(1.0), Value::text("x")] {
            assert!(value.nominal_tag().is_none(), "{:?}", value);
            assert!(value.primitive_kind().is_some(), "{:?}", value);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::numbers([1.0, 2.5]).to_string(), "[1, 2.5]");
        let rhino = Value::Object(Object::new("Rhino").with_field("horns", Value::Number(1.0)));
        assert_eq!(rhino.to_string(), "Rhino { horns: 1 }");
        assert_eq!(Value::object("Platypus").to_string(), "Platypus {}");
    }
}
