use std::fmt;

use indexmap::map::Entry;
use indexmap::IndexMap;

use super::ValueError;
use crate::common::write_quoted;

/// The kind of payload a [`Value`] currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    String,
    Enum,
    Scalar,
    List,
    Map,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "Null",
            ValueKind::Bool => "Bool",
            ValueKind::Int => "Int",
            ValueKind::Float => "Float",
            ValueKind::String => "String",
            ValueKind::Enum => "Enum",
            ValueKind::Scalar => "Scalar",
            ValueKind::List => "List",
            ValueKind::Map => "Map",
        };
        write!(f, "{}", name)
    }
}

/// A discriminated response value.
///
/// Maps iterate in insertion order and look keys up in O(1); both properties
/// come from the backing `IndexMap`. A `String` carries a `from_json` flag:
/// a JSON string is ambiguous between a GraphQL String and an Enum name, and
/// only the resolver knows which one it is. `Scalar` wraps a nested value
/// that passes through the codec untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i32),
    Float(f64),
    String { value: String, from_json: bool },
    Enum(String),
    Scalar(Box<Value>),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Default for Value {
    fn default() -> Value {
        Value::Null
    }
}

impl Value {
    /// An empty value of the given kind.
    pub fn new(kind: ValueKind) -> Value {
        match kind {
            ValueKind::Null => Value::Null,
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Int => Value::Int(0),
            ValueKind::Float => Value::Float(0.0),
            ValueKind::String => Value::String {
                value: String::new(),
                from_json: false,
            },
            ValueKind::Enum => Value::Enum(String::new()),
            ValueKind::Scalar => Value::Scalar(Box::new(Value::Null)),
            ValueKind::List => Value::List(Vec::new()),
            ValueKind::Map => Value::Map(IndexMap::new()),
        }
    }

    pub fn string(value: impl Into<String>) -> Value {
        Value::String {
            value: value.into(),
            from_json: false,
        }
    }

    pub(crate) fn string_from_json(value: impl Into<String>) -> Value {
        Value::String {
            value: value.into(),
            from_json: true,
        }
    }

    pub fn enum_value(value: impl Into<String>) -> Value {
        Value::Enum(value.into())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String { .. } => ValueKind::String,
            Value::Enum(_) => ValueKind::Enum,
            Value::Scalar(_) => ValueKind::Scalar,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
        }
    }

    fn invalid_kind(&self, expected: ValueKind) -> ValueError {
        ValueError::InvalidKind {
            expected,
            got: self.kind(),
        }
    }

    /// Number of entries of a List or Map.
    pub fn len(&self) -> Result<usize, ValueError> {
        match self {
            Value::List(items) => Ok(items.len()),
            Value::Map(fields) => Ok(fields.len()),
            other => Err(other.invalid_kind(ValueKind::List)),
        }
    }

    pub fn is_empty(&self) -> Result<bool, ValueError> {
        Ok(self.len()? == 0)
    }

    /// Pre-sizes a List or Map.
    pub fn reserve(&mut self, additional: usize) -> Result<(), ValueError> {
        match self {
            Value::List(items) => {
                items.reserve(additional);
                Ok(())
            }
            Value::Map(fields) => {
                fields.reserve(additional);
                Ok(())
            }
            other => Err(other.invalid_kind(ValueKind::List)),
        }
    }

    /// Appends a map entry, preserving insertion order. Duplicate keys fail.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Result<(), ValueError> {
        let fields = match self {
            Value::Map(fields) => fields,
            other => return Err(other.invalid_kind(ValueKind::Map)),
        };
        match fields.entry(key.into()) {
            Entry::Occupied(slot) => Err(ValueError::DuplicateKey {
                key: slot.key().clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    /// Appends a list element.
    pub fn push(&mut self, value: Value) -> Result<(), ValueError> {
        match self {
            Value::List(items) => {
                items.push(value);
                Ok(())
            }
            other => Err(other.invalid_kind(ValueKind::List)),
        }
    }

    /// Looks a map key up without disturbing iteration order.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(fields) => fields.get(key),
            _ => None,
        }
    }

    /// Indexes into a List, or into a Map in insertion order.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Value::List(items) => items.get(index),
            Value::Map(fields) => fields.get_index(index).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self {
            Value::Bool(v) => Ok(*v),
            other => Err(other.invalid_kind(ValueKind::Bool)),
        }
    }

    pub fn as_int(&self) -> Result<i32, ValueError> {
        match self {
            Value::Int(v) => Ok(*v),
            other => Err(other.invalid_kind(ValueKind::Int)),
        }
    }

    /// Reads a Float; an Int coerces.
    pub fn as_float(&self) -> Result<f64, ValueError> {
        match self {
            Value::Float(v) => Ok(*v),
            Value::Int(v) => Ok(f64::from(*v)),
            other => Err(other.invalid_kind(ValueKind::Float)),
        }
    }

    pub fn as_str(&self) -> Result<&str, ValueError> {
        match self {
            Value::String { value, .. } => Ok(value),
            other => Err(other.invalid_kind(ValueKind::String)),
        }
    }

    pub fn as_enum(&self) -> Result<&str, ValueError> {
        match self {
            Value::Enum(value) => Ok(value),
            other => Err(other.invalid_kind(ValueKind::Enum)),
        }
    }

    pub fn set_bool(&mut self, value: bool) -> Result<(), ValueError> {
        match self {
            Value::Bool(slot) => {
                *slot = value;
                Ok(())
            }
            other => Err(other.invalid_kind(ValueKind::Bool)),
        }
    }

    /// Writes an Int; a Float slot accepts it by coercion.
    pub fn set_int(&mut self, value: i32) -> Result<(), ValueError> {
        match self {
            Value::Int(slot) => {
                *slot = value;
                Ok(())
            }
            Value::Float(slot) => {
                *slot = f64::from(value);
                Ok(())
            }
            other => Err(other.invalid_kind(ValueKind::Int)),
        }
    }

    pub fn set_float(&mut self, value: f64) -> Result<(), ValueError> {
        match self {
            Value::Float(slot) => {
                *slot = value;
                Ok(())
            }
            other => Err(other.invalid_kind(ValueKind::Float)),
        }
    }

    pub fn set_string(&mut self, value: impl Into<String>) -> Result<(), ValueError> {
        match self {
            Value::String { value: slot, .. } => {
                *slot = value.into();
                Ok(())
            }
            other => Err(other.invalid_kind(ValueKind::String)),
        }
    }

    pub fn set_enum(&mut self, value: impl Into<String>) -> Result<(), ValueError> {
        match self {
            Value::Enum(slot) => {
                *slot = value.into();
                Ok(())
            }
            other => Err(other.invalid_kind(ValueKind::Enum)),
        }
    }

    /// Marks a String as decoded from JSON, making it a candidate enum name.
    pub fn mark_from_json(&mut self) -> Result<(), ValueError> {
        match self {
            Value::String { from_json, .. } => {
                *from_json = true;
                Ok(())
            }
            other => Err(other.invalid_kind(ValueKind::String)),
        }
    }

    pub fn is_from_json(&self) -> bool {
        matches!(self, Value::String { from_json: true, .. })
    }

    /// True for an Enum, or for a String that came out of the JSON decoder
    /// and may therefore name an enum value.
    pub fn maybe_enum(&self) -> bool {
        matches!(
            self,
            Value::Enum(_) | Value::String { from_json: true, .. }
        )
    }

    /// Moves the value out, leaving Null behind.
    pub fn take(&mut self) -> Value {
        std::mem::take(self)
    }

    /// Extracts the string payload, leaving Null behind.
    pub fn release_string(&mut self) -> Result<String, ValueError> {
        match self {
            Value::String { .. } => match self.take() {
                Value::String { value, .. } => Ok(value),
                _ => unreachable!(),
            },
            other => Err(other.invalid_kind(ValueKind::String)),
        }
    }

    /// Extracts the list payload, leaving Null behind.
    pub fn release_list(&mut self) -> Result<Vec<Value>, ValueError> {
        match self {
            Value::List(_) => match self.take() {
                Value::List(items) => Ok(items),
                _ => unreachable!(),
            },
            other => Err(other.invalid_kind(ValueKind::List)),
        }
    }

    /// Extracts the map payload, leaving Null behind.
    pub fn release_map(&mut self) -> Result<IndexMap<String, Value>, ValueError> {
        match self {
            Value::Map(_) => match self.take() {
                Value::Map(fields) => Ok(fields),
                _ => unreachable!(),
            },
            other => Err(other.invalid_kind(ValueKind::Map)),
        }
    }

    /// Unwraps an opaque scalar, leaving Null behind.
    pub fn release_scalar(&mut self) -> Result<Value, ValueError> {
        match self {
            Value::Scalar(_) => match self.take() {
                Value::Scalar(inner) => Ok(*inner),
                _ => unreachable!(),
            },
            other => Err(other.invalid_kind(ValueKind::Scalar)),
        }
    }
}

/// GraphQL literal rendering: strings quoted, enum names bare. Used for
/// introspection `defaultValue` strings.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(true) => write!(f, "true"),
            Value::Bool(false) => write!(f, "false"),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::String { value, .. } => write_quoted(value, f),
            Value::Enum(v) => write!(f, "{}", v),
            Value::Scalar(inner) => write!(f, "{}", inner),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(fields) => {
                write!(f, "{{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Value, ValueError, ValueKind};

    #[test]
    fn map_keeps_insertion_order() {
        let mut map = Value::new(ValueKind::Map);
        map.insert("zebra", Value::Int(1)).unwrap();
        map.insert("aardvark", Value::Int(2)).unwrap();
        map.insert("mongoose", Value::Int(3)).unwrap();
        let keys: Vec<_> = match &map {
            Value::Map(fields) => fields.keys().cloned().collect(),
            _ => unreachable!(),
        };
        assert_eq!(keys, vec!["zebra", "aardvark", "mongoose"]);
        assert_eq!(map.get("aardvark"), Some(&Value::Int(2)));
        assert_eq!(map.get_index(1), Some(&Value::Int(2)));
    }

    #[test]
    fn duplicate_keys_fail() {
        let mut map = Value::new(ValueKind::Map);
        map.insert("a", Value::Null).unwrap();
        match map.insert("a", Value::Int(1)) {
            Err(ValueError::DuplicateKey { key }) => assert_eq!(key, "a"),
            other => panic!("expected DuplicateKey, got {:?}", other),
        }
        // the original entry survives
        assert_eq!(map.get("a"), Some(&Value::Null));
    }

    #[test]
    fn int_float_coercion() {
        let mut float = Value::new(ValueKind::Float);
        float.set_int(3).unwrap();
        assert_eq!(float.as_float().unwrap(), 3.0);

        let int = Value::Int(7);
        assert_eq!(int.as_float().unwrap(), 7.0);

        let mut float = Value::new(ValueKind::Float);
        float.set_float(1.5).unwrap();
        match float.as_int() {
            Err(ValueError::InvalidKind { expected, got }) => {
                assert_eq!(expected, ValueKind::Int);
                assert_eq!(got, ValueKind::Float);
            }
            other => panic!("expected InvalidKind, got {:?}", other),
        }
    }

    #[test]
    fn kind_checked_accessors() {
        let mut list = Value::new(ValueKind::List);
        list.push(Value::Bool(true)).unwrap();
        assert!(list.insert("k", Value::Null).is_err());
        assert!(list.as_int().is_err());
        assert!(Value::Null.len().is_err());
        assert!(Value::Null.reserve(4).is_err());
        let mut map = Value::new(ValueKind::Map);
        assert!(map.push(Value::Null).is_err());
        assert!(map.reserve(4).is_ok());
    }

    #[test]
    fn maybe_enum_recognition() {
        assert!(Value::enum_value("RED").maybe_enum());
        assert!(Value::string_from_json("RED").maybe_enum());
        assert!(!Value::string("RED").maybe_enum());
        let mut s = Value::string("RED");
        s.mark_from_json().unwrap();
        assert!(s.maybe_enum());
        assert!(Value::Int(1).mark_from_json().is_err());
    }

    #[test]
    fn take_leaves_null() {
        let mut value = Value::string("hello");
        let taken = value.take();
        assert_eq!(taken, Value::string("hello"));
        assert_eq!(value.kind(), ValueKind::Null);

        let mut list = Value::List(vec![Value::Int(1)]);
        assert_eq!(list.release_list().unwrap(), vec![Value::Int(1)]);
        assert_eq!(list.kind(), ValueKind::Null);
    }

    #[test]
    fn equality_tracks_from_json_flag() {
        assert_ne!(Value::string("x"), Value::string_from_json("x"));
        assert_eq!(Value::string_from_json("x"), Value::string_from_json("x"));
        assert_ne!(Value::string("RED"), Value::enum_value("RED"));
    }

    #[test]
    fn display_renders_graphql_literals() {
        let mut map = Value::new(ValueKind::Map);
        map.insert("a", Value::Int(1)).unwrap();
        map.insert("b", Value::string("x\ny")).unwrap();
        map.insert("c", Value::enum_value("RED")).unwrap();
        assert_eq!(map.to_string(), "{a: 1, b: \"x\\ny\", c: RED}");
    }
}
