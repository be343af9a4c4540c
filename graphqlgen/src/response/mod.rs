//! Typed response values and the JSON codec.
//!
//! `Value` is the lingua franca between the query pipeline, resolvers, and
//! the wire: a strictly discriminated tree that keeps GraphQL distinctions
//! JSON cannot express (enum names vs. strings, opaque scalars, 32-bit
//! integer discipline).

mod error;
mod json;
mod value;

pub use self::error::ValueError;
pub use self::json::{build_error_values, parse_json, to_json, to_json_pretty, to_json_with_capacity};
pub use self::value::{Value, ValueKind};

use indexmap::IndexMap;

/// A position inside the query document an error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

/// One step of the response path an error is attributed to: a field name or
/// a list index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphQLError {
    pub message: String,
    pub locations: Vec<Location>,
    pub path: Vec<PathSegment>,
}

impl GraphQLError {
    pub fn new(message: impl Into<String>) -> GraphQLError {
        GraphQLError {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
        }
    }
}

/// The `{data, errors}` pair a finished execution produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub data: Value,
    pub errors: Vec<GraphQLError>,
}

impl Response {
    pub fn new(data: Value) -> Response {
        Response {
            data,
            errors: Vec::new(),
        }
    }

    /// Flattens into the wire map: `data` always, `errors` only when any
    /// were collected.
    pub fn into_value(self) -> Value {
        let mut map = IndexMap::new();
        map.insert("data".to_owned(), self.data);
        if !self.errors.is_empty() {
            map.insert("errors".to_owned(), build_error_values(&self.errors));
        }
        Value::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_without_errors_has_no_errors_key() {
        let response = Response::new(Value::Null);
        let value = response.into_value();
        assert_eq!(value.len().unwrap(), 1);
        assert_eq!(value.get("data"), Some(&Value::Null));
        assert_eq!(value.get("errors"), None);
    }

    #[test]
    fn response_with_errors_keeps_order() {
        let mut response = Response::new(Value::Null);
        response.errors.push(GraphQLError::new("boom"));
        let value = response.into_value();
        let keys: Vec<_> = match &value {
            Value::Map(map) => map.keys().cloned().collect(),
            other => panic!("expected map, got {:?}", other),
        };
        assert_eq!(keys, vec!["data", "errors"]);
    }
}
