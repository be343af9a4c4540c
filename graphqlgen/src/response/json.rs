use std::convert::TryFrom;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::{GraphQLError, Value, ValueError};

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Int(v) => serializer.serialize_i32(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::String { value, .. } => serializer.serialize_str(value),
            Value::Enum(v) => serializer.serialize_str(v),
            // opaque scalars pass through the codec untouched
            Value::Scalar(inner) => inner.serialize(serializer),
            Value::List(items) => items.serialize(serializer),
            Value::Map(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// Encodes into a buffer pre-sized to `capacity` bytes; the writer grows it
/// as needed from there.
pub fn to_json_with_capacity(value: &Value, capacity: usize) -> String {
    let mut buf = Vec::with_capacity(capacity);
    let mut serializer = serde_json::Serializer::new(&mut buf);
    value
        .serialize(&mut serializer)
        .expect("writing json into a buffer cannot fail");
    String::from_utf8(buf).expect("serialized json is valid utf-8")
}

pub fn to_json(value: &Value) -> String {
    to_json_with_capacity(value, 128)
}

/// Human-readable encoding, for persisted artifacts.
pub fn to_json_pretty(value: &Value) -> String {
    let mut buf = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::pretty(&mut buf);
    value
        .serialize(&mut serializer)
        .expect("writing json into a buffer cannot fail");
    String::from_utf8(buf).expect("serialized json is valid utf-8")
}

/// Decodes a JSON document into a [`Value`].
///
/// Every decoded string is marked `from_json` so enum conversion downstream
/// stays possible. Integers outside the 32-bit signed range fail with
/// [`ValueError::Overflow`]; fractional and exponent forms decode as Float.
pub fn parse_json(input: &str) -> Result<Value, ValueError> {
    let json: serde_json::Value = serde_json::from_str(input)?;
    from_json_value(json)
}

fn from_json_value(json: serde_json::Value) -> Result<Value, ValueError> {
    Ok(match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(v) => Value::Bool(v),
        serde_json::Value::Number(n) => {
            if let Some(v) = n.as_i64() {
                Value::Int(i32::try_from(v).map_err(|_| ValueError::Overflow)?)
            } else if n.is_u64() {
                return Err(ValueError::Overflow);
            } else {
                match n.as_f64() {
                    Some(v) => Value::Float(v),
                    None => return Err(ValueError::Overflow),
                }
            }
        }
        serde_json::Value::String(v) => Value::string_from_json(v),
        serde_json::Value::Array(items) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                list.push(from_json_value(item)?);
            }
            Value::List(list)
        }
        serde_json::Value::Object(fields) => {
            let mut map = IndexMap::with_capacity(fields.len());
            for (key, value) in fields {
                map.insert(key, from_json_value(value)?);
            }
            Value::Map(map)
        }
    })
}

/// Builds the wire `errors` list: each entry carries `message` always, and
/// `locations` / `path` only when non-empty.
pub fn build_error_values(errors: &[GraphQLError]) -> Value {
    let mut list = Vec::with_capacity(errors.len());
    for error in errors {
        let mut entry = IndexMap::new();
        entry.insert("message".to_owned(), Value::string(error.message.clone()));
        if !error.locations.is_empty() {
            let mut locations = Vec::with_capacity(error.locations.len());
            for location in &error.locations {
                let mut loc = IndexMap::new();
                loc.insert("line".to_owned(), Value::Int(clamp_to_i32(location.line)));
                loc.insert(
                    "column".to_owned(),
                    Value::Int(clamp_to_i32(location.column)),
                );
                locations.push(Value::Map(loc));
            }
            entry.insert("locations".to_owned(), Value::List(locations));
        }
        if !error.path.is_empty() {
            let path = error
                .path
                .iter()
                .map(|segment| match segment {
                    super::PathSegment::Field(name) => Value::string(name.clone()),
                    super::PathSegment::Index(index) => Value::Int(clamp_to_i32(*index)),
                })
                .collect();
            entry.insert("path".to_owned(), Value::List(path));
        }
        list.push(Value::Map(entry));
    }
    Value::List(list)
}

fn clamp_to_i32(v: usize) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::super::{GraphQLError, Location, PathSegment, ValueError};
    use super::*;

    #[test]
    fn encodes_every_kind() {
        let mut map = Value::new(super::super::ValueKind::Map);
        map.insert("a", Value::Int(1)).unwrap();
        map.insert(
            "b",
            Value::List(vec![Value::string("x"), Value::Null]),
        )
        .unwrap();
        assert_eq!(to_json(&map), r#"{"a":1,"b":["x",null]}"#);

        assert_eq!(to_json(&Value::Bool(true)), "true");
        assert_eq!(to_json(&Value::Float(1.5)), "1.5");
        assert_eq!(to_json(&Value::enum_value("RED")), r#""RED""#);
        assert_eq!(
            to_json(&Value::Scalar(Box::new(Value::List(vec![Value::Int(1)])))),
            "[1]"
        );
    }

    #[test]
    fn round_trip_marks_strings_from_json(){
        let mut map = Value::new(super::super::ValueKind::Map);
        map.insert("a", Value::Int(1)).unwrap();
        map.insert(
            "b",
            Value::List(vec![Value::string("x"), Value::Null]),
        )
        .unwrap();
        let decoded = parse_json(&to_json(&map)).unwrap();

        // equal except the inner string became from_json
        let mut expected = Value::new(super::super::ValueKind::Map);
        expected.insert("a", Value::Int(1)).unwrap();
        expected
            .insert(
                "b",
                Value::List(vec![Value::string_from_json("x"), Value::Null]),
            )
            .unwrap();
        assert_eq!(decoded, expected);
        assert_ne!(decoded, map);
    }

    #[test]
    fn decoded_maps_preserve_key_order() {
        let decoded = parse_json(r#"{"z":1,"a":2,"m":3}"#).unwrap();
        let keys: Vec<_> = match &decoded {
            Value::Map(fields) => fields.keys().cloned().collect(),
            other => panic!("expected map, got {:?}", other),
        };
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn int_bounds() {
        assert_eq!(parse_json("2147483647").unwrap(), Value::Int(2147483647));
        assert_eq!(
            parse_json("-2147483648").unwrap(),
            Value::Int(-2147483648)
        );
        match parse_json("2147483648") {
            Err(ValueError::Overflow) => {}
            other => panic!("expected Overflow, got {:?}", other),
        }
        match parse_json("-2147483649") {
            Err(ValueError::Overflow) => {}
            other => panic!("expected Overflow, got {:?}", other),
        }
        match parse_json("18446744073709551615") {
            Err(ValueError::Overflow) => {}
            other => panic!("expected Overflow, got {:?}", other),
        }
        // fractional forms stay floats no matter the magnitude
        assert_eq!(
            parse_json("2147483648.0").unwrap(),
            Value::Float(2147483648.0)
        );
    }

    #[test]
    fn error_values_omit_empty_keys() {
        let bare = GraphQLError::new("boom");
        let mut located = GraphQLError::new("bad field");
        located.locations.push(Location { line: 3, column: 7 });
        located.path.push(PathSegment::Field("hero".to_owned()));
        located.path.push(PathSegment::Index(0));

        let list = build_error_values(&[bare, located]);
        assert_eq!(
            to_json(&list),
            r#"[{"message":"boom"},{"message":"bad field","locations":[{"line":3,"column":7}],"path":["hero",0]}]"#
        );
    }
}
