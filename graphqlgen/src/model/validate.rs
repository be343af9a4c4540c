//! Cross-reference validation, run once after the build pass.

use crate::model::{
    InputObjectDef, Modifier, Schema, SchemaError, TypeKind, TypeRef,
};
use crate::position::Pos;
use crate::response::Value;

/// Checks every name reference, interface contract, kind discipline rule,
/// default value, and input-object cycle. Also marks object fields that
/// implement an interface field.
pub fn validate(schema: &mut Schema) -> Result<(), SchemaError> {
    check_output_fields(schema)?;
    check_input_objects(schema)?;
    check_directive_arguments(schema)?;
    check_unions(schema)?;
    check_interfaces(schema)?;
    check_defaults(schema)?;
    check_input_cycles(schema)?;
    check_roots(schema)?;
    Ok(())
}

fn resolve(schema: &Schema, name: &str, pos: Pos) -> Result<TypeKind, SchemaError> {
    schema
        .type_kind(name)
        .ok_or_else(|| SchemaError::UnknownType {
            name: name.to_owned(),
            pos,
        })
}

fn check_output_ref(schema: &Schema, type_ref: &TypeRef, pos: Pos) -> Result<(), SchemaError> {
    let kind = resolve(schema, &type_ref.name, pos)?;
    if !kind.is_output() {
        return Err(SchemaError::KindMismatch {
            name: type_ref.name.clone(),
            pos,
            expected: "an output type",
            got: kind.as_str(),
        });
    }
    Ok(())
}

fn check_input_ref(schema: &Schema, type_ref: &TypeRef, pos: Pos) -> Result<(), SchemaError> {
    let kind = resolve(schema, &type_ref.name, pos)?;
    if !kind.is_input() {
        return Err(SchemaError::KindMismatch {
            name: type_ref.name.clone(),
            pos,
            expected: "an input type",
            got: kind.as_str(),
        });
    }
    Ok(())
}

fn check_output_fields(schema: &Schema) -> Result<(), SchemaError> {
    let object_fields = schema.objects.iter().flat_map(|def| def.fields.iter());
    let interface_fields = schema.interfaces.iter().flat_map(|def| def.fields.iter());
    for field in object_fields.chain(interface_fields) {
        check_output_ref(schema, &field.field_type, field.position)?;
        for argument in &field.arguments {
            check_input_ref(schema, &argument.field_type, argument.position)?;
        }
    }
    Ok(())
}

fn check_input_objects(schema: &Schema) -> Result<(), SchemaError> {
    for def in &schema.inputs {
        for field in &def.fields {
            check_input_ref(schema, &field.field_type, field.position)?;
        }
    }
    Ok(())
}

fn check_directive_arguments(schema: &Schema) -> Result<(), SchemaError> {
    for def in &schema.directives {
        for argument in &def.arguments {
            check_input_ref(schema, &argument.field_type, argument.position)?;
        }
    }
    Ok(())
}

fn check_unions(schema: &Schema) -> Result<(), SchemaError> {
    for def in &schema.unions {
        for member in &def.members {
            let kind = resolve(schema, member, def.position)?;
            if kind != TypeKind::Object {
                return Err(SchemaError::KindMismatch {
                    name: member.clone(),
                    pos: def.position,
                    expected: "an object type",
                    got: kind.as_str(),
                });
            }
        }
    }
    Ok(())
}

/// Every object must carry every field of every interface it implements,
/// with a type that satisfies the interface's (equal, or narrowed from
/// nullable to non-null). Matching fields are marked `interface_field`.
fn check_interfaces(schema: &mut Schema) -> Result<(), SchemaError> {
    for index in 0..schema.objects.len() {
        let object_name = schema.objects[index].name.clone();
        let object_pos = schema.objects[index].position;
        let interfaces = schema.objects[index].interfaces.clone();
        for interface_name in interfaces {
            let kind = resolve(schema, &interface_name, object_pos)?;
            if kind != TypeKind::Interface {
                return Err(SchemaError::KindMismatch {
                    name: interface_name,
                    pos: object_pos,
                    expected: "an interface",
                    got: kind.as_str(),
                });
            }
            let requirements: Vec<(String, TypeRef)> = match schema.interface(&interface_name) {
                Some(def) => def
                    .fields
                    .iter()
                    .map(|field| (field.name.clone(), field.field_type.clone()))
                    .collect(),
                None => continue,
            };
            for (field_name, required) in requirements {
                let object = &mut schema.objects[index];
                let field = match object.fields.iter_mut().find(|f| f.name == field_name) {
                    Some(field) => field,
                    None => {
                        return Err(SchemaError::InterfaceMismatch {
                            object: object_name.clone(),
                            interface: interface_name.clone(),
                            field: field_name,
                            reason: "is missing".to_owned(),
                        });
                    }
                };
                if !field.field_type.satisfies(&required) {
                    return Err(SchemaError::InterfaceMismatch {
                        object: object_name.clone(),
                        interface: interface_name.clone(),
                        field: field_name,
                        reason: format!(
                            "has type `{}`, the interface requires `{}`",
                            field.field_type, required
                        ),
                    });
                }
                field.interface_field = true;
            }
        }
    }
    Ok(())
}

fn check_defaults(schema: &Schema) -> Result<(), SchemaError> {
    for def in &schema.inputs {
        for field in &def.fields {
            if let Some(default) = &field.default {
                check_default(
                    schema,
                    &format!("{}.{}", def.name, field.name),
                    field.position,
                    &field.field_type,
                    default,
                )?;
            }
        }
    }
    for def in &schema.directives {
        for argument in &def.arguments {
            if let Some(default) = &argument.default {
                check_default(
                    schema,
                    &format!("@{}.{}", def.name, argument.name),
                    argument.position,
                    &argument.field_type,
                    default,
                )?;
            }
        }
    }
    let object_fields = schema.objects.iter().flat_map(|def| {
        def.fields
            .iter()
            .map(move |field| (def.name.as_str(), field))
    });
    let interface_fields = schema.interfaces.iter().flat_map(|def| {
        def.fields
            .iter()
            .map(move |field| (def.name.as_str(), field))
    });
    for (type_name, field) in object_fields.chain(interface_fields) {
        for argument in &field.arguments {
            if let Some(default) = &argument.default {
                check_default(
                    schema,
                    &format!("{}.{}.{}", type_name, field.name, argument.name),
                    argument.position,
                    &argument.field_type,
                    default,
                )?;
            }
        }
    }
    Ok(())
}

fn check_default(
    schema: &Schema,
    name: &str,
    pos: Pos,
    type_ref: &TypeRef,
    value: &Value,
) -> Result<(), SchemaError> {
    check_value(schema, &type_ref.name, &type_ref.modifiers, value).map_err(|reason| {
        SchemaError::InvalidDefault {
            name: name.to_owned(),
            pos,
            reason,
        }
    })
}

fn check_value(
    schema: &Schema,
    base: &str,
    modifiers: &[Modifier],
    value: &Value,
) -> Result<(), String> {
    let (nullable, rest) = match modifiers.first() {
        Some(Modifier::Nullable) => (true, &modifiers[1..]),
        _ => (false, modifiers),
    };
    if let Value::Null = value {
        return if nullable {
            Ok(())
        } else {
            Err("null is not allowed for a non-null type".to_owned())
        };
    }
    match rest.first() {
        Some(Modifier::List) => match value {
            Value::List(items) => {
                for item in items {
                    check_value(schema, base, &rest[1..], item)?;
                }
                Ok(())
            }
            // a single value coerces to a one-element list
            single => check_value(schema, base, &rest[1..], single),
        },
        _ => check_base_value(schema, base, value),
    }
}

fn check_base_value(schema: &Schema, base: &str, value: &Value) -> Result<(), String> {
    match schema.type_kind(base) {
        Some(TypeKind::Scalar) => match base {
            "Int" => match value {
                Value::Int(_) => Ok(()),
                other => Err(format!("{} is not an Int", other)),
            },
            "Float" => match value {
                Value::Int(_) | Value::Float(_) => Ok(()),
                other => Err(format!("{} is not a Float", other)),
            },
            "String" => match value {
                Value::String { .. } => Ok(()),
                other => Err(format!("{} is not a String", other)),
            },
            "Boolean" => match value {
                Value::Bool(_) => Ok(()),
                other => Err(format!("{} is not a Boolean", other)),
            },
            "ID" => match value {
                Value::String { .. } | Value::Int(_) => Ok(()),
                other => Err(format!("{} is not an ID", other)),
            },
            // custom scalars are opaque, any literal passes
            _ => Ok(()),
        },
        Some(TypeKind::Enum) => match value {
            Value::Enum(name) => {
                let known = schema
                    .enum_def(base)
                    .map(|def| def.values.iter().any(|v| v.name == *name))
                    .unwrap_or(false);
                if known {
                    Ok(())
                } else {
                    Err(format!("`{}` is not a value of enum `{}`", name, base))
                }
            }
            Value::String { .. } => Err(format!(
                "string literal used where a `{}` enum value is required",
                base
            )),
            other => Err(format!("{} is not a value of enum `{}`", other, base)),
        },
        Some(TypeKind::InputObject) => match value {
            Value::Map(fields) => {
                let def = match schema.input_object(base) {
                    Some(def) => def,
                    None => return Err(format!("`{}` is not an input object", base)),
                };
                for (key, item) in fields {
                    let field = match def.fields.iter().find(|f| f.name == *key) {
                        Some(field) => field,
                        None => {
                            return Err(format!("input object `{}` has no field `{}`", base, key))
                        }
                    };
                    check_value(
                        schema,
                        &field.field_type.name,
                        &field.field_type.modifiers,
                        item,
                    )?;
                }
                for field in &def.fields {
                    let required =
                        !field.field_type.is_nullable() && field.default.is_none();
                    if required && fields.get(&field.name).is_none() {
                        return Err(format!(
                            "missing required field `{}` of input object `{}`",
                            field.name, base
                        ));
                    }
                }
                Ok(())
            }
            other => Err(format!("{} is not an input object literal", other)),
        },
        _ => Err(format!("`{}` is not an input type", base)),
    }
}

/// Input objects may not reach themselves through a chain of fields that are
/// all non-nullable and non-list, since such a value could never be finite.
fn check_input_cycles(schema: &Schema) -> Result<(), SchemaError> {
    fn reaches(
        schema: &Schema,
        from: &InputObjectDef,
        target: &str,
        seen: &mut Vec<String>,
    ) -> bool {
        for field in &from.fields {
            // canonical stack: a non-null named type has no modifiers at all
            if !field.field_type.modifiers.is_empty() {
                continue;
            }
            let next = &field.field_type.name;
            if next == target {
                return true;
            }
            if schema.type_kind(next) == Some(TypeKind::InputObject)
                && !seen.iter().any(|s| s == next)
            {
                seen.push(next.clone());
                if let Some(def) = schema.input_object(next) {
                    if reaches(schema, def, target, seen) {
                        return true;
                    }
                }
            }
        }
        false
    }

    for def in &schema.inputs {
        if reaches(schema, def, &def.name, &mut Vec::new()) {
            return Err(SchemaError::CircularInput {
                name: def.name.clone(),
                pos: def.position,
            });
        }
    }
    Ok(())
}

fn check_roots(schema: &Schema) -> Result<(), SchemaError> {
    let roots = [
        schema.roots.query.as_deref(),
        schema.roots.mutation.as_deref(),
        schema.roots.subscription.as_deref(),
    ];
    for name in roots.iter().flatten() {
        let pos = schema.position_of(name).unwrap_or_default();
        let kind = resolve(schema, name, pos)?;
        if kind != TypeKind::Object {
            return Err(SchemaError::KindMismatch {
                name: (*name).to_owned(),
                pos,
                expected: "an object type",
                got: kind.as_str(),
            });
        }
    }
    if schema.roots.query.is_none() {
        return Err(SchemaError::MissingQueryRoot);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::model::{build, Schema, SchemaError};
    use crate::schema::parse_schema;

    fn compiled(sdl: &str) -> Result<Schema, SchemaError> {
        let mut schema = build(&parse_schema(sdl).unwrap())?;
        validate(&mut schema)?;
        Ok(schema)
    }

    fn err(sdl: &str) -> SchemaError {
        compiled(sdl).unwrap_err()
    }

    #[test]
    fn interface_satisfaction() {
        let schema = compiled(
            "interface N { id: ID! }\n\
             type T implements N { id: ID! name: String }\n\
             type Query { t: T }",
        )
        .unwrap();
        let t = schema.object("T").unwrap();
        assert_eq!(t.interfaces, vec!["N"]);
        assert!(t.fields[0].interface_field);
        assert!(!t.fields[1].interface_field);
    }

    #[test]
    fn interface_field_type_mismatch() {
        match err(
            "interface N { id: ID! }\n\
             type T implements N { id: String! }\n\
             type Query { t: T }",
        ) {
            SchemaError::InterfaceMismatch {
                object,
                interface,
                field,
                ..
            } => {
                assert_eq!(object, "T");
                assert_eq!(interface, "N");
                assert_eq!(field, "id");
            }
            other => panic!("expected InterfaceMismatch, got {:?}", other),
        }
    }

    #[test]
    fn interface_field_missing() {
        match err(
            "interface N { id: ID! }\n\
             type T implements N { name: String }\n\
             type Query { t: T }",
        ) {
            SchemaError::InterfaceMismatch { field, reason, .. } => {
                assert_eq!(field, "id");
                assert!(reason.contains("missing"));
            }
            other => panic!("expected InterfaceMismatch, got {:?}", other),
        }
    }

    #[test]
    fn non_null_widening() {
        // object may narrow a nullable interface field to non-null
        assert!(compiled(
            "interface N { id: ID }\n\
             type T implements N { id: ID! }\n\
             type Query { t: T }",
        )
        .is_ok());
        // but never the reverse
        match err(
            "interface N { id: ID! }\n\
             type T implements N { id: ID }\n\
             type Query { t: T }",
        ) {
            SchemaError::InterfaceMismatch { .. } => {}
            other => panic!("expected InterfaceMismatch, got {:?}", other),
        }
    }

    #[test]
    fn unknown_types_are_reported() {
        match err("type Query { x: Missing }") {
            SchemaError::UnknownType { name, pos } => {
                assert_eq!(name, "Missing");
                assert_eq!(pos.line, 1);
            }
            other => panic!("expected UnknownType, got {:?}", other),
        }
        match err("type Query { x(a: Missing): Int }") {
            SchemaError::UnknownType { name, .. } => assert_eq!(name, "Missing"),
            other => panic!("expected UnknownType, got {:?}", other),
        }
        match err("type Query { a: Int }\nunion U = Query | Missing") {
            SchemaError::UnknownType { name, .. } => assert_eq!(name, "Missing"),
            other => panic!("expected UnknownType, got {:?}", other),
        }
        match err("schema { query: Missing }") {
            SchemaError::UnknownType { name, .. } => assert_eq!(name, "Missing"),
            other => panic!("expected UnknownType, got {:?}", other),
        }
    }

    #[test]
    fn kind_discipline() {
        // input fields may not reference output kinds
        match err("type Query { a: Int }\ninput I { q: Query }") {
            SchemaError::KindMismatch { name, .. } => assert_eq!(name, "Query"),
            other => panic!("expected KindMismatch, got {:?}", other),
        }
        // arguments are input positions too
        match err("type Query { a(v: Query): Int }") {
            SchemaError::KindMismatch { name, .. } => assert_eq!(name, "Query"),
            other => panic!("expected KindMismatch, got {:?}", other),
        }
        // output fields may not reference input objects
        match err("input I { n: Int }\ntype Query { i: I }") {
            SchemaError::KindMismatch { name, .. } => assert_eq!(name, "I"),
            other => panic!("expected KindMismatch, got {:?}", other),
        }
        // union members must be objects
        match err("interface N { id: ID }\ntype Query { a: Int }\nunion U = N") {
            SchemaError::KindMismatch { name, .. } => assert_eq!(name, "N"),
            other => panic!("expected KindMismatch, got {:?}", other),
        }
        // roots must be objects
        match err("enum E { A }\nschema { query: E }") {
            SchemaError::KindMismatch { name, .. } => assert_eq!(name, "E"),
            other => panic!("expected KindMismatch, got {:?}", other),
        }
        // scalars and enums are fine in both positions
        assert!(compiled("enum E { A }\ntype Query { e: E }\ninput I { e: E }").is_ok());
    }

    #[test]
    fn default_values_must_match_types() {
        assert!(compiled("type Query { a: Int }\ninput I { n: Int = 3 }").is_ok());
        assert!(compiled("type Query { a: Int }\ninput I { f: Float = 3 }").is_ok());
        assert!(compiled("type Query { a: Int }\ninput I { xs: [Int] = [1, null] }").is_ok());
        assert!(compiled("type Query { a: Int }\ninput I { xs: [Int] = 1 }").is_ok());

        match err("type Query { a: Int }\ninput I { n: Int = \"three\" }") {
            SchemaError::InvalidDefault { name, .. } => assert_eq!(name, "I.n"),
            other => panic!("expected InvalidDefault, got {:?}", other),
        }
        match err("type Query { a: Int }\ninput I { n: Int! = null }") {
            SchemaError::InvalidDefault { reason, .. } => assert!(reason.contains("null")),
            other => panic!("expected InvalidDefault, got {:?}", other),
        }
        match err("type Query { a: Int }\ninput I { xs: [Int!] = [1, null] }") {
            SchemaError::InvalidDefault { .. } => {}
            other => panic!("expected InvalidDefault, got {:?}", other),
        }
        match err("enum E { A }\ntype Query { a: Int }\ninput I { e: E = B }") {
            SchemaError::InvalidDefault { reason, .. } => {
                assert!(reason.contains("not a value of enum"))
            }
            other => panic!("expected InvalidDefault, got {:?}", other),
        }
        match err("enum E { A }\ntype Query { a: Int }\ninput I { e: E = \"A\" }") {
            SchemaError::InvalidDefault { reason, .. } => assert!(reason.contains("string")),
            other => panic!("expected InvalidDefault, got {:?}", other),
        }
    }

    #[test]
    fn input_object_defaults() {
        assert!(compiled(
            "type Query { a: Int }\n\
             input Inner { n: Int! s: String }\n\
             input Outer { i: Inner = {n: 1} }",
        )
        .is_ok());
        match err(
            "type Query { a: Int }\n\
             input Inner { n: Int! }\n\
             input Outer { i: Inner = {} }",
        ) {
            SchemaError::InvalidDefault { reason, .. } => assert!(reason.contains("missing")),
            other => panic!("expected InvalidDefault, got {:?}", other),
        }
        match err(
            "type Query { a: Int }\n\
             input Inner { n: Int! }\n\
             input Outer { i: Inner = {bogus: 1} }",
        ) {
            SchemaError::InvalidDefault { reason, .. } => assert!(reason.contains("no field")),
            other => panic!("expected InvalidDefault, got {:?}", other),
        }
    }

    #[test]
    fn input_cycles() {
        match err("type Query { a: Int }\ninput I { next: I! }") {
            SchemaError::CircularInput { name, .. } => assert_eq!(name, "I"),
            other => panic!("expected CircularInput, got {:?}", other),
        }
        match err(
            "type Query { a: Int }\n\
             input A { b: B! }\n\
             input B { a: A! }",
        ) {
            SchemaError::CircularInput { .. } => {}
            other => panic!("expected CircularInput, got {:?}", other),
        }
        // a nullable or list edge breaks the cycle
        assert!(compiled("type Query { a: Int }\ninput I { next: I }").is_ok());
        assert!(compiled("type Query { a: Int }\ninput I { next: [I!]! }").is_ok());
    }

    #[test]
    fn query_root_is_required() {
        match err("type NotQuery { a: Int }") {
            SchemaError::MissingQueryRoot => {}
            other => panic!("expected MissingQueryRoot, got {:?}", other),
        }
        assert!(compiled("type Query { a: Int }").is_ok());
        assert!(compiled("schema { query: Q }\ntype Q { a: Int }").is_ok());
    }
}
