//! The runtime introspection table: response values mirroring the model,
//! shaped the way `__schema` / `__type` answers are.

use indexmap::IndexMap;

use crate::model::{
    DirectiveDef, EnumDef, InputField, InputObjectDef, InterfaceDef, Modifier, ObjectDef,
    OutputField, ScalarDef, Schema, TypeKind, TypeRef, UnionDef,
};
use crate::response::Value;

fn kind_name(kind: TypeKind) -> &'static str {
    match kind {
        TypeKind::Scalar => "SCALAR",
        TypeKind::Object => "OBJECT",
        TypeKind::Interface => "INTERFACE",
        TypeKind::Union => "UNION",
        TypeKind::Enum => "ENUM",
        TypeKind::InputObject => "INPUT_OBJECT",
    }
}

fn map(entries: Vec<(&str, Value)>) -> Value {
    let mut fields = IndexMap::new();
    for (key, value) in entries {
        fields.insert(key.to_owned(), value);
    }
    Value::Map(fields)
}

fn opt_string(value: &Option<String>) -> Value {
    match value {
        Some(text) => Value::string(text.clone()),
        None => Value::Null,
    }
}

/// A shallow `{kind, name, ofType: null}` reference to a named type.
fn named_ref(schema: &Schema, name: &str) -> Value {
    let kind = match schema.type_kind(name) {
        Some(kind) => Value::enum_value(kind_name(kind)),
        None => Value::Null,
    };
    map(vec![
        ("kind", kind),
        ("name", Value::string(name)),
        ("ofType", Value::Null),
    ])
}

/// Converts the canonical `Nullable`/`List` stack back into the
/// `NON_NULL`/`LIST` wrapping chains introspection speaks.
fn type_ref_value(schema: &Schema, type_ref: &TypeRef) -> Value {
    enum Chain<'a> {
        Named(&'a str),
        List(Box<Chain<'a>>),
        NonNull(Box<Chain<'a>>),
    }

    fn render(schema: &Schema, chain: &Chain) -> Value {
        match chain {
            Chain::Named(name) => named_ref(schema, name),
            Chain::List(inner) => map(vec![
                ("kind", Value::enum_value("LIST")),
                ("name", Value::Null),
                ("ofType", render(schema, inner)),
            ]),
            Chain::NonNull(inner) => map(vec![
                ("kind", Value::enum_value("NON_NULL")),
                ("name", Value::Null),
                ("ofType", render(schema, inner)),
            ]),
        }
    }

    // start from the named type as non-null, then peel and wrap inside-out
    let mut chain = Chain::NonNull(Box::new(Chain::Named(&type_ref.name)));
    for modifier in type_ref.modifiers.iter().rev() {
        chain = match modifier {
            Modifier::Nullable => match chain {
                Chain::NonNull(inner) => *inner,
                other => other,
            },
            Modifier::List => Chain::NonNull(Box::new(Chain::List(Box::new(chain)))),
        };
    }
    render(schema, &chain)
}

fn input_field_value(schema: &Schema, field: &InputField) -> Value {
    let default = match &field.default {
        Some(value) => Value::string(value.to_string()),
        None => Value::Null,
    };
    map(vec![
        ("name", Value::string(field.name.clone())),
        ("description", opt_string(&field.description)),
        ("type", type_ref_value(schema, &field.field_type)),
        ("defaultValue", default),
    ])
}

fn output_field_value(schema: &Schema, field: &OutputField) -> Value {
    let args = field
        .arguments
        .iter()
        .map(|argument| input_field_value(schema, argument))
        .collect();
    map(vec![
        ("name", Value::string(field.name.clone())),
        ("description", opt_string(&field.description)),
        ("args", Value::List(args)),
        ("type", type_ref_value(schema, &field.field_type)),
        ("isDeprecated", Value::Bool(field.deprecation.is_some())),
        ("deprecationReason", opt_string(&field.deprecation)),
    ])
}

fn scalar_value(def: &ScalarDef) -> Value {
    map(vec![
        ("kind", Value::enum_value("SCALAR")),
        ("name", Value::string(def.name.clone())),
        ("description", opt_string(&def.description)),
    ])
}

fn enum_value(def: &EnumDef) -> Value {
    let values = def
        .values
        .iter()
        .map(|value| {
            map(vec![
                ("name", Value::string(value.name.clone())),
                ("description", opt_string(&value.description)),
                ("isDeprecated", Value::Bool(value.deprecation.is_some())),
                ("deprecationReason", opt_string(&value.deprecation)),
            ])
        })
        .collect();
    map(vec![
        ("kind", Value::enum_value("ENUM")),
        ("name", Value::string(def.name.clone())),
        ("description", opt_string(&def.description)),
        ("enumValues", Value::List(values)),
    ])
}

fn input_object_value(schema: &Schema, def: &InputObjectDef) -> Value {
    let fields = def
        .fields
        .iter()
        .map(|field| input_field_value(schema, field))
        .collect();
    map(vec![
        ("kind", Value::enum_value("INPUT_OBJECT")),
        ("name", Value::string(def.name.clone())),
        ("description", opt_string(&def.description)),
        ("inputFields", Value::List(fields)),
    ])
}

fn union_value(schema: &Schema, def: &UnionDef) -> Value {
    let members = def
        .members
        .iter()
        .map(|member| named_ref(schema, member))
        .collect();
    map(vec![
        ("kind", Value::enum_value("UNION")),
        ("name", Value::string(def.name.clone())),
        ("description", opt_string(&def.description)),
        ("possibleTypes", Value::List(members)),
    ])
}

fn interface_value(schema: &Schema, def: &InterfaceDef) -> Value {
    let fields = def
        .fields
        .iter()
        .map(|field| output_field_value(schema, field))
        .collect();
    let possible = schema
        .objects
        .iter()
        .filter(|object| object.interfaces.iter().any(|name| *name == def.name))
        .map(|object| named_ref(schema, &object.name))
        .collect();
    map(vec![
        ("kind", Value::enum_value("INTERFACE")),
        ("name", Value::string(def.name.clone())),
        ("description", opt_string(&def.description)),
        ("fields", Value::List(fields)),
        ("possibleTypes", Value::List(possible)),
    ])
}

fn object_value(schema: &Schema, def: &ObjectDef) -> Value {
    let fields = def
        .fields
        .iter()
        .map(|field| output_field_value(schema, field))
        .collect();
    let interfaces = def
        .interfaces
        .iter()
        .map(|name| named_ref(schema, name))
        .collect();
    map(vec![
        ("kind", Value::enum_value("OBJECT")),
        ("name", Value::string(def.name.clone())),
        ("description", opt_string(&def.description)),
        ("fields", Value::List(fields)),
        ("interfaces", Value::List(interfaces)),
    ])
}

fn directive_value(schema: &Schema, def: &DirectiveDef) -> Value {
    let locations = def
        .locations
        .iter()
        .map(|location| Value::enum_value(location.as_str()))
        .collect();
    let args = def
        .arguments
        .iter()
        .map(|argument| input_field_value(schema, argument))
        .collect();
    map(vec![
        ("name", Value::string(def.name.clone())),
        ("description", opt_string(&def.description)),
        ("locations", Value::List(locations)),
        ("args", Value::List(args)),
    ])
}

/// The `__type(name:)` table entry.
pub fn type_value(schema: &Schema, name: &str) -> Option<Value> {
    let kind = schema.type_kind(name)?;
    Some(match kind {
        TypeKind::Scalar => scalar_value(schema.scalar(name)?),
        TypeKind::Enum => enum_value(schema.enum_def(name)?),
        TypeKind::InputObject => input_object_value(schema, schema.input_object(name)?),
        TypeKind::Union => union_value(schema, schema.union_def(name)?),
        TypeKind::Interface => interface_value(schema, schema.interface(name)?),
        TypeKind::Object => object_value(schema, schema.object(name)?),
    })
}

/// The full `__schema` table.
pub fn schema_value(schema: &Schema) -> Value {
    let root = |name: &Option<String>| match name {
        Some(name) => named_ref(schema, name),
        None => Value::Null,
    };
    let mut types = Vec::new();
    types.extend(schema.scalars.iter().map(scalar_value));
    types.extend(schema.enums.iter().map(enum_value));
    types.extend(schema.inputs.iter().map(|def| input_object_value(schema, def)));
    types.extend(schema.unions.iter().map(|def| union_value(schema, def)));
    types.extend(schema.interfaces.iter().map(|def| interface_value(schema, def)));
    types.extend(schema.objects.iter().map(|def| object_value(schema, def)));
    let directives = schema
        .directives
        .iter()
        .map(|def| directive_value(schema, def))
        .collect();
    map(vec![
        ("queryType", root(&schema.roots.query)),
        ("mutationType", root(&schema.roots.mutation)),
        ("subscriptionType", root(&schema.roots.subscription)),
        ("types", Value::List(types)),
        ("directives", Value::List(directives)),
    ])
}
