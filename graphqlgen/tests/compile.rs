//! End-to-end scenarios against the public API: source text in, compiled
//! model and introspection tables out.

use pretty_assertions::assert_eq;

use graphqlgen::model::{self, Modifier, SchemaError};
use graphqlgen::response::{parse_json, to_json, Value, ValueKind};
use graphqlgen::{compile_schema, parse_query, Error};

fn schema_err(sdl: &str) -> SchemaError {
    match compile_schema(sdl).unwrap_err() {
        Error::Schema(err) => err,
        other => panic!("expected a schema error, got {:?}", other),
    }
}

#[test]
fn minimal_schema() {
    let schema = compile_schema("type Query { hello: String }").unwrap();
    assert_eq!(schema.objects.len(), 1);
    let query = &schema.objects[0];
    assert_eq!(query.name, "Query");
    assert_eq!(query.fields.len(), 1);
    let hello = &query.fields[0];
    assert_eq!(hello.name, "hello");
    assert_eq!(hello.field_type.name, "String");
    assert!(hello.field_type.is_nullable());
    assert_eq!(schema.roots.query.as_deref(), Some("Query"));
}

#[test]
fn non_null_and_list_modifiers() {
    let schema = compile_schema("type Query { xs: [Int!]! }").unwrap();
    let xs = &schema.objects[0].fields[0];
    assert_eq!(xs.field_type.name, "Int");
    assert_eq!(xs.field_type.modifiers, vec![Modifier::List]);
    assert_eq!(xs.field_type.to_string(), "[Int!]!");
}

#[test]
fn interface_implementation_is_marked() {
    let schema = compile_schema(
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
fn interface_mismatch_is_rejected() {
    match schema_err(
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
            assert_eq!((object.as_str(), interface.as_str(), field.as_str()), ("T", "N", "id"));
        }
        other => panic!("expected InterfaceMismatch, got {:?}", other),
    }
}

#[test]
fn default_values_are_typed() {
    let schema = compile_schema("type Query { a: Int }\ninput I { n: Int = 3 }").unwrap();
    let n = &schema.input_object("I").unwrap().fields[0];
    assert_eq!(n.default, Some(Value::Int(3)));

    match schema_err("type Query { a: Int }\ninput I { n: Int = \"x\" }") {
        SchemaError::InvalidDefault { name, .. } => assert_eq!(name, "I.n"),
        other => panic!("expected InvalidDefault, got {:?}", other),
    }
}

#[test]
fn parse_errors_carry_position_and_production() {
    let err = match compile_schema("type Q { x: }") {
        Err(Error::Parse(err)) => err,
        other => panic!("expected a parse error, got {:?}", other),
    };
    assert_eq!(err.position.line, 1);
    assert!(err.message.contains("Type"), "{}", err.message);
}

#[test]
fn json_round_trip() {
    let mut value = Value::new(ValueKind::Map);
    value.insert("a", Value::Int(1)).unwrap();
    value
        .insert("b", Value::List(vec![Value::string("x"), Value::Null]))
        .unwrap();
    let json = to_json(&value);
    assert_eq!(json, r#"{"a":1,"b":["x",null]}"#);

    let decoded = parse_json(&json).unwrap();
    // equal except the inner string is now marked from_json
    assert_ne!(decoded, value);
    assert_eq!(decoded.get("a"), Some(&Value::Int(1)));
    let b = decoded.get("b").unwrap();
    assert!(b.get_index(0).unwrap().is_from_json());
    assert!(b.get_index(0).unwrap().maybe_enum());
    assert_eq!(b.get_index(1), Some(&Value::Null));
}

#[test]
fn string_literals_round_trip_through_json() {
    // a default value carries the parsed literal into the model; encoding it
    // and decoding it again only flips the from_json marker
    let schema = compile_schema(
        "type Query { a: Int }\ninput I { s: String = \"tab\\there \\u00e9\\uD83D\\uDE00\" }",
    )
    .unwrap();
    let parsed = schema.input_object("I").unwrap().fields[0]
        .default
        .clone()
        .unwrap();
    assert_eq!(parsed.as_str().unwrap(), "tab\there \u{e9}\u{1F600}");
    assert!(!parsed.is_from_json());

    let decoded = parse_json(&to_json(&parsed)).unwrap();
    assert_eq!(decoded.as_str().unwrap(), parsed.as_str().unwrap());
    assert!(decoded.is_from_json());
}

#[test]
fn json_overflow() {
    match parse_json("2147483648") {
        Err(err) => assert!(err.to_string().contains("32-bit")),
        Ok(value) => panic!("expected overflow, got {:?}", value),
    }
}

#[test]
fn extensions_merge_in_declaration_order() {
    let base = compile_schema("type Query { a: Int }").unwrap();
    let extended = compile_schema(
        "type Query { a: Int }\n\
         extend type Query { b: Int }\n\
         extend type Query { c: Int }",
    )
    .unwrap();
    // the base prefix is untouched
    assert_eq!(extended.objects[0].fields[0], base.objects[0].fields[0]);
    let names: Vec<_> = extended.objects[0]
        .fields
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn build_is_deterministic() {
    let sdl = "schema { query: Root }\n\
               \"\"\"The root.\"\"\"\n\
               type Root implements Node { id: ID! friend: Root others: [Root!] }\n\
               interface Node { id: ID! }\n\
               enum Mood { HAPPY GRUMPY }\n\
               union Anything = Root\n\
               input Filter { mood: Mood = HAPPY limit: Int = 10 }\n\
               directive @weight(value: Float = 1.0) on FIELD_DEFINITION\n\
               extend type Root { mood(filter: Filter): Mood }";
    let first = compile_schema(sdl).unwrap();
    let second = compile_schema(sdl).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        to_json(&model::schema_value(&first)),
        to_json(&model::schema_value(&second))
    );
}

#[test]
fn introspection_table_survives_json() {
    let schema = compile_schema(
        "type Query { hero(limit: Int = 5): [Character!] }\n\
         interface Character { name: String! }\n\
         type Human implements Character { name: String! homePlanet: String }",
    )
    .unwrap();
    let table = model::schema_value(&schema);
    let json = to_json(&table);
    let decoded = parse_json(&json).unwrap();
    assert_eq!(
        decoded.get("queryType").unwrap().get("name").unwrap().as_str().unwrap(),
        "Query"
    );
    // enum-valued cells decode as strings, which is exactly the ambiguity
    // maybe_enum() reports
    let types = decoded.get("types").unwrap();
    let first = types.get_index(0).unwrap();
    assert!(first.get("kind").unwrap().maybe_enum());
}

#[test]
fn queries_parse_end_to_end() {
    let doc = parse_query(
        "query Hero($ep: Episode = JEDI) {\n\
           hero(episode: $ep) {\n\
             name\n\
             ... on Human { height }\n\
             ...friends\n\
           }\n\
         }\n\
         fragment friends on Character { friends { name } }",
    )
    .unwrap();
    assert_eq!(doc.definitions.len(), 2);

    assert!(parse_query("query { broken").is_err());
}

#[test]
fn scenario_kitchen_sink() {
    let schema = compile_schema(
        "\"\"\"\n\
         A point in time, to millisecond precision.\n\
         \"\"\"\n\
         scalar DateTime\n\
         \n\
         schema { query: Root mutation: Writes }\n\
         \n\
         interface Named { name: String! }\n\
         \n\
         type Root { search(text: String!, first: Int = 10): [Hit!]! now: DateTime }\n\
         type Writes { touch(at: DateTime): Boolean! }\n\
         \n\
         union Hit = Person | Place\n\
         type Person implements Named { name: String! born: DateTime }\n\
         type Place implements Named { name: String! lat: Float lon: Float }\n\
         \n\
         enum Unit { METRIC \"Freedom units\" IMPERIAL @deprecated }\n\
         input Near { lat: Float! lon: Float! radius: Float = 5.0 unit: Unit = METRIC }\n\
         extend type Root { near(to: Near!): [Place!] }",
    )
    .unwrap();

    assert_eq!(schema.roots.query.as_deref(), Some("Root"));
    assert_eq!(schema.roots.mutation.as_deref(), Some("Writes"));
    assert_eq!(
        schema.scalar("DateTime").unwrap().description.as_deref(),
        Some("A point in time, to millisecond precision.")
    );
    assert_eq!(schema.union_def("Hit").unwrap().members, vec!["Person", "Place"]);
    let root = schema.object("Root").unwrap();
    assert_eq!(root.fields.last().unwrap().name, "near");
    let unit = schema.enum_def("Unit").unwrap();
    assert_eq!(unit.values[1].description.as_deref(), Some("Freedom units"));
    assert_eq!(
        unit.values[1].deprecation.as_deref(),
        Some("No longer supported")
    );
    let near = schema.input_object("Near").unwrap();
    assert_eq!(near.fields[2].default, Some(Value::Float(5.0)));
    assert_eq!(near.fields[3].default, Some(Value::enum_value("METRIC")));
}
