use combine::easy::{Error, Errors};
use combine::error::StreamError;
use combine::parser::choice::{choice, optional};
use combine::parser::item::{eof, position};
use combine::parser::repeat::{many, many1, sep_by1};
use combine::{parser, ParseResult, Parser};

use crate::analysis;
use crate::common::{default_value, directives, parse_type, string};
use crate::helpers::{ident, kind, name, punct};
use crate::query::grammar::{fragment_definition, operation_definition, selection_set};
use crate::schema::ast::*;
use crate::tokenizer::{Kind as T, Token, TokenStream};
use crate::ParseError;

pub fn schema_definition<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<SchemaDefinition<'a>, TokenStream<'a>> {
    (
        position().skip(ident("schema")),
        parser(directives),
        punct("{")
            .with(many((kind(T::Name).skip(punct(":")), name::<'a>())))
            .skip(punct("}")),
    )
        .flat_map(
            |(position, directives, operations): (_, _, Vec<(Token, _)>)| {
                let fail = |error| {
                    let mut errs = Errors::empty(position);
                    errs.add_error(error);
                    Err(errs)
                };
                let mut def = SchemaDefinition {
                    position,
                    directives,
                    ..SchemaDefinition::default()
                };
                // each operation kind may be bound to a root at most once
                for (oper, type_name) in operations {
                    let slot = match oper.value {
                        "query" => &mut def.query,
                        "mutation" => &mut def.mutation,
                        "subscription" => &mut def.subscription,
                        _ => {
                            return fail(Error::unexpected_message(format_args!(
                                "`{}` is not an operation, expected `query`, `mutation` or `subscription`",
                                oper.value
                            )));
                        }
                    };
                    if slot.replace(type_name).is_some() {
                        return fail(Error::unexpected_message(format_args!(
                            "operation `{}` is bound to a root twice",
                            oper.value
                        )));
                    }
                }
                Ok(def)
            },
        )
        .expected("SchemaDefinition")
        .parse_stream(input)
}

pub fn implements_interfaces<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<Vec<Txt<'a>>, TokenStream<'a>> {
    optional(
        ident("implements")
            .skip(optional(punct("&")))
            .with(sep_by1(name::<'a>(), punct("&"))),
    )
    .map(|opt| opt.unwrap_or_else(Vec::new))
    .parse_stream(input)
}

pub fn input_value_definition<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<InputValue<'a>, TokenStream<'a>> {
    (
        position(),
        optional(parser(string)),
        name::<'a>().skip(punct(":")),
        parser(parse_type),
        optional(punct("=").with(parser(default_value))),
        parser(directives),
    )
        .map(
            |(position, description, name, value_type, default_value, directives)| InputValue {
                position,
                description,
                name,
                value_type,
                default_value,
                directives,
            },
        )
        .expected("InputValueDefinition")
        .parse_stream(input)
}

pub fn arguments_definition<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<Vec<InputValue<'a>>, TokenStream<'a>> {
    optional(
        punct("(")
            .with(many1(parser(input_value_definition)))
            .skip(punct(")")),
    )
    .map(|opt| opt.unwrap_or_else(Vec::new))
    .parse_stream(input)
}

pub fn field_definition<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<Field<'a>, TokenStream<'a>> {
    (
        position(),
        optional(parser(string)),
        name::<'a>(),
        parser(arguments_definition),
        punct(":").with(parser(parse_type)),
        parser(directives),
    )
        .map(
            |(position, description, name, arguments, field_type, directives)| Field {
                position,
                description,
                name,
                arguments,
                field_type,
                directives,
            },
        )
        .expected("FieldDefinition")
        .parse_stream(input)
}

pub fn fields_definition<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<Vec<Field<'a>>, TokenStream<'a>> {
    optional(
        punct("{")
            .with(many1(parser(field_definition)))
            .skip(punct("}")),
    )
    .map(|opt| opt.unwrap_or_else(Vec::new))
    .parse_stream(input)
}

pub fn scalar_type<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<ScalarType<'a>, TokenStream<'a>> {
    (
        position().skip(ident("scalar")),
        name::<'a>(),
        parser(directives),
    )
        .map(|(position, name, directives)| ScalarType {
            position,
            description: None,
            name,
            directives,
        })
        .parse_stream(input)
}

pub fn object_type<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<ObjectType<'a>, TokenStream<'a>> {
    (
        position().skip(ident("type")),
        name::<'a>(),
        parser(implements_interfaces),
        parser(directives),
        parser(fields_definition),
    )
        .map(
            |(position, name, implements_interfaces, directives, fields)| ObjectType {
                position,
                description: None,
                name,
                implements_interfaces,
                directives,
                fields,
            },
        )
        .parse_stream(input)
}

pub fn interface_type<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<InterfaceType<'a>, TokenStream<'a>> {
    (
        position().skip(ident("interface")),
        name::<'a>(),
        parser(directives),
        parser(fields_definition),
    )
        .map(|(position, name, directives, fields)| InterfaceType {
            position,
            description: None,
            name,
            directives,
            fields,
        })
        .parse_stream(input)
}

pub fn union_members<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<Vec<Txt<'a>>, TokenStream<'a>> {
    optional(
        punct("=")
            .skip(optional(punct("|")))
            .with(sep_by1(name::<'a>(), punct("|"))),
    )
    .map(|opt| opt.unwrap_or_else(Vec::new))
    .parse_stream(input)
}

pub fn union_type<'a>(input: &mut TokenStream<'a>) -> ParseResult<UnionType<'a>, TokenStream<'a>> {
    (
        position().skip(ident("union")),
        name::<'a>(),
        parser(directives),
        parser(union_members),
    )
        .map(|(position, name, directives, types)| UnionType {
            position,
            description: None,
            name,
            directives,
            types,
        })
        .parse_stream(input)
}

pub fn enum_value_definition<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<EnumValue<'a>, TokenStream<'a>> {
    (
        position(),
        optional(parser(string)),
        name::<'a>(),
        parser(directives),
    )
        .map(|(position, description, name, directives)| EnumValue {
            position,
            description,
            name,
            directives,
        })
        .expected("EnumValueDefinition")
        .parse_stream(input)
}

pub fn enum_type<'a>(input: &mut TokenStream<'a>) -> ParseResult<EnumType<'a>, TokenStream<'a>> {
    (
        position().skip(ident("enum")),
        name::<'a>(),
        parser(directives),
        optional(
            punct("{")
                .with(many1(parser(enum_value_definition)))
                .skip(punct("}")),
        )
        .map(|opt| opt.unwrap_or_else(Vec::new)),
    )
        .map(|(position, name, directives, values)| EnumType {
            position,
            description: None,
            name,
            directives,
            values,
        })
        .parse_stream(input)
}

pub fn input_object_type<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<InputObjectType<'a>, TokenStream<'a>> {
    (
        position().skip(ident("input")),
        name::<'a>(),
        parser(directives),
        optional(
            punct("{")
                .with(many1(parser(input_value_definition)))
                .skip(punct("}")),
        )
        .map(|opt| opt.unwrap_or_else(Vec::new)),
    )
        .map(|(position, name, directives, fields)| InputObjectType {
            position,
            description: None,
            name,
            directives,
            fields,
        })
        .parse_stream(input)
}

pub fn type_definition<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<TypeDefinition<'a>, TokenStream<'a>> {
    choice((
        parser(scalar_type).map(TypeDefinition::Scalar),
        parser(object_type).map(TypeDefinition::Object),
        parser(interface_type).map(TypeDefinition::Interface),
        parser(union_type).map(TypeDefinition::Union),
        parser(enum_type).map(TypeDefinition::Enum),
        parser(input_object_type).map(TypeDefinition::InputObject),
    ))
    .expected("TypeDefinition")
    .parse_stream(input)
}

pub fn directive_location<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<DirectiveLocation, TokenStream<'a>> {
    name::<'a>()
        .and_then(|name| name.parse::<DirectiveLocation>())
        .expected("DirectiveLocation")
        .parse_stream(input)
}

pub fn directive_definition<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<DirectiveDefinition<'a>, TokenStream<'a>> {
    (
        position().skip(ident("directive")),
        punct("@").with(name::<'a>()),
        parser(arguments_definition),
        ident("on").with(
            optional(punct("|")).with(sep_by1(parser(directive_location), punct("|"))),
        ),
    )
        .map(|(position, name, arguments, locations)| DirectiveDefinition {
            position,
            description: None,
            name,
            arguments,
            locations,
        })
        .expected("DirectiveDefinition")
        .parse_stream(input)
}

pub fn type_extension<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<TypeExtension<'a>, TokenStream<'a>> {
    ident("extend")
        .with(choice((
            (
                position().skip(ident("scalar")),
                name::<'a>(),
                parser(directives),
            )
                .map(|(position, name, directives)| {
                    TypeExtension::Scalar(ScalarTypeExtension {
                        position,
                        name,
                        directives,
                    })
                }),
            (
                position().skip(ident("type")),
                name::<'a>(),
                parser(implements_interfaces),
                parser(directives),
                parser(fields_definition),
            )
                .map(|(position, name, implements_interfaces, directives, fields)| {
                    TypeExtension::Object(ObjectTypeExtension {
                        position,
                        name,
                        implements_interfaces,
                        directives,
                        fields,
                    })
                }),
            (
                position().skip(ident("interface")),
                name::<'a>(),
                parser(directives),
                parser(fields_definition),
            )
                .map(|(position, name, directives, fields)| {
                    TypeExtension::Interface(InterfaceTypeExtension {
                        position,
                        name,
                        directives,
                        fields,
                    })
                }),
            (
                position().skip(ident("union")),
                name::<'a>(),
                parser(directives),
                parser(union_members),
            )
                .map(|(position, name, directives, types)| {
                    TypeExtension::Union(UnionTypeExtension {
                        position,
                        name,
                        directives,
                        types,
                    })
                }),
            (
                position().skip(ident("enum")),
                name::<'a>(),
                parser(directives),
                optional(
                    punct("{")
                        .with(many1(parser(enum_value_definition)))
                        .skip(punct("}")),
                )
                .map(|opt| opt.unwrap_or_else(Vec::new)),
            )
                .map(|(position, name, directives, values)| {
                    TypeExtension::Enum(EnumTypeExtension {
                        position,
                        name,
                        directives,
                        values,
                    })
                }),
            (
                position().skip(ident("input")),
                name::<'a>(),
                parser(directives),
                optional(
                    punct("{")
                        .with(many1(parser(input_value_definition)))
                        .skip(punct("}")),
                )
                .map(|opt| opt.unwrap_or_else(Vec::new)),
            )
                .map(|(position, name, directives, fields)| {
                    TypeExtension::InputObject(InputObjectTypeExtension {
                        position,
                        name,
                        directives,
                        fields,
                    })
                }),
        )))
        .expected("TypeExtension")
        .parse_stream(input)
}

enum Described<'a> {
    Type(TypeDefinition<'a>),
    Directive(DirectiveDefinition<'a>),
}

/// Type and directive definitions are the only productions a description can
/// precede, so the description is parsed once here and attached afterwards.
pub fn described_definition<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<Definition<'a>, TokenStream<'a>> {
    (
        optional(parser(string)),
        choice((
            parser(type_definition).map(Described::Type),
            parser(directive_definition).map(Described::Directive),
        )),
    )
        .map(|(description, described)| match described {
            Described::Type(def) => Definition::Type(def.with_description(description)),
            Described::Directive(def) => Definition::Directive(def.with_description(description)),
        })
        .parse_stream(input)
}

pub fn definition<'a>(input: &mut TokenStream<'a>) -> ParseResult<Definition<'a>, TokenStream<'a>> {
    parser(schema_definition)
        .map(Definition::Schema)
        .or(parser(type_extension).map(Definition::TypeExtension))
        .or(parser(described_definition))
        .or(parser(operation_definition).map(Definition::Operation))
        .or(parser(fragment_definition).map(Definition::Fragment))
        .or(parser(selection_set).map(Definition::SelectionSet))
        .expected("Definition")
        .parse_stream(input)
}

/// Parses a piece of schema language and returns an AST
pub fn parse_schema(s: &str) -> Result<Document, ParseError> {
    analysis::check_grammar();
    let mut tokens = TokenStream::new(s);
    let (doc, _) = many1(parser(definition))
        .map(|d| Document { definitions: d })
        .skip(eof())
        .parse_stream(&mut tokens)
        .map_err(|e| e.into_inner().error)?;

    Ok(doc)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::position::Pos;
    use crate::schema::ast::*;
    use crate::schema::grammar::parse_schema;

    fn ast(s: &str) -> Document {
        parse_schema(s).unwrap()
    }

    fn single_type(s: &str) -> TypeDefinition {
        let mut doc = ast(s);
        assert_eq!(doc.definitions.len(), 1);
        match doc.definitions.remove(0) {
            Definition::Type(def) => def,
            other => panic!("expected a type definition, got {:?}", other),
        }
    }

    #[test]
    fn minimal() {
        assert_eq!(
            ast("schema { query: Query }"),
            Document {
                definitions: vec![Definition::Schema(SchemaDefinition {
                    position: Pos { line: 1, column: 1, offset: 0 },
                    directives: vec![],
                    query: Some("Query"),
                    mutation: None,
                    subscription: None,
                })],
            }
        );
    }

    #[test]
    fn duplicate_operation_root() {
        assert!(parse_schema("schema { query: Q, query: R }").is_err());
    }

    #[test]
    fn scalar_type() {
        let def = single_type("scalar DateTime");
        assert_eq!(
            def,
            TypeDefinition::Scalar(ScalarType {
                position: Pos { line: 1, column: 1, offset: 0 },
                description: None,
                name: "DateTime",
                directives: vec![],
            })
        );
    }

    #[test]
    fn object_with_implements_amp() {
        let def = single_type("type Person implements & NamedEntity & ValuedEntity { name: String }");
        match def {
            TypeDefinition::Object(obj) => {
                assert_eq!(obj.name, "Person");
                assert_eq!(obj.implements_interfaces, vec!["NamedEntity", "ValuedEntity"]);
                assert_eq!(obj.fields.len(), 1);
                assert_eq!(obj.fields[0].name, "name");
                assert_eq!(obj.fields[0].field_type, Type::NamedType("String"));
            }
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn field_arguments_and_modifiers() {
        let def = single_type("type Query { search(text: String!, limit: Int = 25): [Result!]! }");
        match def {
            TypeDefinition::Object(obj) => {
                let field = &obj.fields[0];
                assert_eq!(field.arguments.len(), 2);
                assert_eq!(
                    field.arguments[0].value_type,
                    Type::NonNullType(Box::new(Type::NamedType("String")))
                );
                assert_eq!(field.arguments[1].default_value, Some(Value::Int(25)));
                assert_eq!(
                    field.field_type,
                    Type::NonNullType(Box::new(Type::ListType(Box::new(Type::NonNullType(
                        Box::new(Type::NamedType("Result"))
                    )))))
                );
            }
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn interface_union_enum_input() {
        let doc = ast(
            "interface Node { id: ID! }\n\
             union Pet = | Cat | Dog\n\
             enum Color { RED GREEN BLUE }\n\
             input Point { x: Float y: Float }",
        );
        assert_eq!(doc.definitions.len(), 4);
        match &doc.definitions[1] {
            Definition::Type(TypeDefinition::Union(u)) => {
                assert_eq!(u.types, vec!["Cat", "Dog"]);
            }
            other => panic!("expected union, got {:?}", other),
        }
        match &doc.definitions[2] {
            Definition::Type(TypeDefinition::Enum(e)) => {
                assert_eq!(
                    e.values.iter().map(|v| v.name).collect::<Vec<_>>(),
                    vec!["RED", "GREEN", "BLUE"]
                );
            }
            other => panic!("expected enum, got {:?}", other),
        }
    }

    #[test]
    fn descriptions_attach() {
        let doc = ast("\"\"\"\nA point in time.\n\"\"\"\nscalar DateTime\n\"Simple doc\" type Q { f: Int }");
        match &doc.definitions[0] {
            Definition::Type(TypeDefinition::Scalar(s)) => {
                assert_eq!(s.description.as_deref(), Some("A point in time."));
            }
            other => panic!("expected scalar, got {:?}", other),
        }
        match &doc.definitions[1] {
            Definition::Type(TypeDefinition::Object(o)) => {
                assert_eq!(o.description.as_deref(), Some("Simple doc"));
            }
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn field_and_value_descriptions() {
        let def = single_type(
            "enum Color {\n  \"warm\" RED\n  \"cool\" BLUE\n}",
        );
        match def {
            TypeDefinition::Enum(e) => {
                assert_eq!(e.values[0].description.as_deref(), Some("warm"));
                assert_eq!(e.values[1].description.as_deref(), Some("cool"));
            }
            other => panic!("expected enum, got {:?}", other),
        }
    }

    #[test]
    fn directive_definition() {
        let doc = ast("directive @cache(ttl: Int = 60) on FIELD_DEFINITION | OBJECT");
        match &doc.definitions[0] {
            Definition::Directive(d) => {
                assert_eq!(d.name, "cache");
                assert_eq!(d.arguments[0].name, "ttl");
                assert_eq!(
                    d.locations,
                    vec![DirectiveLocation::FieldDefinition, DirectiveLocation::Object]
                );
            }
            other => panic!("expected directive definition, got {:?}", other),
        }
        assert!(parse_schema("directive @bad on NOWHERE").is_err());
    }

    #[test]
    fn extensions() {
        let doc = ast(
            "extend type Query { version: String }\n\
             extend enum Color { MAUVE }\n\
             extend union Pet = Hamster",
        );
        match &doc.definitions[0] {
            Definition::TypeExtension(TypeExtension::Object(o)) => {
                assert_eq!(o.name, "Query");
                assert_eq!(o.fields[0].name, "version");
            }
            other => panic!("expected object extension, got {:?}", other),
        }
        match &doc.definitions[2] {
            Definition::TypeExtension(TypeExtension::Union(u)) => {
                assert_eq!(u.types, vec!["Hamster"]);
            }
            other => panic!("expected union extension, got {:?}", other),
        }
    }

    #[test]
    fn error_names_type_production() {
        let err = parse_schema("type Q { x: }").unwrap_err();
        assert_eq!(err.position.line, 1);
        assert!(err.message.contains("Type"), "{}", err.message);
    }

    #[test]
    fn executable_definitions_parse() {
        let doc = ast("schema { query: Q }\nquery Probe { __typename }");
        assert_eq!(doc.definitions.len(), 2);
        match &doc.definitions[1] {
            Definition::Operation(op) => assert_eq!(op.name, Some("Probe")),
            other => panic!("expected operation, got {:?}", other),
        }
    }
}
