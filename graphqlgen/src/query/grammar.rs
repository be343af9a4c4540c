use combine::parser::choice::{choice, optional};
use combine::parser::item::{eof, position};
use combine::parser::repeat::many1;
use combine::{parser, ParseResult, Parser};

use crate::analysis;
use crate::common::{arguments, default_value, directives, parse_type};
use crate::helpers::{fragment_name, ident, name, punct};
use crate::query::ast::*;
use crate::tokenizer::TokenStream;
use crate::ParseError;

pub fn field<'a>(input: &mut TokenStream<'a>) -> ParseResult<Field<'a>, TokenStream<'a>> {
    (
        position(),
        name::<'a>(),
        optional(punct(":").with(name::<'a>())),
        parser(arguments),
        parser(directives),
        optional(parser(selection_set)),
    )
        .map(
            |(position, name_or_alias, opt_name, arguments, directives, sel)| {
                let (name, alias) = match opt_name {
                    Some(name) => (name, Some(name_or_alias)),
                    None => (name_or_alias, None),
                };
                Field {
                    position,
                    name,
                    alias,
                    arguments,
                    directives,
                    selection_set: sel.unwrap_or_else(|| SelectionSet {
                        span: (position, position),
                        items: Vec::new(),
                    }),
                }
            },
        )
        .parse_stream(input)
}

pub fn selection<'a>(input: &mut TokenStream<'a>) -> ParseResult<Selection<'a>, TokenStream<'a>> {
    parser(field)
        .map(Selection::Field)
        .or(punct("...").with(
            // a fragment spread is any name but `on`, so the spread branch
            // can run first without stealing an inline fragment's condition
            (position(), fragment_name::<'a>(), parser(directives))
                .map(|(position, fragment_name, directives)| FragmentSpread {
                    position,
                    fragment_name,
                    directives,
                })
                .map(Selection::FragmentSpread)
                .or((
                    position(),
                    optional(ident("on").with(name::<'a>())),
                    parser(directives),
                    parser(selection_set),
                )
                    .map(
                        |(position, type_condition, directives, selection_set)| InlineFragment {
                            position,
                            type_condition,
                            selection_set,
                            directives,
                        },
                    )
                    .map(Selection::InlineFragment)),
        ))
        .expected("Selection")
        .parse_stream(input)
}

pub fn selection_set<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<SelectionSet<'a>, TokenStream<'a>> {
    (
        position().skip(punct("{")),
        many1(parser(selection)),
        position().skip(punct("}")),
    )
        .map(|(start, items, end)| SelectionSet { span: (start, end), items })
        .expected("SelectionSet")
        .parse_stream(input)
}

pub fn operation_definition<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<OperationDefinition<'a>, TokenStream<'a>> {
    (
        position(),
        choice((
            ident("query").map(|_| Operation::Query),
            ident("mutation").map(|_| Operation::Mutation),
            ident("subscription").map(|_| Operation::Subscription),
        )),
        optional(name::<'a>()),
        optional(
            punct("(")
                .with(many1(
                    (
                        position(),
                        punct("$").with(name::<'a>()).skip(punct(":")),
                        parser(parse_type),
                        optional(punct("=").with(parser(default_value))),
                    )
                        .map(|(position, name, var_type, default_value)| VariableDefinition {
                            position,
                            name,
                            var_type,
                            default_value,
                        })
                        .expected("VariableDefinition"),
                ))
                .skip(punct(")")),
        )
        .map(|vars| vars.unwrap_or_else(Vec::new)),
        parser(directives),
        parser(selection_set),
    )
        .map(
            |(position, kind, name, variable_definitions, directives, selection_set)| {
                OperationDefinition {
                    position,
                    kind,
                    name,
                    variable_definitions,
                    directives,
                    selection_set,
                }
            },
        )
        .expected("OperationDefinition")
        .parse_stream(input)
}

pub fn fragment_definition<'a>(
    input: &mut TokenStream<'a>,
) -> ParseResult<FragmentDefinition<'a>, TokenStream<'a>> {
    (
        position().skip(ident("fragment")),
        fragment_name::<'a>(),
        ident("on").with(name::<'a>()),
        parser(directives),
        parser(selection_set),
    )
        .map(
            |(position, name, type_condition, directives, selection_set)| FragmentDefinition {
                position,
                name,
                type_condition,
                directives,
                selection_set,
            },
        )
        .expected("FragmentDefinition")
        .parse_stream(input)
}

pub fn definition<'a>(input: &mut TokenStream<'a>) -> ParseResult<Definition<'a>, TokenStream<'a>> {
    parser(selection_set)
        .map(Definition::SelectionSet)
        .or(parser(operation_definition).map(Definition::Operation))
        .or(parser(fragment_definition).map(Definition::Fragment))
        .expected("Definition")
        .parse_stream(input)
}

/// Parses a piece of query language and returns an AST
pub fn parse_query(s: &str) -> Result<Document, ParseError> {
    analysis::check_grammar();
    let mut tokens = TokenStream::new(s);
    let (doc, _) = many1(parser(definition))
        .map(|d| Document { definitions: d })
        .skip(eof())
        .parse_stream(&mut tokens)
        .map_err(|e| e.into_inner().error)?;

    Ok(doc)
}
