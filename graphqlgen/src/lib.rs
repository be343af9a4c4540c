//! graphqlgen
//! ==========
//!
//! An offline GraphQL schema compiler. It parses Schema Definition Language
//! (per the June 2018 GraphQL spec), builds and validates an ordered schema
//! model for code generation, and produces the runtime introspection table a
//! generated service answers `__schema` / `__type` from. The same grammar
//! parses executable documents into a positioned AST, and the `response`
//! module holds the typed JSON-compatible value the runtime speaks.
//!
//! Example: compile a schema
//! -------------------------
//!
//! ```rust
//! let schema = graphqlgen::compile_schema("type Query { hello: String }").unwrap();
//! assert_eq!(schema.roots.query.as_deref(), Some("Query"));
//! assert_eq!(schema.objects[0].fields[0].field_type.to_string(), "String");
//! ```
//!
//! Example: parse a query
//! ----------------------
//!
//! ```rust
//! use graphqlgen::parse_query;
//!
//! let ast = parse_query("query MyQuery { field1, field2 }").unwrap();
//! assert_eq!(ast.definitions.len(), 1);
//! ```
#![warn(missing_debug_implementations)]

mod analysis;
mod common;
mod error;
mod helpers;
mod position;
mod tokenizer;

pub mod model;
pub mod query;
pub mod response;
pub mod schema;

pub use crate::common::{Directive, Txt, Type};
pub use crate::error::{Error, ParseError};
pub use crate::position::Pos;
pub use crate::query::parse_query;
pub use crate::schema::parse_schema;

/// Parses, builds, and validates a schema document in one call. The first
/// error aborts with its source position; there is no partial output.
pub fn compile_schema(sdl: &str) -> Result<model::Schema, Error> {
    let document = schema::parse_schema(sdl)?;
    let mut schema = model::build(&document)?;
    model::validate(&mut schema)?;
    Ok(schema)
}
