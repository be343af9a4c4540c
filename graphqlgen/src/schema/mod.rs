//! Schema definition language AST and parser
//!
mod ast;
mod grammar;

pub use self::ast::*;
pub use self::grammar::parse_schema;
