use combine::easy::Errors;
use thiserror::Error;

use crate::model::SchemaError;
use crate::position::Pos;
use crate::response::ValueError;
use crate::tokenizer::Token;

pub type InternalError<'a> = Errors<Token<'a>, Token<'a>, Pos>;

/// Error parsing a GraphQL document, pointing at the token the grammar could
/// not proceed past, with the expectations that were active there.
#[derive(Error, Debug)]
#[error("parse error at {position}: {message}")]
pub struct ParseError {
    pub position: Pos,
    pub message: String,
}

impl<'a> From<InternalError<'a>> for ParseError {
    fn from(e: InternalError<'a>) -> ParseError {
        let mut message = String::new();
        for (i, err) in e.errors.iter().enumerate() {
            if i > 0 {
                message.push_str("; ");
            }
            message.push_str(&err.to_string());
        }
        ParseError {
            position: e.position,
            message,
        }
    }
}

/// Anything the compiler front half can fail with.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Value(#[from] ValueError),
}
