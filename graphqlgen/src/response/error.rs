use thiserror::Error;

use super::ValueKind;

/// Response value misuse and JSON decode failures.
#[derive(Error, Debug)]
pub enum ValueError {
    /// A map already holds the key being inserted.
    #[error("map already contains key `{key}`")]
    DuplicateKey { key: String },

    /// An accessor was called against the wrong kind of value. This is a
    /// logic error in the caller, not bad user data.
    #[error("expected a {expected} value, got {got}")]
    InvalidKind { expected: ValueKind, got: ValueKind },

    /// A JSON number is outside the 32-bit signed integer range.
    #[error("number does not fit in a 32-bit signed integer")]
    Overflow,

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}
