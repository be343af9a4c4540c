use thiserror::Error;

use crate::position::Pos;

/// Schema build and validation failures. The first error aborts the build
/// with full context; there is no local recovery.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("{pos}: `{name}` is already defined at {prior}")]
    DuplicateDefinition { name: String, pos: Pos, prior: Pos },

    #[error("{pos}: `extend` references undefined type `{name}`")]
    UndefinedExtension { name: String, pos: Pos },

    #[error("{pos}: unknown type `{name}`")]
    UnknownType { name: String, pos: Pos },

    #[error("{pos}: `{name}` is {got}, expected {expected}")]
    KindMismatch {
        name: String,
        pos: Pos,
        expected: &'static str,
        got: &'static str,
    },

    #[error("object `{object}` does not satisfy interface `{interface}`: field `{field}` {reason}")]
    InterfaceMismatch {
        object: String,
        interface: String,
        field: String,
        reason: String,
    },

    #[error("{pos}: invalid default value for `{name}`: {reason}")]
    InvalidDefault {
        name: String,
        pos: Pos,
        reason: String,
    },

    #[error("{pos}: input object `{name}` references itself through non-nullable fields")]
    CircularInput { name: String, pos: Pos },

    #[error("{pos}: executable definitions are not allowed in a schema document")]
    ExecutableDefinition { pos: Pos },

    #[error("schema does not declare a query root")]
    MissingQueryRoot,
}
