//! The compiled schema model.
//!
//! Named, ordered collections keyed by GraphQL type name. Types reference
//! each other by name, never by pointer, so the model owns every type
//! exactly once, has no cycles to manage, and is freely shareable by
//! reference once built.

mod builder;
mod error;
mod introspect;
mod validate;

pub use self::builder::build;
pub use self::error::SchemaError;
pub use self::introspect::{schema_value, type_value};
pub use self::validate::validate;

use std::collections::HashMap;
use std::fmt;

use crate::position::Pos;
use crate::response::Value;
pub use crate::schema::DirectiveLocation;

/// The six GraphQL type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Scalar => "scalar",
            TypeKind::Object => "object",
            TypeKind::Interface => "interface",
            TypeKind::Union => "union",
            TypeKind::Enum => "enum",
            TypeKind::InputObject => "input object",
        }
    }

    /// Legal as the base of an input field or argument type.
    pub fn is_input(&self) -> bool {
        matches!(self, TypeKind::Scalar | TypeKind::Enum | TypeKind::InputObject)
    }

    /// Legal as the base of an output field type.
    pub fn is_output(&self) -> bool {
        !matches!(self, TypeKind::InputObject)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One wrapper level of a type reference, read outside-in.
///
/// The canonical stack inverts GraphQL's `!`: it holds `Nullable` markers
/// where the source had none, so that non-null (the common case for
/// generated code) is the absence of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    List,
    Nullable,
}

/// A named type plus its modifier stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    pub modifiers: Vec<Modifier>,
}

impl TypeRef {
    /// A plain nullable reference.
    pub fn named(name: impl Into<String>) -> TypeRef {
        TypeRef {
            name: name.into(),
            modifiers: vec![Modifier::Nullable],
        }
    }

    /// A non-null reference.
    pub fn non_null(name: impl Into<String>) -> TypeRef {
        TypeRef {
            name: name.into(),
            modifiers: Vec::new(),
        }
    }

    /// Walks an AST type and produces the canonical stack: a `List` per list
    /// wrapper, a `Nullable` at every position the source had no `!`.
    pub fn from_ast(ty: &crate::common::Type) -> TypeRef {
        use crate::common::Type;

        fn walk<'a>(ty: &Type<'a>, nullable: bool, out: &mut Vec<Modifier>) -> &'a str {
            match ty {
                Type::NonNullType(inner) => walk(inner, false, out),
                Type::ListType(inner) => {
                    if nullable {
                        out.push(Modifier::Nullable);
                    }
                    out.push(Modifier::List);
                    walk(inner, true, out)
                }
                Type::NamedType(name) => {
                    if nullable {
                        out.push(Modifier::Nullable);
                    }
                    name
                }
            }
        }

        let mut modifiers = Vec::new();
        let name = walk(ty, true, &mut modifiers);
        TypeRef {
            name: name.to_owned(),
            modifiers,
        }
    }

    /// Whether the outermost position is nullable.
    pub fn is_nullable(&self) -> bool {
        self.modifiers.first() == Some(&Modifier::Nullable)
    }

    /// Whether this reference is an acceptable implementation of `required`
    /// (an interface field's type): same base type, same list shape, and
    /// non-null may be narrower but never wider.
    pub fn satisfies(&self, required: &TypeRef) -> bool {
        if self.name != required.name {
            return false;
        }
        let mut own = self.modifiers.iter().peekable();
        for modifier in &required.modifiers {
            match modifier {
                // the implementation may drop a Nullable the interface has
                Modifier::Nullable => {
                    if own.peek() == Some(&&Modifier::Nullable) {
                        own.next();
                    }
                }
                Modifier::List => {
                    if own.next() != Some(&Modifier::List) {
                        return false;
                    }
                }
            }
        }
        own.next().is_none()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn level(f: &mut fmt::Formatter, name: &str, mods: &[Modifier]) -> fmt::Result {
            let (nullable, rest) = match mods.first() {
                Some(Modifier::Nullable) => (true, &mods[1..]),
                _ => (false, mods),
            };
            match rest.first() {
                Some(Modifier::List) => {
                    write!(f, "[")?;
                    level(f, name, &rest[1..])?;
                    write!(f, "]")?;
                }
                _ => write!(f, "{}", name)?,
            }
            if !nullable {
                write!(f, "!")?;
            }
            Ok(())
        }
        level(f, &self.name, &self.modifiers)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarDef {
    pub name: String,
    pub description: Option<String>,
    pub position: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValueDef {
    pub name: String,
    pub description: Option<String>,
    pub deprecation: Option<String>,
    pub position: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<EnumValueDef>,
    pub position: Pos,
}

/// An input object field, a field argument, or a directive argument.
#[derive(Debug, Clone, PartialEq)]
pub struct InputField {
    pub name: String,
    pub description: Option<String>,
    pub field_type: TypeRef,
    pub default: Option<Value>,
    pub position: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputObjectDef {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<InputField>,
    pub position: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionDef {
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<String>,
    pub position: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputField {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<InputField>,
    pub field_type: TypeRef,
    pub deprecation: Option<String>,
    /// Set during validation when the field implements an interface field.
    pub interface_field: bool,
    pub position: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDef {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<OutputField>,
    pub position: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDef {
    pub name: String,
    pub description: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<OutputField>,
    pub position: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveDef {
    pub name: String,
    pub description: Option<String>,
    pub locations: Vec<DirectiveLocation>,
    pub arguments: Vec<InputField>,
    pub position: Pos,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationRoots {
    pub query: Option<String>,
    pub mutation: Option<String>,
    pub subscription: Option<String>,
}

/// The compiled schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub scalars: Vec<ScalarDef>,
    pub enums: Vec<EnumDef>,
    pub inputs: Vec<InputObjectDef>,
    pub unions: Vec<UnionDef>,
    pub interfaces: Vec<InterfaceDef>,
    pub objects: Vec<ObjectDef>,
    pub directives: Vec<DirectiveDef>,
    pub roots: OperationRoots,
    pub(crate) kinds: HashMap<String, TypeKind>,
    pub(crate) positions: HashMap<String, Pos>,
}

impl Schema {
    /// The kind a type name resolves to, if any.
    pub fn type_kind(&self, name: &str) -> Option<TypeKind> {
        self.kinds.get(name).copied()
    }

    /// Source position of a name's first declaration.
    pub fn position_of(&self, name: &str) -> Option<Pos> {
        self.positions.get(name).copied()
    }

    pub fn scalar(&self, name: &str) -> Option<&ScalarDef> {
        self.scalars.iter().find(|def| def.name == name)
    }

    pub fn enum_def(&self, name: &str) -> Option<&EnumDef> {
        self.enums.iter().find(|def| def.name == name)
    }

    pub fn input_object(&self, name: &str) -> Option<&InputObjectDef> {
        self.inputs.iter().find(|def| def.name == name)
    }

    pub fn union_def(&self, name: &str) -> Option<&UnionDef> {
        self.unions.iter().find(|def| def.name == name)
    }

    pub fn interface(&self, name: &str) -> Option<&InterfaceDef> {
        self.interfaces.iter().find(|def| def.name == name)
    }

    pub fn object(&self, name: &str) -> Option<&ObjectDef> {
        self.objects.iter().find(|def| def.name == name)
    }

    pub fn directive(&self, name: &str) -> Option<&DirectiveDef> {
        self.directives.iter().find(|def| def.name == name)
    }
}
