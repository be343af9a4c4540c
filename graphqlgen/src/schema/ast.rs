use std::borrow::Cow;
use std::str::FromStr;

use thiserror::Error;

pub use crate::common::{Directive, Txt, Type, Value};
use crate::position::Pos;

pub use crate::query::{FragmentDefinition, OperationDefinition, SelectionSet};

/// A description attached to the definition it immediately precedes.
pub type Description<'a> = Option<Cow<'a, str>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document<'a> {
    pub definitions: Vec<Definition<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Definition<'a> {
    Schema(SchemaDefinition<'a>),
    Type(TypeDefinition<'a>),
    TypeExtension(TypeExtension<'a>),
    Directive(DirectiveDefinition<'a>),
    Operation(OperationDefinition<'a>),
    Fragment(FragmentDefinition<'a>),
    SelectionSet(SelectionSet<'a>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDefinition<'a> {
    pub position: Pos,
    pub directives: Vec<Directive<'a>>,
    pub query: Option<Txt<'a>>,
    pub mutation: Option<Txt<'a>>,
    pub subscription: Option<Txt<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefinition<'a> {
    Scalar(ScalarType<'a>),
    Object(ObjectType<'a>),
    Interface(InterfaceType<'a>),
    Union(UnionType<'a>),
    Enum(EnumType<'a>),
    InputObject(InputObjectType<'a>),
}

impl<'a> TypeDefinition<'a> {
    pub fn name(&self) -> Txt<'a> {
        match self {
            TypeDefinition::Scalar(t) => t.name,
            TypeDefinition::Object(t) => t.name,
            TypeDefinition::Interface(t) => t.name,
            TypeDefinition::Union(t) => t.name,
            TypeDefinition::Enum(t) => t.name,
            TypeDefinition::InputObject(t) => t.name,
        }
    }

    pub fn position(&self) -> Pos {
        match self {
            TypeDefinition::Scalar(t) => t.position,
            TypeDefinition::Object(t) => t.position,
            TypeDefinition::Interface(t) => t.position,
            TypeDefinition::Union(t) => t.position,
            TypeDefinition::Enum(t) => t.position,
            TypeDefinition::InputObject(t) => t.position,
        }
    }

    pub(crate) fn with_description(mut self, description: Description<'a>) -> Self {
        match &mut self {
            TypeDefinition::Scalar(t) => t.description = description,
            TypeDefinition::Object(t) => t.description = description,
            TypeDefinition::Interface(t) => t.description = description,
            TypeDefinition::Union(t) => t.description = description,
            TypeDefinition::Enum(t) => t.description = description,
            TypeDefinition::InputObject(t) => t.description = description,
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExtension<'a> {
    Scalar(ScalarTypeExtension<'a>),
    Object(ObjectTypeExtension<'a>),
    Interface(InterfaceTypeExtension<'a>),
    Union(UnionTypeExtension<'a>),
    Enum(EnumTypeExtension<'a>),
    InputObject(InputObjectTypeExtension<'a>),
}

impl<'a> TypeExtension<'a> {
    pub fn name(&self) -> Txt<'a> {
        match self {
            TypeExtension::Scalar(t) => t.name,
            TypeExtension::Object(t) => t.name,
            TypeExtension::Interface(t) => t.name,
            TypeExtension::Union(t) => t.name,
            TypeExtension::Enum(t) => t.name,
            TypeExtension::InputObject(t) => t.name,
        }
    }

    pub fn position(&self) -> Pos {
        match self {
            TypeExtension::Scalar(t) => t.position,
            TypeExtension::Object(t) => t.position,
            TypeExtension::Interface(t) => t.position,
            TypeExtension::Union(t) => t.position,
            TypeExtension::Enum(t) => t.position,
            TypeExtension::InputObject(t) => t.position,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarType<'a> {
    pub position: Pos,
    pub description: Description<'a>,
    pub name: Txt<'a>,
    pub directives: Vec<Directive<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarTypeExtension<'a> {
    pub position: Pos,
    pub name: Txt<'a>,
    pub directives: Vec<Directive<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType<'a> {
    pub position: Pos,
    pub description: Description<'a>,
    pub name: Txt<'a>,
    pub implements_interfaces: Vec<Txt<'a>>,
    pub directives: Vec<Directive<'a>>,
    pub fields: Vec<Field<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTypeExtension<'a> {
    pub position: Pos,
    pub name: Txt<'a>,
    pub implements_interfaces: Vec<Txt<'a>>,
    pub directives: Vec<Directive<'a>>,
    pub fields: Vec<Field<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field<'a> {
    pub position: Pos,
    pub description: Description<'a>,
    pub name: Txt<'a>,
    pub arguments: Vec<InputValue<'a>>,
    pub field_type: Type<'a>,
    pub directives: Vec<Directive<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputValue<'a> {
    pub position: Pos,
    pub description: Description<'a>,
    pub name: Txt<'a>,
    pub value_type: Type<'a>,
    pub default_value: Option<Value<'a>>,
    pub directives: Vec<Directive<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceType<'a> {
    pub position: Pos,
    pub description: Description<'a>,
    pub name: Txt<'a>,
    pub directives: Vec<Directive<'a>>,
    pub fields: Vec<Field<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceTypeExtension<'a> {
    pub position: Pos,
    pub name: Txt<'a>,
    pub directives: Vec<Directive<'a>>,
    pub fields: Vec<Field<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionType<'a> {
    pub position: Pos,
    pub description: Description<'a>,
    pub name: Txt<'a>,
    pub directives: Vec<Directive<'a>>,
    pub types: Vec<Txt<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionTypeExtension<'a> {
    pub position: Pos,
    pub name: Txt<'a>,
    pub directives: Vec<Directive<'a>>,
    pub types: Vec<Txt<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumType<'a> {
    pub position: Pos,
    pub description: Description<'a>,
    pub name: Txt<'a>,
    pub directives: Vec<Directive<'a>>,
    pub values: Vec<EnumValue<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue<'a> {
    pub position: Pos,
    pub description: Description<'a>,
    pub name: Txt<'a>,
    pub directives: Vec<Directive<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumTypeExtension<'a> {
    pub position: Pos,
    pub name: Txt<'a>,
    pub directives: Vec<Directive<'a>>,
    pub values: Vec<EnumValue<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputObjectType<'a> {
    pub position: Pos,
    pub description: Description<'a>,
    pub name: Txt<'a>,
    pub directives: Vec<Directive<'a>>,
    pub fields: Vec<InputValue<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputObjectTypeExtension<'a> {
    pub position: Pos,
    pub name: Txt<'a>,
    pub directives: Vec<Directive<'a>>,
    pub fields: Vec<InputValue<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveLocation {
    // executable
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,

    // type_system
    Schema,
    Scalar,
    Object,
    FieldDefinition,
    ArgumentDefinition,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    InputFieldDefinition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveDefinition<'a> {
    pub position: Pos,
    pub description: Description<'a>,
    pub name: Txt<'a>,
    pub arguments: Vec<InputValue<'a>>,
    pub locations: Vec<DirectiveLocation>,
}

impl<'a> DirectiveDefinition<'a> {
    pub(crate) fn with_description(mut self, description: Description<'a>) -> Self {
        self.description = description;
        self
    }
}

impl DirectiveLocation {
    /// Returns GraphQL syntax compatible name of the directive location
    pub fn as_str(&self) -> &'static str {
        use self::DirectiveLocation::*;
        match *self {
            Query => "QUERY",
            Mutation => "MUTATION",
            Subscription => "SUBSCRIPTION",
            Field => "FIELD",
            FragmentDefinition => "FRAGMENT_DEFINITION",
            FragmentSpread => "FRAGMENT_SPREAD",
            InlineFragment => "INLINE_FRAGMENT",
            Schema => "SCHEMA",
            Scalar => "SCALAR",
            Object => "OBJECT",
            FieldDefinition => "FIELD_DEFINITION",
            ArgumentDefinition => "ARGUMENT_DEFINITION",
            Interface => "INTERFACE",
            Union => "UNION",
            Enum => "ENUM",
            EnumValue => "ENUM_VALUE",
            InputObject => "INPUT_OBJECT",
            InputFieldDefinition => "INPUT_FIELD_DEFINITION",
        }
    }

    /// Returns `true` if this location is for queries (execution)
    pub fn is_query(&self) -> bool {
        use self::DirectiveLocation::*;
        match *self {
            Query | Mutation | Subscription | Field | FragmentDefinition | FragmentSpread
            | InlineFragment => true,

            Schema | Scalar | Object | FieldDefinition | ArgumentDefinition | Interface | Union
            | Enum | EnumValue | InputObject | InputFieldDefinition => false,
        }
    }

    /// Returns `true` if this location is for schema
    pub fn is_schema(&self) -> bool {
        !self.is_query()
    }
}

#[derive(Debug, Error)]
#[error("invalid directive location")]
pub struct InvalidDirectiveLocation;

impl FromStr for DirectiveLocation {
    type Err = InvalidDirectiveLocation;
    fn from_str(s: &str) -> Result<DirectiveLocation, InvalidDirectiveLocation> {
        use self::DirectiveLocation::*;
        let val = match s {
            "QUERY" => Query,
            "MUTATION" => Mutation,
            "SUBSCRIPTION" => Subscription,
            "FIELD" => Field,
            "FRAGMENT_DEFINITION" => FragmentDefinition,
            "FRAGMENT_SPREAD" => FragmentSpread,
            "INLINE_FRAGMENT" => InlineFragment,
            "SCHEMA" => Schema,
            "SCALAR" => Scalar,
            "OBJECT" => Object,
            "FIELD_DEFINITION" => FieldDefinition,
            "ARGUMENT_DEFINITION" => ArgumentDefinition,
            "INTERFACE" => Interface,
            "UNION" => Union,
            "ENUM" => Enum,
            "ENUM_VALUE" => EnumValue,
            "INPUT_OBJECT" => InputObject,
            "INPUT_FIELD_DEFINITION" => InputFieldDefinition,
            _ => return Err(InvalidDirectiveLocation),
        };

        Ok(val)
    }
}
