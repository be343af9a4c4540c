//! Two-pass schema build: declare every name first, then populate bodies
//! and merge extensions. The first error aborts with full context.

use std::collections::HashMap;

use crate::common::Value as AstValue;
use crate::model::{
    DirectiveDef, EnumDef, EnumValueDef, InputField, InputObjectDef, InterfaceDef, ObjectDef,
    OutputField, ScalarDef, Schema, SchemaError, TypeKind, TypeRef, UnionDef,
};
use crate::position::Pos;
use crate::response::{Value, ValueKind};
use crate::schema::{
    Definition, Description, Directive, DirectiveLocation, Document, TypeDefinition, TypeExtension,
};

/// Builds the model from a parsed document. Validation is a separate pass;
/// this only resolves declarations, bodies, and extensions.
pub fn build(document: &Document) -> Result<Schema, SchemaError> {
    let mut builder = SchemaBuilder::new();
    builder.declare(document)?;
    builder.populate(document)?;
    Ok(builder.finish())
}

#[derive(Debug, Clone, Copy)]
struct Declared {
    kind: TypeKind,
    pos: Pos,
    has_base: bool,
}

struct SchemaBuilder {
    schema: Schema,
    declared: HashMap<String, Declared>,
    directive_pos: HashMap<String, Pos>,
    schema_def_pos: Option<Pos>,
}

fn kind_of(def: &TypeDefinition) -> TypeKind {
    match def {
        TypeDefinition::Scalar(_) => TypeKind::Scalar,
        TypeDefinition::Object(_) => TypeKind::Object,
        TypeDefinition::Interface(_) => TypeKind::Interface,
        TypeDefinition::Union(_) => TypeKind::Union,
        TypeDefinition::Enum(_) => TypeKind::Enum,
        TypeDefinition::InputObject(_) => TypeKind::InputObject,
    }
}

fn kind_of_extension(ext: &TypeExtension) -> TypeKind {
    match ext {
        TypeExtension::Scalar(_) => TypeKind::Scalar,
        TypeExtension::Object(_) => TypeKind::Object,
        TypeExtension::Interface(_) => TypeKind::Interface,
        TypeExtension::Union(_) => TypeKind::Union,
        TypeExtension::Enum(_) => TypeKind::Enum,
        TypeExtension::InputObject(_) => TypeKind::InputObject,
    }
}

fn owned(description: &Description) -> Option<String> {
    description.as_ref().map(|text| text.as_ref().to_owned())
}

/// The reason string of an applied `@deprecated`, falling back to the
/// standard reason when the argument is omitted.
fn deprecation(directives: &[Directive]) -> Option<String> {
    directives
        .iter()
        .find(|directive| directive.name == "deprecated")
        .map(|directive| {
            directive
                .arguments
                .iter()
                .find(|(name, _)| *name == "reason")
                .and_then(|(_, value)| match value {
                    AstValue::String(reason) => Some(reason.as_ref().to_owned()),
                    _ => None,
                })
                .unwrap_or_else(|| "No longer supported".to_owned())
        })
}

impl SchemaBuilder {
    /// Starts from the built-in schema: the five standard scalars and the
    /// three standard directives.
    fn new() -> SchemaBuilder {
        let mut builder = SchemaBuilder {
            schema: Schema::default(),
            declared: HashMap::new(),
            directive_pos: HashMap::new(),
            schema_def_pos: None,
        };
        for name in &["Int", "Float", "String", "Boolean", "ID"] {
            builder.schema.scalars.push(ScalarDef {
                name: (*name).to_owned(),
                description: None,
                position: Pos::default(),
            });
            builder.schema.kinds.insert((*name).to_owned(), TypeKind::Scalar);
            builder.schema.positions.insert((*name).to_owned(), Pos::default());
            builder.declared.insert(
                (*name).to_owned(),
                Declared {
                    kind: TypeKind::Scalar,
                    pos: Pos::default(),
                    has_base: true,
                },
            );
        }
        let condition = |name: &str| InputField {
            name: "if".to_owned(),
            description: Some(format!("{} when true.", name)),
            field_type: TypeRef::non_null("Boolean"),
            default: None,
            position: Pos::default(),
        };
        builder.push_built_in_directive(
            "skip",
            "Directs the executor to skip this field or fragment when the `if` argument is true.",
            vec![condition("Skipped")],
            vec![
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
        );
        builder.push_built_in_directive(
            "include",
            "Directs the executor to include this field or fragment only when the `if` argument is true.",
            vec![condition("Included")],
            vec![
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
        );
        builder.push_built_in_directive(
            "deprecated",
            "Marks an element of a GraphQL schema as no longer supported.",
            vec![InputField {
                name: "reason".to_owned(),
                description: None,
                field_type: TypeRef::named("String"),
                default: Some(Value::string("No longer supported")),
                position: Pos::default(),
            }],
            vec![
                DirectiveLocation::FieldDefinition,
                DirectiveLocation::EnumValue,
            ],
        );
        builder
    }

    fn push_built_in_directive(
        &mut self,
        name: &str,
        description: &str,
        arguments: Vec<InputField>,
        locations: Vec<DirectiveLocation>,
    ) {
        self.schema.directives.push(DirectiveDef {
            name: name.to_owned(),
            description: Some(description.to_owned()),
            locations,
            arguments,
            position: Pos::default(),
        });
        self.directive_pos.insert(name.to_owned(), Pos::default());
    }

    /// Pass 1: record every name and kind. Catches duplicates, a base
    /// declared after one of its extensions, extensions of unknown types,
    /// and extensions whose kind disagrees with their base.
    fn declare(&mut self, document: &Document) -> Result<(), SchemaError> {
        for definition in &document.definitions {
            match definition {
                Definition::Schema(def) => {
                    if let Some(prior) = self.schema_def_pos {
                        return Err(SchemaError::DuplicateDefinition {
                            name: "schema".to_owned(),
                            pos: def.position,
                            prior,
                        });
                    }
                    self.schema_def_pos = Some(def.position);
                }
                Definition::Type(def) => {
                    self.declare_type(def.name(), kind_of(def), def.position(), true)?;
                }
                Definition::TypeExtension(ext) => {
                    self.declare_type(ext.name(), kind_of_extension(ext), ext.position(), false)?;
                }
                Definition::Directive(def) => {
                    if let Some(&prior) = self.directive_pos.get(def.name) {
                        return Err(SchemaError::DuplicateDefinition {
                            name: format!("@{}", def.name),
                            pos: def.position,
                            prior,
                        });
                    }
                    self.directive_pos.insert(def.name.to_owned(), def.position);
                }
                Definition::Operation(def) => {
                    return Err(SchemaError::ExecutableDefinition { pos: def.position });
                }
                Definition::Fragment(def) => {
                    return Err(SchemaError::ExecutableDefinition { pos: def.position });
                }
                Definition::SelectionSet(set) => {
                    return Err(SchemaError::ExecutableDefinition { pos: set.span.0 });
                }
            }
        }
        // every extension needs a base somewhere in the document
        for definition in &document.definitions {
            if let Definition::TypeExtension(ext) = definition {
                let known = self
                    .declared
                    .get(ext.name())
                    .map(|decl| decl.has_base)
                    .unwrap_or(false);
                if !known {
                    return Err(SchemaError::UndefinedExtension {
                        name: ext.name().to_owned(),
                        pos: ext.position(),
                    });
                }
            }
        }
        Ok(())
    }

    fn declare_type(
        &mut self,
        name: &str,
        kind: TypeKind,
        pos: Pos,
        is_base: bool,
    ) -> Result<(), SchemaError> {
        match self.declared.get_mut(name) {
            None => {
                self.declared.insert(
                    name.to_owned(),
                    Declared {
                        kind,
                        pos,
                        has_base: is_base,
                    },
                );
                if is_base {
                    self.schema.kinds.insert(name.to_owned(), kind);
                    self.schema.positions.insert(name.to_owned(), pos);
                }
                Ok(())
            }
            Some(existing) => {
                if is_base {
                    // covers both a second base declaration and a base that
                    // shows up after one of its extensions
                    return Err(SchemaError::DuplicateDefinition {
                        name: name.to_owned(),
                        pos,
                        prior: existing.pos,
                    });
                }
                if existing.kind != kind {
                    return Err(SchemaError::KindMismatch {
                        name: name.to_owned(),
                        pos,
                        expected: existing.kind.as_str(),
                        got: kind.as_str(),
                    });
                }
                Ok(())
            }
        }
    }

    /// Pass 2: populate bodies in declaration order and merge extensions
    /// into their bases as they appear.
    fn populate(&mut self, document: &Document) -> Result<(), SchemaError> {
        for definition in &document.definitions {
            match definition {
                Definition::Schema(def) => {
                    self.schema.roots.query = def.query.map(str::to_owned);
                    self.schema.roots.mutation = def.mutation.map(str::to_owned);
                    self.schema.roots.subscription = def.subscription.map(str::to_owned);
                }
                Definition::Type(def) => self.populate_type(def)?,
                Definition::TypeExtension(ext) => self.merge_extension(ext)?,
                Definition::Directive(def) => {
                    let owner = format!("@{}", def.name);
                    let mut arguments = Vec::with_capacity(def.arguments.len());
                    for argument in &def.arguments {
                        let converted = self.input_field(&owner, argument)?;
                        check_unique_input(&owner, &arguments, &converted)?;
                        arguments.push(converted);
                    }
                    self.schema.directives.push(DirectiveDef {
                        name: def.name.to_owned(),
                        description: owned(&def.description),
                        locations: def.locations.clone(),
                        arguments,
                        position: def.position,
                    });
                }
                // rejected in pass 1
                Definition::Operation(_)
                | Definition::Fragment(_)
                | Definition::SelectionSet(_) => {}
            }
        }
        Ok(())
    }

    fn populate_type(&mut self, def: &TypeDefinition) -> Result<(), SchemaError> {
        match def {
            TypeDefinition::Scalar(def) => {
                self.schema.scalars.push(ScalarDef {
                    name: def.name.to_owned(),
                    description: owned(&def.description),
                    position: def.position,
                });
            }
            TypeDefinition::Object(def) => {
                let mut interfaces = Vec::with_capacity(def.implements_interfaces.len());
                for interface in &def.implements_interfaces {
                    if interfaces.iter().any(|existing| existing == interface) {
                        return Err(SchemaError::DuplicateDefinition {
                            name: format!("{} implements {}", def.name, interface),
                            pos: def.position,
                            prior: def.position,
                        });
                    }
                    interfaces.push((*interface).to_owned());
                }
                let mut fields: Vec<OutputField> = Vec::with_capacity(def.fields.len());
                for field in &def.fields {
                    let converted = self.output_field(def.name, field)?;
                    check_unique_output(def.name, &fields, &converted)?;
                    fields.push(converted);
                }
                self.schema.objects.push(ObjectDef {
                    name: def.name.to_owned(),
                    description: owned(&def.description),
                    interfaces,
                    fields,
                    position: def.position,
                });
            }
            TypeDefinition::Interface(def) => {
                let mut fields: Vec<OutputField> = Vec::with_capacity(def.fields.len());
                for field in &def.fields {
                    let converted = self.output_field(def.name, field)?;
                    check_unique_output(def.name, &fields, &converted)?;
                    fields.push(converted);
                }
                self.schema.interfaces.push(InterfaceDef {
                    name: def.name.to_owned(),
                    description: owned(&def.description),
                    fields,
                    position: def.position,
                });
            }
            TypeDefinition::Union(def) => {
                let mut members: Vec<String> = Vec::with_capacity(def.types.len());
                for member in &def.types {
                    check_unique_member(def.name, &members, member, def.position)?;
                    members.push((*member).to_owned());
                }
                self.schema.unions.push(UnionDef {
                    name: def.name.to_owned(),
                    description: owned(&def.description),
                    members,
                    position: def.position,
                });
            }
            TypeDefinition::Enum(def) => {
                let mut values: Vec<EnumValueDef> = Vec::with_capacity(def.values.len());
                for value in &def.values {
                    let converted = EnumValueDef {
                        name: value.name.to_owned(),
                        description: owned(&value.description),
                        deprecation: deprecation(&value.directives),
                        position: value.position,
                    };
                    check_unique_enum_value(def.name, &values, &converted)?;
                    values.push(converted);
                }
                self.schema.enums.push(EnumDef {
                    name: def.name.to_owned(),
                    description: owned(&def.description),
                    values,
                    position: def.position,
                });
            }
            TypeDefinition::InputObject(def) => {
                let mut fields: Vec<InputField> = Vec::with_capacity(def.fields.len());
                for field in &def.fields {
                    let converted = self.input_field(def.name, field)?;
                    check_unique_input(def.name, &fields, &converted)?;
                    fields.push(converted);
                }
                self.schema.inputs.push(InputObjectDef {
                    name: def.name.to_owned(),
                    description: owned(&def.description),
                    fields,
                    position: def.position,
                });
            }
        }
        Ok(())
    }

    fn merge_extension(&mut self, ext: &TypeExtension) -> Result<(), SchemaError> {
        match ext {
            // scalar extensions only attach directives, nothing lands in the model
            TypeExtension::Scalar(_) => {}
            TypeExtension::Object(ext) => {
                let mut interfaces = Vec::new();
                let mut fields = Vec::new();
                for field in &ext.fields {
                    fields.push(self.output_field(ext.name, field)?);
                }
                let def = match self.schema.objects.iter_mut().find(|d| d.name == ext.name) {
                    Some(def) => def,
                    None => {
                        return Err(SchemaError::UndefinedExtension {
                            name: ext.name.to_owned(),
                            pos: ext.position,
                        })
                    }
                };
                for interface in &ext.implements_interfaces {
                    let mut seen = def.interfaces.iter().chain(interfaces.iter());
                    if !seen.any(|existing| existing == interface) {
                        interfaces.push((*interface).to_owned());
                    }
                }
                def.interfaces.append(&mut interfaces);
                for field in fields {
                    check_unique_output(&def.name, &def.fields, &field)?;
                    def.fields.push(field);
                }
            }
            TypeExtension::Interface(ext) => {
                let mut fields = Vec::new();
                for field in &ext.fields {
                    fields.push(self.output_field(ext.name, field)?);
                }
                let def = match self.schema.interfaces.iter_mut().find(|d| d.name == ext.name) {
                    Some(def) => def,
                    None => {
                        return Err(SchemaError::UndefinedExtension {
                            name: ext.name.to_owned(),
                            pos: ext.position,
                        })
                    }
                };
                for field in fields {
                    check_unique_output(&def.name, &def.fields, &field)?;
                    def.fields.push(field);
                }
            }
            TypeExtension::Union(ext) => {
                let def = match self.schema.unions.iter_mut().find(|d| d.name == ext.name) {
                    Some(def) => def,
                    None => {
                        return Err(SchemaError::UndefinedExtension {
                            name: ext.name.to_owned(),
                            pos: ext.position,
                        })
                    }
                };
                for member in &ext.types {
                    check_unique_member(&def.name, &def.members, member, ext.position)?;
                    def.members.push((*member).to_owned());
                }
            }
            TypeExtension::Enum(ext) => {
                let def = match self.schema.enums.iter_mut().find(|d| d.name == ext.name) {
                    Some(def) => def,
                    None => {
                        return Err(SchemaError::UndefinedExtension {
                            name: ext.name.to_owned(),
                            pos: ext.position,
                        })
                    }
                };
                for value in &ext.values {
                    let converted = EnumValueDef {
                        name: value.name.to_owned(),
                        description: owned(&value.description),
                        deprecation: deprecation(&value.directives),
                        position: value.position,
                    };
                    check_unique_enum_value(&def.name, &def.values, &converted)?;
                    def.values.push(converted);
                }
            }
            TypeExtension::InputObject(ext) => {
                let mut fields = Vec::new();
                for field in &ext.fields {
                    fields.push(self.input_field(ext.name, field)?);
                }
                let def = match self.schema.inputs.iter_mut().find(|d| d.name == ext.name) {
                    Some(def) => def,
                    None => {
                        return Err(SchemaError::UndefinedExtension {
                            name: ext.name.to_owned(),
                            pos: ext.position,
                        })
                    }
                };
                for field in fields {
                    check_unique_input(&def.name, &def.fields, &field)?;
                    def.fields.push(field);
                }
            }
        }
        Ok(())
    }

    fn output_field(
        &self,
        type_name: &str,
        field: &crate::schema::Field,
    ) -> Result<OutputField, SchemaError> {
        let owner = format!("{}.{}", type_name, field.name);
        let mut arguments = Vec::with_capacity(field.arguments.len());
        for argument in &field.arguments {
            let converted = self.input_field(&owner, argument)?;
            check_unique_input(&owner, &arguments, &converted)?;
            arguments.push(converted);
        }
        Ok(OutputField {
            name: field.name.to_owned(),
            description: owned(&field.description),
            arguments,
            field_type: TypeRef::from_ast(&field.field_type),
            deprecation: deprecation(&field.directives),
            interface_field: false,
            position: field.position,
        })
    }

    fn input_field(
        &self,
        owner: &str,
        input: &crate::schema::InputValue,
    ) -> Result<InputField, SchemaError> {
        let default = match &input.default_value {
            Some(value) => {
                let name = format!("{}.{}", owner, input.name);
                Some(default_value(&name, input.position, value)?)
            }
            None => None,
        };
        Ok(InputField {
            name: input.name.to_owned(),
            description: owned(&input.description),
            field_type: TypeRef::from_ast(&input.value_type),
            default,
            position: input.position,
        })
    }

    fn finish(mut self) -> Schema {
        // without a schema block, conventionally named objects become roots
        if self.schema_def_pos.is_none() {
            for (slot, name) in &mut [
                (&mut self.schema.roots.query, "Query"),
                (&mut self.schema.roots.mutation, "Mutation"),
                (&mut self.schema.roots.subscription, "Subscription"),
            ] {
                if self.schema.kinds.get(*name) == Some(&TypeKind::Object) {
                    **slot = Some((*name).to_owned());
                }
            }
        }
        self.schema
    }
}

/// Converts a default-value literal into a response value. Variables are
/// illegal here, and object literals must not repeat keys.
fn default_value(name: &str, pos: Pos, value: &AstValue) -> Result<Value, SchemaError> {
    Ok(match value {
        AstValue::Variable(var) => {
            return Err(SchemaError::InvalidDefault {
                name: name.to_owned(),
                pos,
                reason: format!("variable `${}` is not allowed in a default value", var),
            });
        }
        AstValue::Int(v) => Value::Int(*v),
        AstValue::Float(v) => Value::Float(v.into_inner()),
        AstValue::String(v) => Value::string(v.as_ref()),
        AstValue::Boolean(v) => Value::Bool(*v),
        AstValue::Null => Value::Null,
        AstValue::Enum(v) => Value::enum_value(*v),
        AstValue::List(items) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                list.push(default_value(name, pos, item)?);
            }
            Value::List(list)
        }
        AstValue::Object(fields) => {
            let mut map = Value::new(ValueKind::Map);
            for (key, item) in fields {
                let converted = default_value(name, pos, item)?;
                if map.insert(*key, converted).is_err() {
                    return Err(SchemaError::InvalidDefault {
                        name: name.to_owned(),
                        pos,
                        reason: format!("duplicate field `{}`", key),
                    });
                }
            }
            map
        }
    })
}

fn check_unique_output(
    type_name: &str,
    existing: &[OutputField],
    field: &OutputField,
) -> Result<(), SchemaError> {
    if let Some(prior) = existing.iter().find(|f| f.name == field.name) {
        return Err(SchemaError::DuplicateDefinition {
            name: format!("{}.{}", type_name, field.name),
            pos: field.position,
            prior: prior.position,
        });
    }
    Ok(())
}

fn check_unique_input(
    owner: &str,
    existing: &[InputField],
    field: &InputField,
) -> Result<(), SchemaError> {
    if let Some(prior) = existing.iter().find(|f| f.name == field.name) {
        return Err(SchemaError::DuplicateDefinition {
            name: format!("{}.{}", owner, field.name),
            pos: field.position,
            prior: prior.position,
        });
    }
    Ok(())
}

fn check_unique_enum_value(
    type_name: &str,
    existing: &[EnumValueDef],
    value: &EnumValueDef,
) -> Result<(), SchemaError> {
    if let Some(prior) = existing.iter().find(|v| v.name == value.name) {
        return Err(SchemaError::DuplicateDefinition {
            name: format!("{}.{}", type_name, value.name),
            pos: value.position,
            prior: prior.position,
        });
    }
    Ok(())
}

fn check_unique_member(
    union_name: &str,
    existing: &[String],
    member: &str,
    pos: Pos,
) -> Result<(), SchemaError> {
    if existing.iter().any(|m| m == member) {
        return Err(SchemaError::DuplicateDefinition {
            name: format!("{}.{}", union_name, member),
            pos,
            prior: pos,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::build;
    use crate::model::{Modifier, SchemaError, TypeKind};
    use crate::response::Value;
    use crate::schema::parse_schema;

    fn model(sdl: &str) -> crate::model::Schema {
        build(&parse_schema(sdl).unwrap()).unwrap()
    }

    fn err(sdl: &str) -> SchemaError {
        build(&parse_schema(sdl).unwrap()).unwrap_err()
    }

    #[test]
    fn minimal_schema() {
        let schema = model("type Query { hello: String }");
        assert_eq!(schema.objects.len(), 1);
        let query = &schema.objects[0];
        assert_eq!(query.name, "Query");
        assert_eq!(query.fields[0].name, "hello");
        assert_eq!(query.fields[0].field_type.name, "String");
        assert!(query.fields[0].field_type.is_nullable());
        assert_eq!(schema.roots.query.as_deref(), Some("Query"));
        assert_eq!(schema.roots.mutation, None);
    }

    #[test]
    fn built_ins_are_seeded() {
        let schema = model("type Query { x: Int }");
        for name in &["Int", "Float", "String", "Boolean", "ID"] {
            assert_eq!(schema.type_kind(name), Some(TypeKind::Scalar));
        }
        assert!(schema.directive("skip").is_some());
        assert!(schema.directive("include").is_some());
        assert_eq!(
            schema.directive("deprecated").unwrap().arguments[0].default,
            Some(Value::string("No longer supported"))
        );
    }

    #[test]
    fn list_modifiers() {
        let schema = model("type Q { xs: [Int!]! }");
        assert_eq!(
            schema.objects[0].fields[0].field_type.modifiers,
            vec![Modifier::List]
        );
    }

    #[test]
    fn default_values_convert() {
        let schema = model("input I { n: Int = 3 }");
        assert_eq!(
            schema.inputs[0].fields[0].default,
            Some(Value::Int(3))
        );

        let schema = model(
            "input P { x: Float = 1.5 s: String = \"hi\" c: Color = RED b: Boolean = true \
             n: Int = null xs: [Int] = [1, 2] o: P2 = {a: 1} }\n\
             enum Color { RED }\ninput P2 { a: Int }",
        );
        let fields = &schema.inputs[0].fields;
        assert_eq!(fields[0].default, Some(Value::Float(1.5)));
        assert_eq!(fields[1].default, Some(Value::string("hi")));
        assert_eq!(fields[2].default, Some(Value::enum_value("RED")));
        assert_eq!(fields[3].default, Some(Value::Bool(true)));
        assert_eq!(fields[4].default, Some(Value::Null));
        assert_eq!(
            fields[5].default,
            Some(Value::List(vec![Value::Int(1), Value::Int(2)]))
        );
        let map = fields[6].default.as_ref().unwrap();
        assert_eq!(map.get("a"), Some(&Value::Int(1)));
    }

    #[test]
    fn duplicate_object_keys_in_default_fail() {
        match err("input I { o: I2 = {a: 1, a: 2} }\ninput I2 { a: Int }") {
            SchemaError::InvalidDefault { name, reason, .. } => {
                assert_eq!(name, "I.o");
                assert!(reason.contains("duplicate"));
            }
            other => panic!("expected InvalidDefault, got {:?}", other),
        }
    }

    #[test]
    fn extensions_append_in_order() {
        let schema = model(
            "type Query { a: Int }\n\
             extend type Query { b: Int }\n\
             extend type Query { c: Int }",
        );
        let names: Vec<_> = schema.objects[0]
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn extension_merges_interfaces_and_members() {
        let schema = model(
            "interface N { id: ID }\ninterface M { id: ID }\n\
             type T implements N { id: ID }\n\
             extend type T implements M\n\
             union U = A\ntype A { x: Int }\ntype B { x: Int }\n\
             extend union U = B\n\
             enum E { ONE }\nextend enum E { TWO }\n\
             type Query { t: T }",
        );
        assert_eq!(schema.object("T").unwrap().interfaces, vec!["N", "M"]);
        assert_eq!(schema.union_def("U").unwrap().members, vec!["A", "B"]);
        let values: Vec<_> = schema.enum_def("E").unwrap().values.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(values, vec!["ONE", "TWO"]);
    }

    #[test]
    fn duplicate_names_fail() {
        match err("type T { a: Int }\nscalar T") {
            SchemaError::DuplicateDefinition { name, .. } => assert_eq!(name, "T"),
            other => panic!("expected DuplicateDefinition, got {:?}", other),
        }
        match err("scalar Int") {
            SchemaError::DuplicateDefinition { name, .. } => assert_eq!(name, "Int"),
            other => panic!("expected DuplicateDefinition, got {:?}", other),
        }
        match err("type T { a: Int a: Int }") {
            SchemaError::DuplicateDefinition { name, .. } => assert_eq!(name, "T.a"),
            other => panic!("expected DuplicateDefinition, got {:?}", other),
        }
        match err("type T { a: Int }\nextend type T { a: String }") {
            SchemaError::DuplicateDefinition { name, .. } => assert_eq!(name, "T.a"),
            other => panic!("expected DuplicateDefinition, got {:?}", other),
        }
    }

    #[test]
    fn extension_ordering_rules() {
        match err("extend type T { a: Int }\ntype T { b: Int }") {
            SchemaError::DuplicateDefinition { name, .. } => assert_eq!(name, "T"),
            other => panic!("expected DuplicateDefinition, got {:?}", other),
        }
        match err("type Query { a: Int }\nextend type Missing { b: Int }") {
            SchemaError::UndefinedExtension { name, .. } => assert_eq!(name, "Missing"),
            other => panic!("expected UndefinedExtension, got {:?}", other),
        }
        match err("enum E { A }\nextend type E { b: Int }") {
            SchemaError::KindMismatch { name, .. } => assert_eq!(name, "E"),
            other => panic!("expected KindMismatch, got {:?}", other),
        }
    }

    #[test]
    fn variables_in_defaults_fail() {
        // the grammar already rejects `$var` in schema default values
        assert!(parse_schema("input I { n: Int = $var }").is_err());
    }

    #[test]
    fn executable_definitions_rejected() {
        match err("type Query { a: Int }\nquery Q { a }") {
            SchemaError::ExecutableDefinition { .. } => {}
            other => panic!("expected ExecutableDefinition, got {:?}", other),
        }
    }

    #[test]
    fn deprecation_and_descriptions_flow() {
        let schema = model(
            "\"Root\" type Query {\n\
             \"says hello\" hello: String @deprecated(reason: \"gone\")\n\
             old: Int @deprecated\n\
             }\n\
             enum E { KEEP \"docs\" DROP @deprecated }",
        );
        let query = schema.object("Query").unwrap();
        assert_eq!(query.description.as_deref(), Some("Root"));
        assert_eq!(query.fields[0].description.as_deref(), Some("says hello"));
        assert_eq!(query.fields[0].deprecation.as_deref(), Some("gone"));
        assert_eq!(
            query.fields[1].deprecation.as_deref(),
            Some("No longer supported")
        );
        let e = schema.enum_def("E").unwrap();
        assert_eq!(e.values[0].deprecation, None);
        assert_eq!(e.values[1].description.as_deref(), Some("docs"));
        assert_eq!(
            e.values[1].deprecation.as_deref(),
            Some("No longer supported")
        );
    }

    #[test]
    fn explicit_roots_override_convention() {
        let schema = model("schema { query: Q }\ntype Q { a: Int }\ntype Mutation { b: Int }");
        assert_eq!(schema.roots.query.as_deref(), Some("Q"));
        // explicit schema block means no implicit mutation root
        assert_eq!(schema.roots.mutation, None);
    }

    #[test]
    fn build_is_idempotent() {
        let sdl = "interface N { id: ID! }\n\
                   type Query implements N { id: ID! list: [Int!] }\n\
                   extend type Query { extra: String }\n\
                   input I { n: Int = 3 }\n\
                   union U = Query\n\
                   enum E { A B }";
        let first = model(sdl);
        let second = model(sdl);
        assert_eq!(first, second);
    }
}
