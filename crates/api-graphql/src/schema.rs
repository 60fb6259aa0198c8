//! Schema Assembly
//!
//! Parses the merged SDL document and registers every type into an
//! executable `async_graphql::dynamic::Schema`. Root fields named in the
//! bindings get a bridge resolver; everything else resolves as a property
//! of the parent JSON value.

use async_graphql::dynamic::{
    Enum, Field, FieldFuture, FieldValue, InputObject, InputValue, Object, Scalar, Schema, TypeRef,
};
use async_graphql::parser;
use async_graphql::parser::types::{
    BaseType, EnumType, InputObjectType, InputValueDefinition, ObjectType, ServiceDocument, Type,
    TypeDefinition, TypeKind, TypeSystemDefinition,
};
use scriptgate_core::application::ScriptBridge;
use scriptgate_core::{AppError, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

use crate::resolver::{bridge_resolver, property_resolver};
use crate::scalars::{is_string_input, LeafCodec};

/// Static field-to-resolver binding, declared once at startup.
///
/// This is configuration, not dynamic dispatch: the two enumerations list
/// which root fields are forwarded to the script.
#[derive(Debug, Clone, Default)]
pub struct FieldBindings {
    pub query_fields: Vec<String>,
    pub mutation_fields: Vec<String>,
}

impl FieldBindings {
    pub fn new(query_fields: &[&str], mutation_fields: &[&str]) -> Self {
        Self {
            query_fields: query_fields.iter().map(|s| s.to_string()).collect(),
            mutation_fields: mutation_fields.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn bound_fields(&self, type_name: &str) -> &[String] {
        match type_name {
            "Query" => &self.query_fields,
            "Mutation" => &self.mutation_fields,
            _ => &[],
        }
    }
}

/// Build the executable schema from merged SDL.
///
/// The bridge is stored in the schema context and shared by every bound
/// resolver. Duplicate type names keep the first definition; enumerated
/// fields missing from the SDL are logged and skipped.
pub fn build_schema(
    sdl: &str,
    bindings: &FieldBindings,
    bridge: Arc<ScriptBridge>,
) -> Result<Schema> {
    let doc = parser::parse_schema(sdl).map_err(|e| AppError::Schema(e.to_string()))?;

    warn_on_unbound_fields(&doc, bindings);

    let mut has_query = false;
    let mut seen: HashSet<String> = HashSet::new();

    let mut builder = Schema::build("Query", mutation_root(&doc).as_deref(), None::<&str>)
        .data(bridge);

    for definition in &doc.definitions {
        let TypeSystemDefinition::Type(positioned) = definition else {
            continue;
        };
        let type_def = &positioned.node;
        let name = type_def.name.node.to_string();

        if !seen.insert(name.clone()) {
            warn!(type_name = %name, "Duplicate type definition ignored");
            continue;
        }

        match &type_def.kind {
            TypeKind::Scalar => {
                builder = builder.register(convert_scalar(&name));
            }
            TypeKind::Enum(enum_type) => {
                builder = builder.register(convert_enum(&name, type_def, enum_type));
            }
            TypeKind::InputObject(input_type) => {
                builder = builder.register(convert_input_object(&name, type_def, input_type));
            }
            TypeKind::Object(object_type) => {
                if name == "Query" {
                    has_query = true;
                }
                builder = builder.register(convert_object(&name, type_def, object_type, bindings));
            }
            _ => {
                return Err(AppError::Schema(format!(
                    "unsupported type definition kind for '{name}' (only object, input, enum and scalar are accepted)"
                )));
            }
        }
    }

    if !has_query {
        builder = builder.register(minimal_query());
    }

    builder.finish().map_err(|e| AppError::Schema(e.to_string()))
}

/// Name of the mutation root, if the document declares one.
fn mutation_root(doc: &ServiceDocument) -> Option<String> {
    doc.definitions.iter().find_map(|definition| {
        let TypeSystemDefinition::Type(positioned) = definition else {
            return None;
        };
        let type_def = &positioned.node;
        if matches!(type_def.kind, TypeKind::Object(_)) && type_def.name.node.as_str() == "Mutation" {
            Some("Mutation".to_string())
        } else {
            None
        }
    })
}

fn warn_on_unbound_fields(doc: &ServiceDocument, bindings: &FieldBindings) {
    for root in ["Query", "Mutation"] {
        let declared = declared_root_fields(doc, root);
        for bound in bindings.bound_fields(root) {
            if !declared.contains(bound.as_str()) {
                warn!(
                    root = %root,
                    field = %bound,
                    "Bound field is not declared in the SDL; it will not be served"
                );
            }
        }
    }
}

fn declared_root_fields(doc: &ServiceDocument, root: &str) -> HashSet<String> {
    let mut fields = HashSet::new();
    for definition in &doc.definitions {
        let TypeSystemDefinition::Type(positioned) = definition else {
            continue;
        };
        let type_def = &positioned.node;
        if type_def.name.node.as_str() != root {
            continue;
        }
        if let TypeKind::Object(object_type) = &type_def.kind {
            for field in &object_type.fields {
                fields.insert(field.node.name.node.to_string());
            }
        }
    }
    fields
}

fn convert_scalar(name: &str) -> Scalar {
    let scalar = Scalar::new(name.to_string());
    match name {
        // String-kind check only; content is forwarded verbatim
        "AWSDate" | "AWSDateTime" => scalar.validator(is_string_input),
        _ => scalar,
    }
}

fn convert_enum(name: &str, type_def: &TypeDefinition, enum_type: &EnumType) -> Enum {
    let mut output = Enum::new(name.to_string());
    if let Some(description) = &type_def.description {
        output = output.description(description.node.clone());
    }
    for value in &enum_type.values {
        output = output.item(value.node.value.node.to_string());
    }
    output
}

fn convert_input_object(
    name: &str,
    type_def: &TypeDefinition,
    input_type: &InputObjectType,
) -> InputObject {
    let mut output = InputObject::new(name.to_string());
    if let Some(description) = &type_def.description {
        output = output.description(description.node.clone());
    }
    for field in &input_type.fields {
        output = output.field(convert_input_value(&field.node));
    }
    output
}

fn convert_object(
    name: &str,
    type_def: &TypeDefinition,
    object_type: &ObjectType,
    bindings: &FieldBindings,
) -> Object {
    let bound = bindings.bound_fields(name);
    let mut output = Object::new(name.to_string());
    if let Some(description) = &type_def.description {
        output = output.description(description.node.clone());
    }

    for field in &object_type.fields {
        let field_def = &field.node;
        let field_name = field_def.name.node.to_string();
        let type_ref = to_type_ref(&field_def.ty.node);

        let mut output_field = if bound.iter().any(|b| b == &field_name) {
            Field::new(
                field_name.clone(),
                type_ref,
                bridge_resolver(field_name.clone()),
            )
        } else {
            let codec = LeafCodec::for_type_name(base_type_name(&field_def.ty.node));
            Field::new(
                field_name.clone(),
                type_ref,
                property_resolver(field_name.clone(), codec),
            )
        };

        for argument in &field_def.arguments {
            output_field = output_field.argument(convert_input_value(&argument.node));
        }
        if let Some(description) = &field_def.description {
            output_field = output_field.description(description.node.clone());
        }

        output = output.field(output_field);
    }

    output
}

fn convert_input_value(input_def: &InputValueDefinition) -> InputValue {
    let mut input = InputValue::new(
        input_def.name.node.to_string(),
        to_type_ref(&input_def.ty.node),
    );
    if let Some(default) = &input_def.default_value {
        input = input.default_value(default.node.clone());
    }
    if let Some(description) = &input_def.description {
        input = input.description(description.node.clone());
    }
    input
}

/// The minimal Query type registered when the SDL declares none
/// (GraphQL requires a query root even for mutation-only schemas).
fn minimal_query() -> Object {
    Object::new("Query").field(Field::new(
        "_",
        TypeRef::named(TypeRef::BOOLEAN),
        |_ctx| FieldFuture::new(async move { Ok(Some(FieldValue::value(true))) }),
    ))
}

fn to_type_ref(ty: &Type) -> TypeRef {
    let base = match &ty.base {
        BaseType::Named(name) => TypeRef::named(name.to_string()),
        BaseType::List(inner) => TypeRef::List(Box::new(to_type_ref(inner))),
    };
    if ty.nullable {
        base
    } else {
        TypeRef::NonNull(Box::new(base))
    }
}

fn base_type_name(ty: &Type) -> &str {
    match &ty.base {
        BaseType::Named(name) => name.as_str(),
        BaseType::List(inner) => base_type_name(inner),
    }
}
