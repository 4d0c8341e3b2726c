//! Wraps a canonical schema map in an OpenAPI envelope and parses it.
//!
//! Structural parsing of the schema grammar is left to `openapiv3`; this
//! module only builds the envelope, surfaces parser errors verbatim, and
//! checks that every local `$ref` names a schema in the same document.

use std::borrow::Borrow;
use std::collections::HashSet;

use openapiv3::{AdditionalProperties, OpenAPI, ReferenceOr, Schema, SchemaKind, Type};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::KindSchemaError;
use crate::types::{DefinitionName, COMPONENT_REF_PREFIX};

/// OpenAPI version written into the synthesized envelope.
pub const SYNTHESIZED_OPENAPI_VERSION: &str = "3.0.0";

/// Top-level schemas of a parsed document, in document order.
#[derive(Debug, Clone)]
pub struct ParsedComponents {
    schemas: Vec<(DefinitionName, ReferenceOr<Schema>)>,
}

impl ParsedComponents {
    pub fn iter(&self) -> impl Iterator<Item = (&DefinitionName, &ReferenceOr<Schema>)> {
        self.schemas.iter().map(|(name, schema)| (name, schema))
    }

    pub fn get(&self, short_name: &str) -> Option<&ReferenceOr<Schema>> {
        self.schemas
            .iter()
            .find(|(name, _)| name.short() == short_name)
            .map(|(_, schema)| schema)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Parse a canonical map of named schemas through the OpenAPI v3 parser.
///
/// # Errors
///
/// Returns `KindSchemaError::Parse` carrying the parser's message when the
/// envelope is rejected, or when a `$ref` does not resolve to a schema in
/// `components.schemas`.
pub fn synthesize(canonical: &Map<String, Value>) -> Result<ParsedComponents, KindSchemaError> {
    let envelope = json!({
        "openapi": SYNTHESIZED_OPENAPI_VERSION,
        "info": { "title": "kind", "version": "0.0.0" },
        "paths": {},
        "components": { "schemas": canonical },
    });

    let document: OpenAPI =
        serde_json::from_value(envelope).map_err(|e| KindSchemaError::parse(e.to_string()))?;

    let schemas: Vec<(DefinitionName, ReferenceOr<Schema>)> = document
        .components
        .map(|components| {
            components
                .schemas
                .into_iter()
                .map(|(name, schema)| (DefinitionName::new(name), schema))
                .collect()
        })
        .unwrap_or_default();

    let known: HashSet<&str> = schemas.iter().map(|(name, _)| name.short()).collect();
    for (_, schema) in &schemas {
        check_ref_or(schema, &known)?;
    }

    debug!(schemas = schemas.len(), "parsed synthesized OpenAPI document");
    Ok(ParsedComponents { schemas })
}

/// Name of the schema a local `#/components/schemas/<name>` pointer targets.
///
/// JSON Pointer escapes (`~1`, `~0`) are decoded.
pub fn local_target(reference: &str) -> Option<String> {
    reference
        .strip_prefix(COMPONENT_REF_PREFIX)
        .map(|name| name.replace("~1", "/").replace("~0", "~"))
}

fn check_reference(reference: &str, known: &HashSet<&str>) -> Result<(), KindSchemaError> {
    match local_target(reference) {
        Some(name) if known.contains(name.as_str()) => Ok(()),
        Some(name) => Err(KindSchemaError::parse(format!(
            "failed to resolve reference \"{}\": no schema named \"{}\"",
            reference, name
        ))),
        None => Err(KindSchemaError::parse(format!(
            "unsupported reference \"{}\": expected {}<name>",
            reference, COMPONENT_REF_PREFIX
        ))),
    }
}

fn check_ref_or<T: Borrow<Schema>>(
    node: &ReferenceOr<T>,
    known: &HashSet<&str>,
) -> Result<(), KindSchemaError> {
    match node {
        ReferenceOr::Reference { reference } => check_reference(reference, known),
        ReferenceOr::Item(schema) => check_schema(schema.borrow(), known),
    }
}

fn check_additional(
    additional: Option<&AdditionalProperties>,
    known: &HashSet<&str>,
) -> Result<(), KindSchemaError> {
    match additional {
        Some(AdditionalProperties::Schema(schema)) => check_ref_or(&**schema, known),
        _ => Ok(()),
    }
}

fn check_schema(schema: &Schema, known: &HashSet<&str>) -> Result<(), KindSchemaError> {
    match &schema.schema_kind {
        SchemaKind::Type(Type::Object(object)) => {
            for property in object.properties.values() {
                check_ref_or(property, known)?;
            }
            check_additional(object.additional_properties.as_ref(), known)
        }
        SchemaKind::Type(Type::Array(array)) => match &array.items {
            Some(items) => check_ref_or(items, known),
            None => Ok(()),
        },
        SchemaKind::Type(_) => Ok(()),
        SchemaKind::OneOf { one_of: members }
        | SchemaKind::AllOf { all_of: members }
        | SchemaKind::AnyOf { any_of: members } => {
            members.iter().try_for_each(|m| check_ref_or(m, known))
        }
        SchemaKind::Not { not } => check_ref_or(&**not, known),
        SchemaKind::Any(any) => {
            for property in any.properties.values() {
                check_ref_or(property, known)?;
            }
            check_additional(any.additional_properties.as_ref(), known)?;
            if let Some(items) = &any.items {
                check_ref_or(items, known)?;
            }
            for member in any.all_of.iter().chain(&any.any_of).chain(&any.one_of) {
                check_ref_or(member, known)?;
            }
            match &any.not {
                Some(not) => check_ref_or(&**not, known),
                None => Ok(()),
            }
        }
    }
}
