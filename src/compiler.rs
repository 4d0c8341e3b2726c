//! Schema tree compilation into the namespaced target dialect.
//!
//! Every parsed node is rewritten into a [`SchemaNode`]. Local references
//! `#/components/schemas/X` become references to `<qualifier>.X` and are
//! recorded as dependencies of the definition being compiled. Referenced
//! definitions are not inlined; each top-level entry compiles on its own.
//!
//! # additionalProperties
//!
//! | Input | Result |
//! |-------|--------|
//! | absent | `None` |
//! | `true` / `false` | `Allowed(bool)` |
//! | schema | `Typed(schema)`, dependencies merged |
//! | `x-kubernetes-preserve-unknown-fields: true` | `Allowed(true)`, whatever else is present |

use std::borrow::Borrow;
use std::collections::BTreeSet;

use openapiv3::{
    AnySchema, ArrayType, IntegerType, NumberType, ObjectType, ReferenceOr, Schema, SchemaData,
    SchemaKind, StringType, Type, VariantOrUnknownOrEmpty,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::node::{
    AdditionalProperties, CompiledDefinition, CompositeOp, DefinitionMap, Facets, Origin,
    SchemaNode,
};
use crate::synthesize::{local_target, ParsedComponents};
use crate::types::{Qualifier, PRESERVE_UNKNOWN_FIELDS};

/// Compile every top-level schema under `qualifier`.
///
/// Keys of the result are `<qualifier>.<name>`; dependency lists are sorted
/// and deduplicated, and absent when empty.
pub fn compile_all(parsed: &ParsedComponents, qualifier: &Qualifier) -> DefinitionMap {
    let compiled: DefinitionMap = parsed
        .iter()
        .map(|(name, node)| {
            let (schema, dependencies) = compile_node(node, qualifier);
            let key = qualifier.qualify(name.short());
            trace!(definition = %key, dependencies = dependencies.len(), "compiled definition");
            let definition =
                CompiledDefinition::new(schema, dependencies, Origin::Declared(name.clone()));
            (key, definition)
        })
        .collect();
    debug!(%qualifier, definitions = compiled.len(), "compiled schema definitions");
    compiled
}

/// Compile one node, returning it with the qualified names it references.
pub fn compile_node<T: Borrow<Schema>>(
    node: &ReferenceOr<T>,
    qualifier: &Qualifier,
) -> (SchemaNode, BTreeSet<String>) {
    let mut compiler = NodeCompiler {
        qualifier,
        dependencies: BTreeSet::new(),
    };
    let schema = compiler.compile_ref_or(node);
    (schema, compiler.dependencies)
}

/// Convert a length or count bound, saturating at the target's maximum.
pub fn clamp_bound(value: Option<usize>) -> Option<i64> {
    value.map(|v| i64::try_from(v).unwrap_or(i64::MAX))
}

/// Dependencies are collected per call; nothing is shared between definitions.
struct NodeCompiler<'a> {
    qualifier: &'a Qualifier,
    dependencies: BTreeSet<String>,
}

impl NodeCompiler<'_> {
    fn compile_ref_or<T: Borrow<Schema>>(&mut self, node: &ReferenceOr<T>) -> SchemaNode {
        match node {
            ReferenceOr::Reference { reference } => self.compile_reference(reference),
            ReferenceOr::Item(schema) => self.compile_schema(schema.borrow()),
        }
    }

    fn compile_reference(&mut self, reference: &str) -> SchemaNode {
        // Anything that is not a component pointer was rejected during synthesis.
        let target = local_target(reference).unwrap_or_else(|| reference.to_string());
        let qualified = self.qualifier.qualify(&target);
        self.dependencies.insert(qualified.clone());
        SchemaNode::Reference(qualified)
    }

    fn compile_members(&mut self, members: &[ReferenceOr<Schema>]) -> Vec<SchemaNode> {
        members.iter().map(|m| self.compile_ref_or(m)).collect()
    }

    fn compile_schema(&mut self, schema: &Schema) -> SchemaNode {
        let facets = data_facets(&schema.schema_data);
        match &schema.schema_kind {
            SchemaKind::Type(typ) => self.compile_type(typ, facets),
            SchemaKind::AllOf { all_of } => self.composite(facets, CompositeOp::AllOf, all_of),
            SchemaKind::AnyOf { any_of } => self.composite(facets, CompositeOp::AnyOf, any_of),
            SchemaKind::OneOf { one_of } => self.composite(facets, CompositeOp::OneOf, one_of),
            SchemaKind::Not { not } => SchemaNode::Composite {
                facets,
                op: CompositeOp::Not,
                members: vec![self.compile_ref_or(&**not)],
            },
            SchemaKind::Any(any) => self.compile_any(any, facets),
        }
    }

    fn composite(
        &mut self,
        facets: Facets,
        op: CompositeOp,
        members: &[ReferenceOr<Schema>],
    ) -> SchemaNode {
        SchemaNode::Composite {
            facets,
            op,
            members: self.compile_members(members),
        }
    }

    fn compile_type(&mut self, typ: &Type, mut facets: Facets) -> SchemaNode {
        match typ {
            Type::String(string) => {
                string_facets(string, &mut facets);
                SchemaNode::Primitive(facets)
            }
            Type::Number(number) => {
                number_facets(number, &mut facets);
                SchemaNode::Primitive(facets)
            }
            Type::Integer(integer) => {
                integer_facets(integer, &mut facets);
                SchemaNode::Primitive(facets)
            }
            Type::Boolean(boolean) => {
                facets.type_name = Some("boolean".to_string());
                facets.enumeration = boolean
                    .enumeration
                    .iter()
                    .map(|v| v.map(Value::Bool).unwrap_or(Value::Null))
                    .collect();
                SchemaNode::Primitive(facets)
            }
            Type::Object(object) => self.compile_object_type(object, facets),
            Type::Array(array) => self.compile_array_type(array, facets),
        }
    }

    fn compile_object_type(&mut self, object: &ObjectType, mut facets: Facets) -> SchemaNode {
        facets.type_name = Some("object".to_string());
        facets.min_properties = clamp_bound(object.min_properties);
        facets.max_properties = clamp_bound(object.max_properties);
        self.object(
            facets,
            &object.properties,
            &object.required,
            object.additional_properties.as_ref(),
        )
    }

    fn compile_array_type(&mut self, array: &ArrayType, mut facets: Facets) -> SchemaNode {
        facets.type_name = Some("array".to_string());
        facets.min_items = clamp_bound(array.min_items);
        facets.max_items = clamp_bound(array.max_items);
        facets.unique_items = array.unique_items;
        match &array.items {
            Some(items) => SchemaNode::Array {
                facets,
                items: Box::new(self.compile_ref_or(items)),
            },
            None => SchemaNode::Primitive(facets),
        }
    }

    fn object<'p>(
        &mut self,
        facets: Facets,
        properties: impl IntoIterator<Item = (&'p String, &'p ReferenceOr<Box<Schema>>)>,
        required: &[String],
        additional: Option<&openapiv3::AdditionalProperties>,
    ) -> SchemaNode {
        let properties = properties
            .into_iter()
            .map(|(name, property)| (name.clone(), self.compile_ref_or(property)))
            .collect();

        let additional_properties = if facets.extension_flag(PRESERVE_UNKNOWN_FIELDS) {
            AdditionalProperties::Allowed(true)
        } else {
            match additional {
                None => AdditionalProperties::None,
                Some(openapiv3::AdditionalProperties::Any(allowed)) => {
                    AdditionalProperties::Allowed(*allowed)
                }
                Some(openapiv3::AdditionalProperties::Schema(schema)) => {
                    AdditionalProperties::Typed(Box::new(self.compile_ref_or(&**schema)))
                }
            }
        };

        SchemaNode::Object {
            facets,
            properties,
            additional_properties,
            required: required.to_vec(),
        }
    }

    /// Schemas without a recognized `type`, possibly mixing structure and
    /// composition keywords. Mixed forms compile to an `allOf` conjunction of
    /// the structural part and each keyword.
    fn compile_any(&mut self, any: &AnySchema, mut facets: Facets) -> SchemaNode {
        facets.type_name = any.typ.clone();
        facets.format = any.format.clone();
        facets.pattern = any.pattern.clone();
        facets.multiple_of = any.multiple_of;
        facets.minimum = any.minimum;
        facets.maximum = any.maximum;
        facets.exclusive_minimum = any.exclusive_minimum.unwrap_or(false);
        facets.exclusive_maximum = any.exclusive_maximum.unwrap_or(false);
        facets.min_length = clamp_bound(any.min_length);
        facets.max_length = clamp_bound(any.max_length);
        facets.min_items = clamp_bound(any.min_items);
        facets.max_items = clamp_bound(any.max_items);
        facets.min_properties = clamp_bound(any.min_properties);
        facets.max_properties = clamp_bound(any.max_properties);
        facets.unique_items = any.unique_items.unwrap_or(false);
        facets.enumeration = any.enumeration.clone();

        let is_object = any.typ.as_deref() == Some("object")
            || !any.properties.is_empty()
            || !any.required.is_empty()
            || any.additional_properties.is_some()
            || facets.extension_flag(PRESERVE_UNKNOWN_FIELDS);

        // The structural part carries only the extensions that shape it; the
        // remaining facets move to whichever node ends up outermost.
        let structural = Facets {
            type_name: facets.type_name.clone(),
            extensions: facets.extensions.clone(),
            ..Facets::default()
        };
        let structure = if is_object {
            Some(self.object(
                structural,
                &any.properties,
                &any.required,
                any.additional_properties.as_ref(),
            ))
        } else {
            any.items.as_ref().map(|items| SchemaNode::Array {
                facets: structural,
                items: Box::new(self.compile_ref_or(items)),
            })
        };

        let mut compositions = Vec::new();
        if !any.all_of.is_empty() {
            compositions.push((CompositeOp::AllOf, self.compile_members(&any.all_of)));
        }
        if !any.any_of.is_empty() {
            compositions.push((CompositeOp::AnyOf, self.compile_members(&any.any_of)));
        }
        if !any.one_of.is_empty() {
            compositions.push((CompositeOp::OneOf, self.compile_members(&any.one_of)));
        }
        if let Some(not) = &any.not {
            compositions.push((CompositeOp::Not, vec![self.compile_ref_or(&**not)]));
        }

        match (structure, compositions.len()) {
            (None, 0) => SchemaNode::Primitive(facets),
            (Some(mut node), 0) => {
                if let Some(slot) = node.facets_mut() {
                    *slot = facets;
                }
                node
            }
            (None, 1) => {
                let (op, members) = compositions.remove(0);
                SchemaNode::Composite {
                    facets,
                    op,
                    members,
                }
            }
            (structure, _) => {
                let mut members: Vec<SchemaNode> = structure.into_iter().collect();
                for (op, group) in compositions {
                    match op {
                        CompositeOp::AllOf => members.extend(group),
                        _ => members.push(SchemaNode::Composite {
                            facets: Facets::default(),
                            op,
                            members: group,
                        }),
                    }
                }
                SchemaNode::Composite {
                    facets,
                    op: CompositeOp::AllOf,
                    members,
                }
            }
        }
    }
}

fn data_facets(data: &SchemaData) -> Facets {
    Facets {
        title: data.title.clone(),
        description: data.description.clone(),
        default: data.default.clone(),
        example: data.example.clone(),
        nullable: data.nullable,
        read_only: data.read_only,
        write_only: data.write_only,
        deprecated: data.deprecated,
        extensions: data
            .extensions
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
        ..Facets::default()
    }
}

fn string_facets(string: &StringType, facets: &mut Facets) {
    facets.type_name = Some("string".to_string());
    facets.format = format_name(&string.format);
    facets.pattern = string.pattern.clone();
    facets.min_length = clamp_bound(string.min_length);
    facets.max_length = clamp_bound(string.max_length);
    facets.enumeration = string
        .enumeration
        .iter()
        .map(|v| v.clone().map(Value::String).unwrap_or(Value::Null))
        .collect();
}

fn number_facets(number: &NumberType, facets: &mut Facets) {
    facets.type_name = Some("number".to_string());
    facets.format = format_name(&number.format);
    facets.multiple_of = number.multiple_of;
    facets.minimum = number.minimum;
    facets.maximum = number.maximum;
    facets.exclusive_minimum = number.exclusive_minimum;
    facets.exclusive_maximum = number.exclusive_maximum;
    facets.enumeration = number
        .enumeration
        .iter()
        .map(|v| v.map(Value::from).unwrap_or(Value::Null))
        .collect();
}

fn integer_facets(integer: &IntegerType, facets: &mut Facets) {
    facets.type_name = Some("integer".to_string());
    facets.format = format_name(&integer.format);
    facets.multiple_of = integer.multiple_of.map(|v| v as f64);
    facets.minimum = integer.minimum.map(|v| v as f64);
    facets.maximum = integer.maximum.map(|v| v as f64);
    facets.exclusive_minimum = integer.exclusive_minimum;
    facets.exclusive_maximum = integer.exclusive_maximum;
    facets.enumeration = integer
        .enumeration
        .iter()
        .map(|v| v.map(Value::from).unwrap_or(Value::Null))
        .collect();
}

/// Wire name of a known format, or the unknown format string verbatim.
fn format_name<T: Serialize>(format: &VariantOrUnknownOrEmpty<T>) -> Option<String> {
    match format {
        VariantOrUnknownOrEmpty::Item(known) => serde_json::to_value(known)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string)),
        VariantOrUnknownOrEmpty::Unknown(other) => Some(other.clone()),
        VariantOrUnknownOrEmpty::Empty => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesize::synthesize;
    use serde_json::json;

    fn compile(document: Value) -> DefinitionMap {
        let parsed = synthesize(document.as_object().unwrap()).unwrap();
        compile_all(&parsed, &Qualifier::new("g/v1"))
    }

    #[test]
    fn reference_is_qualified_and_recorded() {
        let out = compile(json!({
            "Foo": { "type": "string" },
            "spec": { "$ref": "#/components/schemas/Foo" }
        }));
        let spec = &out["g/v1.spec"];
        assert_eq!(spec.schema, SchemaNode::reference("g/v1.Foo"));
        assert_eq!(spec.dependencies(), ["g/v1.Foo".to_string()]);
        assert!(out["g/v1.Foo"].dependencies.is_none());
    }

    #[test]
    fn scalar_facets_are_copied() {
        let out = compile(json!({
            "spec": {
                "type": "string",
                "format": "date-time",
                "description": "when",
                "title": "Timestamp",
                "default": "now",
                "nullable": true,
                "pattern": "^x",
                "enum": ["a", "b"],
                "minLength": 1,
                "maxLength": 10
            }
        }));
        let facets = out["g/v1.spec"].schema.facets().unwrap().clone();
        assert_eq!(facets.type_name.as_deref(), Some("string"));
        assert_eq!(facets.format.as_deref(), Some("date-time"));
        assert_eq!(facets.description.as_deref(), Some("when"));
        assert_eq!(facets.title.as_deref(), Some("Timestamp"));
        assert_eq!(facets.default, Some(json!("now")));
        assert!(facets.nullable);
        assert_eq!(facets.pattern.as_deref(), Some("^x"));
        assert_eq!(facets.enumeration, vec![json!("a"), json!("b")]);
        assert_eq!(facets.min_length, Some(1));
        assert_eq!(facets.max_length, Some(10));
    }

    #[test]
    fn numeric_facets_are_copied() {
        let out = compile(json!({
            "count": { "type": "integer", "format": "int32", "minimum": 0, "maximum": 5, "multipleOf": 1 },
            "ratio": { "type": "number", "minimum": 0.5, "exclusiveMaximum": true, "maximum": 1 }
        }));
        let count = out["g/v1.count"].schema.facets().unwrap();
        assert_eq!(count.format.as_deref(), Some("int32"));
        assert_eq!(count.minimum, Some(0.0));
        assert_eq!(count.maximum, Some(5.0));
        assert_eq!(count.multiple_of, Some(1.0));

        let ratio = out["g/v1.ratio"].schema.facets().unwrap();
        assert_eq!(ratio.minimum, Some(0.5));
        assert!(ratio.exclusive_maximum);
    }

    #[test]
    fn bounds_saturate_instead_of_overflowing() {
        assert_eq!(clamp_bound(Some(3)), Some(3));
        assert_eq!(clamp_bound(None), None);
        assert_eq!(clamp_bound(Some(usize::MAX)), Some(i64::MAX));
    }

    #[test]
    fn additional_properties_forms() {
        let out = compile(json!({
            "Item": { "type": "string" },
            "open": { "type": "object", "additionalProperties": true },
            "closed": { "type": "object", "additionalProperties": false },
            "typed": {
                "type": "object",
                "additionalProperties": { "$ref": "#/components/schemas/Item" }
            },
            "plain": { "type": "object" }
        }));

        let additional = |key: &str| match &out[key].schema {
            SchemaNode::Object {
                additional_properties,
                ..
            } => additional_properties.clone(),
            other => panic!("expected object, got {:?}", other),
        };
        assert_eq!(additional("g/v1.open"), AdditionalProperties::Allowed(true));
        assert_eq!(additional("g/v1.closed"), AdditionalProperties::Allowed(false));
        assert_eq!(
            additional("g/v1.typed"),
            AdditionalProperties::Typed(Box::new(SchemaNode::reference("g/v1.Item")))
        );
        assert_eq!(additional("g/v1.plain"), AdditionalProperties::None);
        assert_eq!(out["g/v1.typed"].dependencies(), ["g/v1.Item".to_string()]);
    }

    #[test]
    fn preserve_unknown_fields_overrides_schema_form() {
        let out = compile(json!({
            "spec": {
                "type": "object",
                "additionalProperties": { "type": "string" },
                "x-kubernetes-preserve-unknown-fields": true
            }
        }));
        match &out["g/v1.spec"].schema {
            SchemaNode::Object {
                additional_properties,
                facets,
                ..
            } => {
                assert_eq!(*additional_properties, AdditionalProperties::Allowed(true));
                assert!(facets.extension_flag(PRESERVE_UNKNOWN_FIELDS));
            }
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn untyped_preserve_unknown_fields_is_open_object() {
        let out = compile(json!({
            "#any": { "x-kubernetes-preserve-unknown-fields": true }
        }));
        let rendered = out["g/v1.#any"].schema.to_json();
        assert_eq!(rendered["additionalProperties"], json!(true));
    }

    #[test]
    fn composites_keep_member_order_and_merge_dependencies() {
        let out = compile(json!({
            "A": { "type": "string" },
            "B": { "type": "integer" },
            "spec": {
                "oneOf": [
                    { "$ref": "#/components/schemas/B" },
                    { "$ref": "#/components/schemas/A" },
                    { "$ref": "#/components/schemas/B" }
                ]
            }
        }));
        let spec = &out["g/v1.spec"];
        match &spec.schema {
            SchemaNode::Composite { op, members, .. } => {
                assert_eq!(*op, CompositeOp::OneOf);
                let targets: Vec<_> = members.iter().filter_map(|m| m.reference_target()).collect();
                assert_eq!(targets, ["g/v1.B", "g/v1.A", "g/v1.B"]);
            }
            other => panic!("expected composite, got {:?}", other),
        }
        assert_eq!(
            spec.dependencies(),
            ["g/v1.A".to_string(), "g/v1.B".to_string()]
        );
    }

    #[test]
    fn not_compiles_single_member() {
        let out = compile(json!({
            "A": { "type": "string" },
            "spec": { "not": { "$ref": "#/components/schemas/A" } }
        }));
        let spec = &out["g/v1.spec"];
        assert_eq!(
            spec.schema.to_json(),
            json!({ "not": { "$ref": "g/v1.A" } })
        );
        assert_eq!(spec.dependencies(), ["g/v1.A".to_string()]);
    }

    #[test]
    fn nested_items_and_properties_collect_dependencies() {
        let out = compile(json!({
            "Leaf": { "type": "string" },
            "Other": { "type": "boolean" },
            "spec": {
                "type": "object",
                "required": ["list"],
                "properties": {
                    "list": { "type": "array", "items": { "$ref": "#/components/schemas/Leaf" } },
                    "nested": {
                        "type": "object",
                        "properties": {
                            "deep": { "allOf": [{ "$ref": "#/components/schemas/Other" }] }
                        }
                    }
                }
            }
        }));
        let spec = &out["g/v1.spec"];
        assert_eq!(
            spec.dependencies(),
            ["g/v1.Leaf".to_string(), "g/v1.Other".to_string()]
        );
        let rendered = spec.schema.to_json();
        assert_eq!(rendered["required"], json!(["list"]));
        assert_eq!(
            rendered["properties"]["list"]["items"],
            json!({ "$ref": "g/v1.Leaf" })
        );
    }

    #[test]
    fn extensions_are_carried() {
        let out = compile(json!({
            "spec": { "type": "string", "x-kubernetes-int-or-string": true, "readOnly": true }
        }));
        let rendered = out["g/v1.spec"].schema.to_json();
        assert_eq!(rendered["x-kubernetes-int-or-string"], json!(true));
        assert_eq!(rendered["readOnly"], json!(true));
    }

    #[test]
    fn compile_node_is_independent_per_call() {
        let parsed = synthesize(
            json!({
                "A": { "type": "string" },
                "x": { "$ref": "#/components/schemas/A" },
                "y": { "type": "string" }
            })
            .as_object()
            .unwrap(),
        )
        .unwrap();
        let q = Qualifier::new("g/v1");
        let (_, deps_x) = compile_node(parsed.get("x").unwrap(), &q);
        let (_, deps_y) = compile_node(parsed.get("y").unwrap(), &q);
        assert_eq!(deps_x.len(), 1);
        assert!(deps_y.is_empty());
    }

    fn compile_untyped(any: Value) -> (Value, Vec<String>) {
        let schema = Schema {
            schema_data: SchemaData::default(),
            schema_kind: SchemaKind::Any(serde_json::from_value(any).unwrap()),
        };
        let (node, deps) = compile_node(&ReferenceOr::Item(schema), &Qualifier::new("g/v1"));
        (node.to_json(), deps.into_iter().collect())
    }

    #[test]
    fn untyped_facets_only_is_primitive() {
        let (rendered, deps) = compile_untyped(json!({ "minLength": 3 }));
        assert_eq!(rendered, json!({ "minLength": 3 }));
        assert!(deps.is_empty());
    }

    #[test]
    fn untyped_structure_without_composition() {
        let (rendered, deps) = compile_untyped(json!({
            "properties": { "a": { "type": "string" } }
        }));
        assert_eq!(rendered, json!({ "properties": { "a": { "type": "string" } } }));
        assert!(deps.is_empty());

        let (rendered, deps) = compile_untyped(json!({
            "items": { "$ref": "#/components/schemas/B" }
        }));
        assert_eq!(rendered, json!({ "items": { "$ref": "g/v1.B" } }));
        assert_eq!(deps, ["g/v1.B"]);
    }

    #[test]
    fn single_composition_keeps_facets_on_composite() {
        let (rendered, deps) = compile_untyped(json!({
            "minLength": 1,
            "not": { "$ref": "#/components/schemas/A" }
        }));
        assert_eq!(
            rendered,
            json!({ "minLength": 1, "not": { "$ref": "g/v1.A" } })
        );
        assert_eq!(deps, ["g/v1.A"]);
    }

    #[test]
    fn several_compositions_become_all_of() {
        let (rendered, deps) = compile_untyped(json!({
            "allOf": [{ "$ref": "#/components/schemas/A" }],
            "anyOf": [{ "$ref": "#/components/schemas/B" }]
        }));
        assert_eq!(
            rendered,
            json!({
                "allOf": [
                    { "$ref": "g/v1.A" },
                    { "anyOf": [{ "$ref": "g/v1.B" }] }
                ]
            })
        );
        assert_eq!(deps, ["g/v1.A", "g/v1.B"]);
    }

    #[test]
    fn object_structure_joins_all_of_members() {
        let (rendered, deps) = compile_untyped(json!({
            "type": "object",
            "properties": { "x": { "$ref": "#/components/schemas/B" } },
            "allOf": [{ "$ref": "#/components/schemas/A" }]
        }));
        assert_eq!(
            rendered,
            json!({
                "type": "object",
                "allOf": [
                    { "type": "object", "properties": { "x": { "$ref": "g/v1.B" } } },
                    { "$ref": "g/v1.A" }
                ]
            })
        );
        assert_eq!(deps, ["g/v1.A", "g/v1.B"]);
    }

    #[test]
    fn mixed_compositions_survive_the_parser() {
        let out = compile(json!({
            "A": { "type": "string" },
            "B": { "type": "integer" },
            "spec": {
                "allOf": [{ "$ref": "#/components/schemas/A" }],
                "anyOf": [{ "$ref": "#/components/schemas/B" }]
            }
        }));
        let spec = &out["g/v1.spec"];
        assert_eq!(
            spec.schema.to_json(),
            json!({
                "allOf": [
                    { "$ref": "g/v1.A" },
                    { "anyOf": [{ "$ref": "g/v1.B" }] }
                ]
            })
        );
        assert_eq!(spec.dependencies(), ["g/v1.A".to_string(), "g/v1.B".to_string()]);
    }
}
