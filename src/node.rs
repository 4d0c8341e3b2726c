//! Compiled schema tree and its JSON Schema rendering.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Composition keyword of a [`SchemaNode::Composite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositeOp {
    AllOf,
    AnyOf,
    OneOf,
    Not,
}

impl CompositeOp {
    /// JSON Schema keyword for this operator.
    pub fn keyword(&self) -> &'static str {
        match self {
            CompositeOp::AllOf => "allOf",
            CompositeOp::AnyOf => "anyOf",
            CompositeOp::OneOf => "oneOf",
            CompositeOp::Not => "not",
        }
    }
}

/// How an object treats fields not listed in `properties`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AdditionalProperties {
    /// Keyword absent.
    #[default]
    None,
    /// `additionalProperties: true|false`.
    Allowed(bool),
    /// `additionalProperties: <schema>`.
    Typed(Box<SchemaNode>),
}

/// Scalar keywords shared by every non-reference node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Facets {
    pub type_name: Option<String>,
    pub format: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub example: Option<Value>,
    pub nullable: bool,
    pub read_only: bool,
    pub write_only: bool,
    pub deprecated: bool,
    pub enumeration: Vec<Value>,
    pub pattern: Option<String>,
    pub multiple_of: Option<f64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: bool,
    pub exclusive_maximum: bool,
    pub min_length: Option<i64>,
    pub max_length: Option<i64>,
    pub min_items: Option<i64>,
    pub max_items: Option<i64>,
    pub min_properties: Option<i64>,
    pub max_properties: Option<i64>,
    pub unique_items: bool,
    /// Vendor `x-*` extensions, copied verbatim.
    pub extensions: BTreeMap<String, Value>,
}

impl Facets {
    /// Facets carrying only a `type`.
    pub fn typed(type_name: &str) -> Self {
        Self {
            type_name: Some(type_name.to_string()),
            ..Self::default()
        }
    }

    /// Same facets with a description.
    pub fn described(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Whether the given boolean vendor extension is present and `true`.
    pub fn extension_flag(&self, name: &str) -> bool {
        matches!(self.extensions.get(name), Some(Value::Bool(true)))
    }

    fn write_into(&self, out: &mut Map<String, Value>) {
        insert_opt(out, "type", self.type_name.clone().map(Value::String));
        insert_opt(out, "format", self.format.clone().map(Value::String));
        insert_opt(out, "title", self.title.clone().map(Value::String));
        insert_opt(out, "description", self.description.clone().map(Value::String));
        insert_opt(out, "default", self.default.clone());
        insert_opt(out, "example", self.example.clone());
        insert_flag(out, "nullable", self.nullable);
        insert_flag(out, "readOnly", self.read_only);
        insert_flag(out, "writeOnly", self.write_only);
        insert_flag(out, "deprecated", self.deprecated);
        if !self.enumeration.is_empty() {
            out.insert("enum".to_string(), Value::Array(self.enumeration.clone()));
        }
        insert_opt(out, "pattern", self.pattern.clone().map(Value::String));
        insert_opt(out, "multipleOf", self.multiple_of.map(number));
        insert_opt(out, "minimum", self.minimum.map(number));
        insert_flag(out, "exclusiveMinimum", self.exclusive_minimum);
        insert_opt(out, "maximum", self.maximum.map(number));
        insert_flag(out, "exclusiveMaximum", self.exclusive_maximum);
        insert_opt(out, "minLength", self.min_length.map(Value::from));
        insert_opt(out, "maxLength", self.max_length.map(Value::from));
        insert_opt(out, "minItems", self.min_items.map(Value::from));
        insert_opt(out, "maxItems", self.max_items.map(Value::from));
        insert_flag(out, "uniqueItems", self.unique_items);
        insert_opt(out, "minProperties", self.min_properties.map(Value::from));
        insert_opt(out, "maxProperties", self.max_properties.map(Value::from));
        for (name, value) in &self.extensions {
            out.insert(name.clone(), value.clone());
        }
    }
}

/// A node of the compiled schema tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// `$ref` to another definition by its qualified name.
    Reference(String),
    Primitive(Facets),
    Object {
        facets: Facets,
        properties: BTreeMap<String, SchemaNode>,
        additional_properties: AdditionalProperties,
        required: Vec<String>,
    },
    Array {
        facets: Facets,
        items: Box<SchemaNode>,
    },
    /// `allOf`/`anyOf`/`oneOf` with their members in source order, or `not`
    /// with exactly one member.
    Composite {
        facets: Facets,
        op: CompositeOp,
        members: Vec<SchemaNode>,
    },
}

impl SchemaNode {
    pub fn reference(qualified_name: impl Into<String>) -> Self {
        SchemaNode::Reference(qualified_name.into())
    }

    /// Plain `{"type": "string"}` with a description.
    pub fn described_string(description: &str) -> Self {
        SchemaNode::Primitive(Facets::typed("string").described(description))
    }

    /// Shared keywords of this node, `None` for references.
    pub fn facets(&self) -> Option<&Facets> {
        match self {
            SchemaNode::Reference(_) => None,
            SchemaNode::Primitive(facets)
            | SchemaNode::Object { facets, .. }
            | SchemaNode::Array { facets, .. }
            | SchemaNode::Composite { facets, .. } => Some(facets),
        }
    }

    pub(crate) fn facets_mut(&mut self) -> Option<&mut Facets> {
        match self {
            SchemaNode::Reference(_) => None,
            SchemaNode::Primitive(facets)
            | SchemaNode::Object { facets, .. }
            | SchemaNode::Array { facets, .. }
            | SchemaNode::Composite { facets, .. } => Some(facets),
        }
    }

    /// Qualified name this node points at, if it is a reference.
    pub fn reference_target(&self) -> Option<&str> {
        match self {
            SchemaNode::Reference(target) => Some(target),
            _ => None,
        }
    }

    /// Render as a JSON Schema value.
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        match self {
            SchemaNode::Reference(target) => {
                out.insert("$ref".to_string(), Value::String(target.clone()));
            }
            SchemaNode::Primitive(facets) => facets.write_into(&mut out),
            SchemaNode::Object {
                facets,
                properties,
                additional_properties,
                required,
            } => {
                facets.write_into(&mut out);
                if !properties.is_empty() {
                    let props = properties
                        .iter()
                        .map(|(name, node)| (name.clone(), node.to_json()))
                        .collect();
                    out.insert("properties".to_string(), Value::Object(props));
                }
                if !required.is_empty() {
                    let required = required.iter().cloned().map(Value::String).collect();
                    out.insert("required".to_string(), Value::Array(required));
                }
                match additional_properties {
                    AdditionalProperties::None => {}
                    AdditionalProperties::Allowed(allowed) => {
                        out.insert("additionalProperties".to_string(), Value::Bool(*allowed));
                    }
                    AdditionalProperties::Typed(node) => {
                        out.insert("additionalProperties".to_string(), node.to_json());
                    }
                }
            }
            SchemaNode::Array { facets, items } => {
                facets.write_into(&mut out);
                out.insert("items".to_string(), items.to_json());
            }
            SchemaNode::Composite {
                facets,
                op,
                members,
            } => {
                facets.write_into(&mut out);
                match (op, members.as_slice()) {
                    (CompositeOp::Not, [single]) => {
                        out.insert("not".to_string(), single.to_json());
                    }
                    _ => {
                        let members = members.iter().map(SchemaNode::to_json).collect();
                        out.insert(op.keyword().to_string(), Value::Array(members));
                    }
                }
            }
        }
        Value::Object(out)
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Compiled definitions keyed by qualified name.
pub type DefinitionMap = BTreeMap<String, CompiledDefinition>;

/// Where a compiled definition came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// A top-level entry of the schema document.
    Declared(crate::types::DefinitionName),
    /// A synthesized `Kind`/`KindList` wrapper.
    Envelope,
}

/// A compiled definition and the qualified names it references directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledDefinition {
    pub schema: SchemaNode,
    /// Sorted and deduplicated; `None` when there are no dependencies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
    #[serde(skip)]
    pub origin: Origin,
}

impl CompiledDefinition {
    pub fn new(schema: SchemaNode, dependencies: BTreeSet<String>, origin: Origin) -> Self {
        let dependencies = if dependencies.is_empty() {
            None
        } else {
            Some(dependencies.into_iter().collect())
        };
        Self {
            schema,
            dependencies,
            origin,
        }
    }

    /// Dependencies as a slice, empty when absent.
    pub fn dependencies(&self) -> &[String] {
        self.dependencies.as_deref().unwrap_or(&[])
    }

    /// Short name of a declared definition, `None` for envelopes.
    pub fn declared_name(&self) -> Option<&crate::types::DefinitionName> {
        match &self.origin {
            Origin::Declared(name) => Some(name),
            Origin::Envelope => None,
        }
    }
}

fn insert_opt(out: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        out.insert(key.to_string(), value);
    }
}

fn insert_flag(out: &mut Map<String, Value>, key: &str, flag: bool) {
    if flag {
        out.insert(key.to_string(), Value::Bool(true));
    }
}

/// Integral floats render as JSON integers.
fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}
