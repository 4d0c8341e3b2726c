//! Synthesized `Kind` and `KindList` wrapper definitions.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::json;
use tracing::{debug, warn};

use crate::node::{
    AdditionalProperties, CompiledDefinition, DefinitionMap, Facets, Origin, SchemaNode,
};
use crate::types::{
    GroupVersionKind, Qualifier, GROUP_VERSION_KIND_EXTENSION, LIST_META_REF, OBJECT_META_REF,
};

const KIND_DESCRIPTION: &str = "Kind is a string value representing the REST resource this \
object represents. Servers may infer this from the endpoint the client submits requests to. \
Cannot be updated. In CamelCase.";

const API_VERSION_DESCRIPTION: &str = "APIVersion defines the versioned schema of this \
representation of an object. Servers should convert recognized schemas to the latest internal \
value, and may reject unrecognized values.";

/// Add the `Kind` and `KindList` envelopes to a set of compiled definitions.
///
/// Every public top-level definition becomes a property of the Kind holding
/// a reference to it. The Kind's dependencies are direct only; private
/// definitions stay reachable through the definitions that reference them.
///
/// A declared definition named like one of the envelopes is replaced by the
/// envelope. A declared definition named like an envelope header property
/// (`kind`, `apiVersion`, `metadata`) stays in the output but is not exposed
/// as a property of the Kind.
pub fn build_envelopes(
    mut compiled: DefinitionMap,
    gvk: &GroupVersionKind,
    qualifier: &Qualifier,
) -> DefinitionMap {
    let kind_name = qualifier.qualify(&gvk.kind);
    let list_name = qualifier.qualify(&gvk.list_kind());
    for shadowed in [&kind_name, &list_name] {
        if compiled.remove(shadowed).is_some() {
            warn!(definition = %shadowed, "declared definition replaced by kind envelope");
        }
    }

    let kind = kind_envelope(&compiled, gvk);
    let list = list_envelope(gvk, qualifier);
    debug!(kind = %gvk.kind, definitions = compiled.len(), "built kind envelopes");
    compiled.insert(kind_name, kind);
    compiled.insert(list_name, list);
    compiled
}

fn kind_envelope(compiled: &DefinitionMap, gvk: &GroupVersionKind) -> CompiledDefinition {
    let mut properties = envelope_header(OBJECT_META_REF);
    let mut dependencies = BTreeSet::from([OBJECT_META_REF.to_string()]);
    let mut has_spec = false;

    for (qualified, definition) in compiled {
        let Some(name) = definition.declared_name() else {
            continue;
        };
        if name.is_private() {
            continue;
        }
        if properties.contains_key(name.short()) {
            warn!(definition = %qualified, "declared definition collides with envelope header");
            continue;
        }
        has_spec |= name.short() == "spec";
        properties.insert(
            name.short().to_string(),
            SchemaNode::reference(qualified.clone()),
        );
        dependencies.insert(qualified.clone());
    }

    let mut required = vec![
        "kind".to_string(),
        "apiVersion".to_string(),
        "metadata".to_string(),
    ];
    if has_spec {
        required.push("spec".to_string());
    }

    let schema = SchemaNode::Object {
        facets: envelope_facets(gvk),
        properties,
        additional_properties: AdditionalProperties::None,
        required,
    };
    CompiledDefinition::new(schema, dependencies, Origin::Envelope)
}

fn list_envelope(gvk: &GroupVersionKind, qualifier: &Qualifier) -> CompiledDefinition {
    let kind_ref = qualifier.qualify(&gvk.kind);

    let mut properties = envelope_header(LIST_META_REF);
    properties.insert(
        "items".to_string(),
        SchemaNode::Array {
            facets: Facets::typed("array")
                .described(&format!("List of {} objects.", gvk.kind)),
            items: Box::new(SchemaNode::reference(kind_ref.clone())),
        },
    );

    let schema = SchemaNode::Object {
        facets: envelope_facets(&gvk.with_kind(gvk.list_kind())),
        properties,
        additional_properties: AdditionalProperties::None,
        required: vec!["metadata".to_string(), "items".to_string()],
    };
    let dependencies = BTreeSet::from([LIST_META_REF.to_string(), kind_ref]);
    CompiledDefinition::new(schema, dependencies, Origin::Envelope)
}

/// `kind`, `apiVersion` and `metadata` shared by both envelopes.
fn envelope_header(metadata_ref: &str) -> BTreeMap<String, SchemaNode> {
    BTreeMap::from([
        (
            "kind".to_string(),
            SchemaNode::described_string(KIND_DESCRIPTION),
        ),
        (
            "apiVersion".to_string(),
            SchemaNode::described_string(API_VERSION_DESCRIPTION),
        ),
        (
            "metadata".to_string(),
            SchemaNode::reference(metadata_ref),
        ),
    ])
}

fn envelope_facets(gvk: &GroupVersionKind) -> Facets {
    let mut facets = Facets::typed("object");
    facets.extensions.insert(
        GROUP_VERSION_KIND_EXTENSION.to_string(),
        json!([{ "group": gvk.group, "version": gvk.version, "kind": gvk.kind }]),
    );
    facets
}
