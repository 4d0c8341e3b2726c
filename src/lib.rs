//! Kind Schema Compiler
//!
//! Compiles a resource kind's schema into a namespaced map of OpenAPI
//! definitions ready to be published by a generic API-serving layer.
//!
//! The pipeline has four stages:
//!
//! 1. [`SchemaDocument`] detects the input [`Dialect`] and normalizes it to a
//!    bare map of named schemas.
//! 2. [`synthesize`] wraps that map in a minimal OpenAPI v3 document and
//!    parses it with `openapiv3`.
//! 3. [`compile_all`] rewrites every top-level schema into a [`SchemaNode`]
//!    tree, renaming local references into the [`Qualifier`] namespace and
//!    collecting each definition's direct dependencies.
//! 4. [`build_envelopes`] adds the `Kind` and `KindList` wrapper definitions.
//!
//! # Example
//!
//! ```
//! use kind_schema::{compile_kind, GroupVersionKind, Qualifier, SchemaDocument};
//! use serde_json::json;
//!
//! let document = SchemaDocument::from_value(json!({
//!     "spec": {
//!         "type": "object",
//!         "properties": { "foo": { "type": "string" } }
//!     }
//! }))
//! .unwrap();
//!
//! let gvk = GroupVersionKind::new("g", "v1", "Foo");
//! let definitions = compile_kind(&document, &gvk, &Qualifier::new("g/v1")).unwrap();
//!
//! assert!(definitions.contains_key("g/v1.spec"));
//! assert!(definitions.contains_key("g/v1.Foo"));
//! assert!(definitions.contains_key("g/v1.FooList"));
//! ```
//!
//! # Private definitions
//!
//! Top-level names starting with `#` are compiled and kept in the output but
//! never become properties of the Kind. They are reachable only through the
//! dependencies of definitions that reference them.

mod compiler;
mod document;
mod envelope;
mod error;
mod loader;
mod node;
mod synthesize;
mod types;

pub use compiler::{clamp_bound, compile_all, compile_node};
pub use document::{normalize, Dialect, SchemaDocument};
pub use envelope::build_envelopes;
pub use error::KindSchemaError;
pub use loader::{load_document, load_document_str};
pub use node::{
    AdditionalProperties, CompiledDefinition, CompositeOp, DefinitionMap, Facets, Origin,
    SchemaNode,
};
pub use synthesize::{local_target, synthesize, ParsedComponents, SYNTHESIZED_OPENAPI_VERSION};
pub use types::{
    json_type_name, DefinitionName, GroupVersionKind, Qualifier, COMPONENT_REF_PREFIX,
    GROUP_VERSION_KIND_EXTENSION, LIST_META_REF, OBJECT_META_REF, PRESERVE_UNKNOWN_FIELDS,
    PRIVATE_PREFIX,
};

/// Compile a normalized document and wrap it in its Kind envelopes.
///
/// # Errors
///
/// Returns `KindSchemaError::Parse` if the OpenAPI parser rejects the
/// document. Compilation itself never fails.
pub fn compile_kind(
    document: &SchemaDocument,
    gvk: &GroupVersionKind,
    qualifier: &Qualifier,
) -> Result<DefinitionMap, KindSchemaError> {
    let parsed = synthesize(document.raw())?;
    let compiled = compile_all(&parsed, qualifier);
    Ok(build_envelopes(compiled, gvk, qualifier))
}
