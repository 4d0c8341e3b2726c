//! Dialect detection and normalization of kind schema documents.
//!
//! Three input shapes are accepted:
//!
//! | Dialect | Shape | Canonical map |
//! |---------|-------|---------------|
//! | CRD-embedded | `{"openAPIV3Schema": {"properties": {...}}}` | the `properties` object |
//! | OpenAPI | `{"openapi": "3.0.0", "components": {"schemas": {...}}}` | `components.schemas` |
//! | Bare | `{"spec": {...}, "status": {...}}` | the input itself |
//!
//! Everything in an OpenAPI document outside `components.schemas` is dropped.

use std::str::FromStr;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::KindSchemaError;
use crate::types::{json_type_name, DefinitionName};

const OPENAPI_KEY: &str = "openapi";
const CRD_SCHEMA_KEY: &str = "openAPIV3Schema";

/// Which accepted input shape a document was supplied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// A map of named schemas.
    Bare,
    /// A CRD version's `schema` block.
    CrdEmbedded,
    /// A full OpenAPI v3 document.
    OpenApi,
}

impl Dialect {
    /// Detect the dialect from top-level marker keys.
    ///
    /// `openapi` wins over `openAPIV3Schema` when both are present.
    pub fn detect(raw: &Map<String, Value>) -> Self {
        if raw.contains_key(OPENAPI_KEY) {
            Dialect::OpenApi
        } else if raw.contains_key(CRD_SCHEMA_KEY) {
            Dialect::CrdEmbedded
        } else {
            Dialect::Bare
        }
    }
}

/// Reduce any accepted dialect to the canonical bare map of named schemas.
///
/// Bare maps pass through unchanged, so normalizing twice is a no-op.
///
/// # Errors
///
/// Returns `KindSchemaError::MalformedDialect` when a dialect marker is
/// present but the shape beneath it is wrong.
pub fn normalize(raw: &Map<String, Value>) -> Result<Map<String, Value>, KindSchemaError> {
    match Dialect::detect(raw) {
        Dialect::Bare => Ok(raw.clone()),
        Dialect::CrdEmbedded => normalize_crd(&raw[CRD_SCHEMA_KEY]),
        Dialect::OpenApi => normalize_openapi(raw),
    }
}

fn normalize_crd(schema: &Value) -> Result<Map<String, Value>, KindSchemaError> {
    let Some(schema) = schema.as_object() else {
        return Err(KindSchemaError::malformed(format!(
            "'{}' must be an object, got {}",
            CRD_SCHEMA_KEY,
            json_type_name(schema)
        )));
    };
    let Some(properties) = schema.get("properties") else {
        return Err(KindSchemaError::malformed(format!(
            "'{}' must contain properties",
            CRD_SCHEMA_KEY
        )));
    };
    match properties {
        Value::Object(props) => Ok(props.clone()),
        other => Err(KindSchemaError::malformed(format!(
            "'{}' properties must be an object, got {}",
            CRD_SCHEMA_KEY,
            json_type_name(other)
        ))),
    }
}

fn normalize_openapi(raw: &Map<String, Value>) -> Result<Map<String, Value>, KindSchemaError> {
    let Some(components) = raw.get("components") else {
        return Ok(Map::new());
    };
    let Some(components) = components.as_object() else {
        return Err(KindSchemaError::malformed(format!(
            "'components' in an OpenAPI document must be an object, got {}",
            json_type_name(components)
        )));
    };
    match components.get("schemas") {
        None => Ok(Map::new()),
        Some(Value::Object(schemas)) => Ok(schemas.clone()),
        Some(other) => Err(KindSchemaError::malformed(format!(
            "'components.schemas' in an OpenAPI document must be an object, got {}",
            json_type_name(other)
        ))),
    }
}

/// A kind version's schema, normalized once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    raw: Map<String, Value>,
    dialect: Dialect,
}

impl SchemaDocument {
    /// Normalize a decoded JSON object.
    pub fn from_map(raw: Map<String, Value>) -> Result<Self, KindSchemaError> {
        let dialect = Dialect::detect(&raw);
        let raw = match dialect {
            Dialect::Bare => raw,
            _ => normalize(&raw)?,
        };
        debug!(?dialect, definitions = raw.len(), "normalized schema document");
        Ok(Self { raw, dialect })
    }

    /// Normalize a decoded JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, KindSchemaError> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(KindSchemaError::malformed(format!(
                "schema document must be an object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Decode and normalize raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KindSchemaError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|source| KindSchemaError::InvalidJson { source })?;
        Self::from_value(value)
    }

    /// Dialect the document was supplied in.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The canonical map of named schemas.
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// Raw schema declared under a top-level name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.raw.get(name)
    }

    /// Top-level definition names with visibility resolved.
    pub fn names(&self) -> Vec<DefinitionName> {
        self.raw.keys().map(DefinitionName::new).collect()
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl FromStr for SchemaDocument {
    type Err = KindSchemaError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Self::from_slice(content.as_bytes())
    }
}
