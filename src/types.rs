//! Names and identities used while compiling a kind schema.

use std::fmt;

use serde_json::Value;

/// Prefix marking a top-level definition as private.
pub const PRIVATE_PREFIX: char = '#';

/// Local reference prefix accepted inside a schema document.
pub const COMPONENT_REF_PREFIX: &str = "#/components/schemas/";

/// Vendor extension that allows arbitrary additional fields on an object.
pub const PRESERVE_UNKNOWN_FIELDS: &str = "x-kubernetes-preserve-unknown-fields";

/// Vendor extension identifying the group/version/kind of an envelope.
pub const GROUP_VERSION_KIND_EXTENSION: &str = "x-kubernetes-group-version-kind";

/// Platform definition for object metadata.
pub const OBJECT_META_REF: &str = "k8s.io/apimachinery/pkg/apis/meta/v1.ObjectMeta";

/// Platform definition for list metadata.
pub const LIST_META_REF: &str = "k8s.io/apimachinery/pkg/apis/meta/v1.ListMeta";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Namespace applied to every compiled definition, e.g. `com.example.v1`.
///
/// Qualified names are `<qualifier>.<shortName>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Qualifier(String);

impl Qualifier {
    /// Use `prefix` verbatim as the namespace.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    /// Namespace for a package prefix and a version: `<prefix>.<version>`.
    pub fn for_version(package_prefix: &str, version: &str) -> Self {
        Self(format!("{}.{}", package_prefix, version))
    }

    /// Fully qualify a short definition name.
    pub fn qualify(&self, short_name: &str) -> String {
        format!("{}.{}", self.0, short_name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A top-level definition name with its visibility resolved once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefinitionName {
    short: String,
    private: bool,
}

impl DefinitionName {
    pub fn new(short: impl Into<String>) -> Self {
        let short = short.into();
        let private = short.starts_with(PRIVATE_PREFIX);
        Self { short, private }
    }

    pub fn short(&self) -> &str {
        &self.short
    }

    /// Private definitions are compiled but never exposed as Kind properties.
    pub fn is_private(&self) -> bool {
        self.private
    }
}

impl fmt::Display for DefinitionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short)
    }
}

/// Identity of the resource kind an envelope is built for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// Name of the list envelope, e.g. `FooList`.
    pub fn list_kind(&self) -> String {
        format!("{}List", self.kind)
    }

    /// Same group and version with a different kind.
    pub fn with_kind(&self, kind: impl Into<String>) -> Self {
        Self {
            group: self.group.clone(),
            version: self.version.clone(),
            kind: kind.into(),
        }
    }
}
