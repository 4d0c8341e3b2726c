//! Schema document loading from files and strings.

use std::path::Path;

use crate::document::SchemaDocument;
use crate::error::KindSchemaError;

/// Load and normalize a schema document from a file path.
///
/// # Errors
///
/// Returns `KindSchemaError::FileNotFound` if the file doesn't exist,
/// `KindSchemaError::InvalidJson` if it isn't valid JSON, or
/// `KindSchemaError::MalformedDialect` if its dialect shape is wrong.
pub fn load_document(path: &Path) -> Result<SchemaDocument, KindSchemaError> {
    if !path.exists() {
        return Err(KindSchemaError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read(path).map_err(|source| KindSchemaError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    SchemaDocument::from_slice(&content)
}

/// Load and normalize a schema document from a JSON string.
pub fn load_document_str(content: &str) -> Result<SchemaDocument, KindSchemaError> {
    SchemaDocument::from_slice(content.as_bytes())
}
