//! Error types for kind schema normalization and compilation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, normalizing, or parsing a kind schema.
///
/// Compilation and envelope building never fail; only dialect-shape
/// violations and the underlying OpenAPI parser can reject a document.
#[derive(Debug, Error)]
pub enum KindSchemaError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    /// A dialect marker was present but its required sub-shape was not.
    #[error("{message}")]
    MalformedDialect { message: String },

    /// The OpenAPI v3 parser rejected the synthesized document.
    #[error("{message}")]
    Parse { message: String },
}

impl KindSchemaError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDialect {
            message: message.into(),
        }
    }

    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } | Self::ReadError { .. } => 3,
            _ => 2,
        }
    }
}
