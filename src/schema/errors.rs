//! Schema registration error types
//!
//! Error codes:
//! - UOBJ_SCHEMA_MALFORMED
//! - UOBJ_SCHEMA_IMMUTABLE
//! - UOBJ_UNKNOWN_SCHEMA

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while defining or registering schemas
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Schema document could not be parsed or is structurally invalid
    #[error("Malformed schema '{source_name}': {reason}")]
    Malformed { source_name: String, reason: String },

    /// A schema is already associated with this type
    #[error("Schema for type '{0}' is already registered and immutable")]
    Immutable(String),

    /// No schema registered under this type name
    #[error("No schema registered for type '{0}'")]
    Unknown(String),
}

impl SchemaError {
    pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::Malformed { .. } => "UOBJ_SCHEMA_MALFORMED",
            SchemaError::Immutable(_) => "UOBJ_SCHEMA_IMMUTABLE",
            SchemaError::Unknown(_) => "UOBJ_UNKNOWN_SCHEMA",
        }
    }
}
