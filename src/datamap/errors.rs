//! Data-map error types
//!
//! Error codes:
//! - UOBJ_INVALID_BUNDLE
//! - UOBJ_NO_SCHEMA
//! - UOBJ_INVALID_UUID
//! - UOBJ_INVALID_ARRAY
//! - UOBJ_INVALID_TYPE
//!
//! All of these are permanent for the same schema and bundle.

use thiserror::Error;

use crate::schema::DataType;

/// Result type for data-map operations
pub type DataMapResult<T> = Result<T, DataMapError>;

/// Validation failures raised while reconciling or building instance data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataMapError {
    /// Bundle is not a key/value mapping
    #[error("Instance data must be a key/value mapping, got {found}")]
    InvalidBundle { found: &'static str },

    /// The object type declares no schema
    #[error("Type '{type_name}' declares no data map schema")]
    NoSchema { type_name: String },

    /// Value of a uuid field is not a canonical lowercase UUID
    #[error("Field '{field}' is not a valid UUID")]
    InvalidUuid { field: String },

    /// Value of an array field is neither a mapping nor a sequence
    #[error("Field '{field}' is not an array")]
    InvalidArray { field: String },

    /// Value does not match the declared datatype
    #[error("Field '{field}' expected {}, got {found}", .expected.type_name())]
    InvalidType {
        field: String,
        expected: DataType,
        found: &'static str,
    },
}

impl DataMapError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            DataMapError::InvalidBundle { .. } => "UOBJ_INVALID_BUNDLE",
            DataMapError::NoSchema { .. } => "UOBJ_NO_SCHEMA",
            DataMapError::InvalidUuid { .. } => "UOBJ_INVALID_UUID",
            DataMapError::InvalidArray { .. } => "UOBJ_INVALID_ARRAY",
            DataMapError::InvalidType { .. } => "UOBJ_INVALID_TYPE",
        }
    }

    /// Field the failure is about, when there is one
    pub fn field(&self) -> Option<&str> {
        match self {
            DataMapError::InvalidUuid { field }
            | DataMapError::InvalidArray { field }
            | DataMapError::InvalidType { field, .. } => Some(field),
            DataMapError::InvalidBundle { .. } | DataMapError::NoSchema { .. } => None,
        }
    }
}
