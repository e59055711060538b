//! Schema type definitions
//!
//! Supported datatypes:
//! - none: opaque value, no validation
//! - string: UTF-8 string
//! - int: integer, passed through
//! - float: floating point number
//! - array: mapping or sequence
//! - uuid: canonical lowercase 8-4-4-4-12 hex string
//! - timestamp: epoch seconds, may default to the build time

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::datamap::{DATA_SOURCE_KEY, DEBUG_LEVEL_KEY};

/// Default sentinel that materializes the current epoch time on timestamp fields.
pub const NOW_SENTINEL: &str = "__now";

/// Older spelling of [`NOW_SENTINEL`], still accepted.
pub const LEGACY_NOW_SENTINEL: &str = "__time";

/// Field datatypes understood by the data-map builder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// UTF-8 string
    String,
    /// Integer
    Int,
    /// Floating point number
    Float,
    /// Mapping or sequence
    Array,
    /// Canonical lowercase UUID string
    Uuid,
    /// Epoch seconds
    Timestamp,
    /// No validation or coercion; unknown datatype names land here too
    #[default]
    #[serde(other)]
    None,
}

impl DataType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::None => "none",
            DataType::String => "string",
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::Array => "array",
            DataType::Uuid => "uuid",
            DataType::Timestamp => "timestamp",
        }
    }

    /// Value used when a field has neither a bundle value nor a default.
    pub fn zero_value(&self) -> Value {
        match self {
            DataType::Array => Value::Object(serde_json::Map::new()),
            DataType::Int | DataType::Timestamp => Value::from(0),
            DataType::Float => Value::from(0.0),
            DataType::String | DataType::Uuid | DataType::None => Value::String(String::new()),
        }
    }
}

/// One entry in a type's schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field datatype
    #[serde(default)]
    pub datatype: DataType,
    /// Literal default, or the now sentinel on timestamp fields.
    /// An explicit `null` is kept as a null default.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,
    /// Object property this field binds to during reconciliation
    #[serde(default, alias = "property_name", skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

/// Any key that is present, `null` included, yields `Some`.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl FieldSpec {
    pub fn new(datatype: DataType) -> Self {
        Self {
            datatype,
            default: None,
            property: None,
        }
    }

    pub fn string() -> Self {
        Self::new(DataType::String)
    }

    pub fn int() -> Self {
        Self::new(DataType::Int)
    }

    pub fn float() -> Self {
        Self::new(DataType::Float)
    }

    pub fn array() -> Self {
        Self::new(DataType::Array)
    }

    pub fn uuid() -> Self {
        Self::new(DataType::Uuid)
    }

    pub fn timestamp() -> Self {
        Self::new(DataType::Timestamp)
    }

    /// Untyped field
    pub fn opaque() -> Self {
        Self::new(DataType::None)
    }

    /// Sets a literal default value
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Defaults the field to the build time
    pub fn default_now(mut self) -> Self {
        self.default = Some(Value::String(NOW_SENTINEL.into()));
        self
    }

    /// Binds the field to an object property
    pub fn bound_to(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    /// True when the default should be replaced by the current time.
    ///
    /// Only timestamp fields honour the sentinel; elsewhere it is a plain string.
    pub fn defaults_to_now(&self) -> bool {
        self.datatype == DataType::Timestamp
            && matches!(
                self.default.as_ref().and_then(Value::as_str),
                Some(NOW_SENTINEL) | Some(LEGACY_NOW_SENTINEL)
            )
    }
}

/// Immutable field specification for one object type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Name of the type this schema belongs to
    pub type_name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field specs in declaration order
    pub fields: IndexMap<String, FieldSpec>,
}

impl Schema {
    /// Create a new schema
    pub fn new(type_name: impl Into<String>, fields: IndexMap<String, FieldSpec>) -> Self {
        Self {
            type_name: type_name.into(),
            description: None,
            fields,
        }
    }

    /// Build a schema from `(moniker, spec)` pairs, keeping their order
    pub fn from_fields<I, K>(type_name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldSpec)>,
        K: Into<String>,
    {
        let fields = fields.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self::new(type_name, fields)
    }

    pub fn field(&self, moniker: &str) -> Option<&FieldSpec> {
        self.fields.get(moniker)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Monikers in declaration order
    pub fn monikers(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Validates the schema structure itself (not a bundle)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.type_name.trim().is_empty() {
            return Err("Schema must name its type".into());
        }

        for moniker in self.fields.keys() {
            if moniker.is_empty() {
                return Err("Field names must not be empty".into());
            }
            // Meta keys are stripped before field lookup and would never match
            if moniker == DATA_SOURCE_KEY || moniker == DEBUG_LEVEL_KEY {
                return Err(format!("Field '{}' collides with a reserved meta key", moniker));
            }
        }

        Ok(())
    }
}
