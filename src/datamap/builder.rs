//! Data-map builder producing normalized instance records
//!
//! For every schema field, in declaration order:
//! - a truthy bundle value is validated against the datatype and copied verbatim
//! - otherwise the declared default is used (`"__now"` on timestamps becomes
//!   the current epoch seconds)
//! - otherwise the datatype zero value is used
//!
//! The first invalid field aborts the build. Nothing is returned on failure.

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::debug;

use super::errors::{DataMapError, DataMapResult};
use super::value::{apply_debug_override, is_canonical_uuid, is_truthy, json_type_name};
use super::{DATA_MAP_CATEGORY, DEBUG_LEVEL_KEY};
use crate::diagnostics::{Diagnostics, Severity};
use crate::schema::{DataType, FieldSpec, Schema};

/// Normalized instance data: exactly one entry per schema field, in order.
pub type Record = Map<String, Value>;

/// Builds records for one schema.
///
/// The builder holds no state besides the borrowed schema and never mutates
/// the bundle it is given.
#[derive(Debug, Clone, Copy)]
pub struct DataMapBuilder<'a> {
    schema: &'a Schema,
}

impl<'a> DataMapBuilder<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// Builds a record, using the wall clock for `"__now"` defaults.
    pub fn build(&self, bundle: &Map<String, Value>) -> DataMapResult<Record> {
        self.build_at(bundle, Utc::now().timestamp())
    }

    /// Builds a record with `now` (epoch seconds) as the build time.
    pub fn build_at(&self, bundle: &Map<String, Value>, now: i64) -> DataMapResult<Record> {
        let mut record = Record::new();

        for (moniker, spec) in &self.schema.fields {
            let value = match bundle.get(moniker).filter(|v| is_truthy(v)) {
                Some(value) => {
                    check_value(moniker, spec, value)?;
                    value.clone()
                }
                None => fallback_value(spec, now),
            };
            record.insert(moniker.clone(), value);
        }

        debug!(
            type_name = %self.schema.type_name,
            fields = record.len(),
            "data map built"
        );

        Ok(record)
    }
}

/// Validates a present value against its field datatype.
fn check_value(moniker: &str, spec: &FieldSpec, value: &Value) -> DataMapResult<()> {
    match spec.datatype {
        DataType::Uuid => {
            if !value.as_str().is_some_and(is_canonical_uuid) {
                return Err(DataMapError::InvalidUuid {
                    field: moniker.to_string(),
                });
            }
        }
        DataType::Array => {
            if !(value.is_object() || value.is_array()) {
                return Err(DataMapError::InvalidArray {
                    field: moniker.to_string(),
                });
            }
        }
        DataType::Float => {
            if !value.is_f64() {
                return Err(type_error(moniker, DataType::Float, value));
            }
        }
        DataType::String => {
            if !value.is_string() {
                return Err(type_error(moniker, DataType::String, value));
            }
        }
        DataType::None | DataType::Int | DataType::Timestamp => {}
    }

    Ok(())
}

/// Value used when the bundle has nothing usable for a field.
fn fallback_value(spec: &FieldSpec, now: i64) -> Value {
    if spec.defaults_to_now() {
        return Value::from(now);
    }

    match &spec.default {
        Some(default) => default.clone(),
        None => spec.datatype.zero_value(),
    }
}

fn type_error(moniker: &str, expected: DataType, actual: &Value) -> DataMapError {
    DataMapError::InvalidType {
        field: moniker.to_string(),
        expected,
        found: json_type_name(actual),
    }
}

/// Full build step for an object: schema check, bundle normalization,
/// debug override, then the record build. Failures are narrated as errors
/// on `diagnostics` before being returned.
pub fn build_data_map(
    schema: Option<&Schema>,
    bundle: Option<Value>,
    diagnostics: &mut Diagnostics,
) -> DataMapResult<Record> {
    let Some(schema) = schema else {
        let err = DataMapError::NoSchema {
            type_name: diagnostics.type_name().to_string(),
        };
        diagnostics.emit(&err.to_string(), Severity::Error, DATA_MAP_CATEGORY);
        return Err(err);
    };

    // Anything that is not a mapping counts as an empty bundle
    let mut bundle = match bundle {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };

    if let Some(level) = bundle.shift_remove(DEBUG_LEVEL_KEY) {
        apply_debug_override(diagnostics, &level);
    }

    DataMapBuilder::new(schema).build(&bundle).map_err(|err| {
        let message = format!("Cannot build data map for {}: {}", schema.type_name, err);
        diagnostics.emit(&message, Severity::Error, DATA_MAP_CATEGORY);
        err
    })
}
