//! Instance-data reconciler
//!
//! Merges a caller bundle onto an existing object's properties:
//! - meta keys are stripped first (data source, debug override)
//! - schema-bound values land only on unset properties
//! - already-set properties are never overwritten; the key is dropped with a warning
//! - keys that cannot be assigned stay in the bundle and are reported once

use serde_json::Value;
use tracing::debug;

use super::errors::{DataMapError, DataMapResult};
use super::value::{apply_debug_override, json_type_name};
use super::{DATA_SOURCE_KEY, DEBUG_LEVEL_KEY, INSTANCE_DATA_CATEGORY};
use crate::diagnostics::Severity;
use crate::object::{DataObject, PropertySlot};

/// Reconciles `bundle` onto `object`.
///
/// Only fails when `bundle` is not a mapping. Consumed keys are removed from
/// `bundle`; whatever remains afterwards could not be assigned.
pub fn reconcile<O>(object: &mut O, bundle: &mut Value) -> DataMapResult<()>
where
    O: DataObject + ?Sized,
{
    let map = match bundle {
        Value::Object(map) => map,
        other => {
            let err = DataMapError::InvalidBundle {
                found: json_type_name(other),
            };
            object.base_mut().set_error(&err.to_string());
            return Err(err);
        }
    };

    if let Some(source) = map.shift_remove(DATA_SOURCE_KEY) {
        object.base_mut().attach_data_source(source);
    }

    if let Some(level) = map.shift_remove(DEBUG_LEVEL_KEY) {
        apply_debug_override(object.base_mut().diagnostics_mut(), &level);
    }

    let Some(schema) = object.base().schema().cloned() else {
        return Ok(());
    };

    let keys: Vec<String> = map.keys().cloned().collect();
    for key in keys {
        let Some(spec) = schema.field(&key) else {
            continue;
        };

        let Some(property) = spec.property.as_deref() else {
            warn(
                object,
                &format!("Spec for '{}' has no property binding, cannot use it", key),
            );
            continue;
        };

        match object.property_slot(property) {
            PropertySlot::Unset => {
                if let Some(value) = map.shift_remove(&key) {
                    object.set_property(property, value);
                }
            }
            PropertySlot::Set => {
                warn(
                    object,
                    &format!("Ignoring '{}', property '{}' already has a value", key, property),
                );
                map.shift_remove(&key);
            }
            // The object does not expose this property; leave the key for the caller
            PropertySlot::Missing => {}
        }
    }

    debug!(
        type_name = %schema.type_name,
        unconsumed = map.len(),
        "instance data reconciled"
    );

    if !map.is_empty() {
        let mut message = format!("Could not assign {} element(s) of instance data", map.len());
        if object.base().debug_level() > 1 {
            let names: Vec<&str> = map.keys().map(String::as_str).collect();
            message.push_str(&format!(" ({})", names.join(" ")));
        }
        warn(object, &message);
    }

    Ok(())
}

fn warn<O: DataObject + ?Sized>(object: &mut O, message: &str) {
    object
        .base_mut()
        .diagnostics_mut()
        .emit(message, Severity::Warn, INSTANCE_DATA_CATEGORY);
}
