//! Value inspection helpers shared by the builder and reconciler

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::trace;

use crate::diagnostics::Diagnostics;

static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .unwrap_or_else(|e| panic!("invalid UUID pattern: {e}"))
});

/// True for canonical 8-4-4-4-12 lowercase hex UUIDs.
pub fn is_canonical_uuid(s: &str) -> bool {
    UUID_PATTERN.is_match(s)
}

/// False for null, false, zero, and empty strings or collections.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Applies a bundle's debug-level override. Only non-negative integers count;
/// anything else is dropped. Levels above 255 saturate.
pub(crate) fn apply_debug_override(diagnostics: &mut Diagnostics, value: &Value) {
    match value.as_u64() {
        Some(level) => diagnostics.set_debug_level(u8::try_from(level).unwrap_or(u8::MAX)),
        None => trace!(value = %value, "ignoring non-integer debug override"),
    }
}
