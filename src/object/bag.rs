//! Dynamic data object backed by a declared property set

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::base::ObjectBase;
use super::{DataObject, PropertySlot};

/// A data object whose properties are declared at runtime.
///
/// A declared property holding `None` is unset and may be filled by
/// reconciliation; undeclared names are reported as missing.
#[derive(Debug)]
pub struct PropertyBag {
    base: ObjectBase,
    properties: IndexMap<String, Option<Value>>,
}

impl PropertyBag {
    pub fn new(base: ObjectBase) -> Self {
        Self {
            base,
            properties: IndexMap::new(),
        }
    }

    /// Builds a bag from a JSON object; `null` values become unset properties.
    pub fn from_json(base: ObjectBase, properties: Map<String, Value>) -> Self {
        let properties = properties
            .into_iter()
            .map(|(name, value)| {
                let value = if value.is_null() { None } else { Some(value) };
                (name, value)
            })
            .collect();
        Self { base, properties }
    }

    /// Declares an unset property
    pub fn with_property(mut self, name: impl Into<String>) -> Self {
        self.properties.insert(name.into(), None);
        self
    }

    /// Declares a property holding `value`
    pub fn with_value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name.into(), Some(value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name).and_then(Option::as_ref)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Properties as a JSON object, unset ones as `null`
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .properties
            .iter()
            .map(|(name, value)| (name.clone(), value.clone().unwrap_or(Value::Null)))
            .collect();
        Value::Object(map)
    }
}

impl DataObject for PropertyBag {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn property_slot(&self, name: &str) -> PropertySlot {
        match self.properties.get(name) {
            None => PropertySlot::Missing,
            Some(None) => PropertySlot::Unset,
            Some(Some(_)) => PropertySlot::Set,
        }
    }

    fn set_property(&mut self, name: &str, value: Value) {
        if let Some(slot) = self.properties.get_mut(name) {
            *slot = Some(value);
        }
    }
}
