//! Data object mixin
//!
//! Types embed an [`ObjectBase`] and implement [`DataObject`] to expose their
//! properties to the reconciler.
//!
//! ```ignore
//! struct Ticket { base: ObjectBase, title: Option<String> }
//!
//! impl DataObject for Ticket {
//!     fn base(&self) -> &ObjectBase { &self.base }
//!     fn base_mut(&mut self) -> &mut ObjectBase { &mut self.base }
//!     fn property_slot(&self, name: &str) -> PropertySlot { /* ... */ }
//!     fn set_property(&mut self, name: &str, value: Value) { /* ... */ }
//! }
//! ```

mod bag;
mod base;

pub use bag::PropertyBag;
pub use base::ObjectBase;

use serde_json::Value;

use crate::datamap::{reconcile, DataMapResult, Record};

/// State of a named property on a live object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertySlot {
    /// The object has no such property
    Missing,
    /// The property exists and holds no value
    Unset,
    /// The property already holds a value
    Set,
}

/// An object carrying instance data described by a schema.
pub trait DataObject {
    fn base(&self) -> &ObjectBase;

    fn base_mut(&mut self) -> &mut ObjectBase;

    /// Reports whether `name` exists and holds a value.
    fn property_slot(&self, name: &str) -> PropertySlot;

    /// Stores `value` in property `name`. Only called for `Unset` slots.
    fn set_property(&mut self, name: &str, value: Value);

    /// Merges `bundle` onto this object's unset properties.
    fn set_instance_data(&mut self, bundle: &mut Value) -> DataMapResult<()> {
        reconcile(self, bundle)
    }

    /// Builds a normalized record for this object's type.
    fn build_instance_data_map(&mut self, bundle: Option<Value>) -> DataMapResult<Record> {
        self.base_mut().build_data_map(bundle)
    }
}
