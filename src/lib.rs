//! uobject - base-object mixin for data objects
//!
//! Leveled, destination-aware diagnostics plus schema-driven instance data:
//! a builder that normalizes an untyped bundle into a record, and a
//! reconciler that merges extra bundle data onto live object properties.

pub mod cli;
pub mod datamap;
pub mod diagnostics;
pub mod object;
pub mod schema;

pub use datamap::{DataMapBuilder, DataMapError, DataMapResult, Record};
pub use diagnostics::{Diagnostics, DiagnosticsConfig, OutputContext, Severity};
pub use object::{DataObject, ObjectBase, PropertyBag, PropertySlot};
pub use schema::{DataType, FieldSpec, Schema, SchemaError, SchemaRegistry};
