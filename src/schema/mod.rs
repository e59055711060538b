//! Per-type field schemas for instance data
//!
//! A schema is declared once per object type, registered, and then shared
//! read-only by every instance of that type.
//!
//! # Design Principles
//!
//! - Explicit datatype enum, no runtime type sniffing
//! - Declaration order is preserved and drives build order
//! - Registered schemas are immutable

mod errors;
mod registry;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use registry::{parse_schema, SchemaRegistry};
pub use types::{DataType, FieldSpec, Schema, LEGACY_NOW_SENTINEL, NOW_SENTINEL};
