//! Instance data maps
//!
//! Two operations over a per-type [`Schema`](crate::schema::Schema):
//! - build: produce a normalized record from scratch
//! - reconcile: merge a bundle onto a live object without overwriting
//!
//! # Meta keys
//!
//! Bundles may carry keys that are consumed before any field lookup and
//! never appear in a record:
//! - `dataagent`: data-source handle stored on the object (reconcile only)
//! - `debug`: per-instance debug level override

mod builder;
mod errors;
mod reconciler;
mod value;

pub use builder::{build_data_map, DataMapBuilder, Record};
pub use errors::{DataMapError, DataMapResult};
pub use reconciler::reconcile;
pub use value::{is_canonical_uuid, is_truthy, json_type_name};

/// Meta key carrying the data-source handle
pub const DATA_SOURCE_KEY: &str = "dataagent";

/// Meta key carrying a debug level override
pub const DEBUG_LEVEL_KEY: &str = "debug";

/// Diagnostic category for builder failures
pub const DATA_MAP_CATEGORY: &str = "datamap";

/// Diagnostic category for reconciler warnings
pub const INSTANCE_DATA_CATEGORY: &str = "instance-data";
