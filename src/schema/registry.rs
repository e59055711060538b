//! Schema registry binding each object type to its immutable schema
//!
//! - One schema per type name
//! - Registered schemas are never replaced
//! - Lookups hand out shared `Arc<Schema>` handles

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;

/// In-memory registry of schemas keyed by type name.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema for its type.
    ///
    /// Fails if the structure is invalid or the type already has a schema.
    pub fn register(&mut self, schema: Schema) -> SchemaResult<Arc<Schema>> {
        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed(schema.type_name.clone(), e))?;

        if self.schemas.contains_key(&schema.type_name) {
            return Err(SchemaError::Immutable(schema.type_name));
        }

        debug!(type_name = %schema.type_name, fields = schema.len(), "schema registered");

        let schema = Arc::new(schema);
        self.schemas
            .insert(schema.type_name.clone(), Arc::clone(&schema));
        Ok(schema)
    }

    /// Parses a JSON schema document and registers it.
    pub fn load_json(&mut self, document: &str) -> SchemaResult<Arc<Schema>> {
        let schema = parse_schema(document)?;
        self.register(schema)
    }

    /// Get the schema for a type
    pub fn get(&self, type_name: &str) -> Option<Arc<Schema>> {
        self.schemas.get(type_name).cloned()
    }

    /// Get the schema for a type, failing if none is registered
    pub fn require(&self, type_name: &str) -> SchemaResult<Arc<Schema>> {
        self.get(type_name)
            .ok_or_else(|| SchemaError::Unknown(type_name.to_string()))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.schemas.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Parses and structurally validates a schema document.
pub fn parse_schema(document: &str) -> SchemaResult<Schema> {
    let schema: Schema = serde_json::from_str(document)
        .map_err(|e| SchemaError::malformed("<json>", format!("Invalid JSON: {}", e)))?;

    schema
        .validate_structure()
        .map_err(|e| SchemaError::malformed(schema.type_name.clone(), e))?;

    Ok(schema)
}
