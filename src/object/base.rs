//! Shared state every data object embeds

use std::sync::Arc;

use serde_json::Value;

use crate::datamap::{build_data_map, DataMapResult, Record};
use crate::diagnostics::{Diagnostics, DiagnosticsConfig, OutputDestination, Severity};
use crate::schema::{Schema, SchemaRegistry};

/// Base state for a data object: its schema, diagnostics sink, and the
/// data-source handle a bundle may attach.
#[derive(Debug)]
pub struct ObjectBase {
    schema: Option<Arc<Schema>>,
    diagnostics: Diagnostics,
    data_source: Option<Value>,
}

impl ObjectBase {
    /// Creates a base with no schema.
    pub fn new(type_name: impl Into<String>, config: DiagnosticsConfig) -> Self {
        Self {
            schema: None,
            diagnostics: Diagnostics::new(type_name, config),
            data_source: None,
        }
    }

    /// Creates a base bound to whatever schema `registry` holds for the type.
    pub fn for_type(registry: &SchemaRegistry, type_name: &str, config: DiagnosticsConfig) -> Self {
        let base = Self::new(type_name, config);
        match registry.get(type_name) {
            Some(schema) => base.with_schema(schema),
            None => base,
        }
    }

    pub fn with_schema(mut self, schema: Arc<Schema>) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_log_destination(mut self, destination: impl OutputDestination + 'static) -> Self {
        self.diagnostics = self.diagnostics.with_log_destination(destination);
        self
    }

    pub fn with_interactive_destination(
        mut self,
        destination: impl OutputDestination + 'static,
    ) -> Self {
        self.diagnostics = self.diagnostics.with_interactive_destination(destination);
        self
    }

    pub fn type_name(&self) -> &str {
        self.diagnostics.type_name()
    }

    pub fn schema(&self) -> Option<&Arc<Schema>> {
        self.schema.as_ref()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Current debug level (instance override or configured level)
    pub fn debug_level(&self) -> u8 {
        self.diagnostics.debug_level()
    }

    pub fn set_debug_level(&mut self, level: u8) {
        self.diagnostics.set_debug_level(level);
    }

    pub fn log_mode(&self) -> bool {
        self.diagnostics.log_mode()
    }

    pub fn set_log_mode(&mut self, log_mode: bool) {
        self.diagnostics.set_log_mode(log_mode);
    }

    /// Emit a diagnostic requested at `level`.
    pub fn show(&mut self, message: &str, level: u8, severity: Severity, category: &str) -> bool {
        self.diagnostics.show(message, level, severity, category)
    }

    pub fn set_error(&mut self, message: &str) -> bool {
        self.diagnostics.set_error(message)
    }

    pub fn set_warning(&mut self, message: &str) -> bool {
        self.diagnostics.set_warning(message)
    }

    /// Data-source handle attached by the last bundle that carried one
    pub fn data_source(&self) -> Option<&Value> {
        self.data_source.as_ref()
    }

    pub(crate) fn attach_data_source(&mut self, source: Value) {
        self.data_source = Some(source);
    }

    /// Builds a normalized record from `bundle` against this type's schema.
    pub fn build_data_map(&mut self, bundle: Option<Value>) -> DataMapResult<Record> {
        build_data_map(self.schema.as_deref(), bundle, &mut self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamap::DataMapError;
    use crate::diagnostics::MemoryDestination;
    use crate::schema::FieldSpec;
    use serde_json::json;

    #[test]
    fn test_for_type_binds_registered_schema() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(Schema::from_fields("Session", [("id", FieldSpec::uuid())]))
            .unwrap();

        let bound = ObjectBase::for_type(&registry, "Session", DiagnosticsConfig::default());
        assert!(bound.schema().is_some());

        let unbound = ObjectBase::for_type(&registry, "Other", DiagnosticsConfig::default());
        assert!(unbound.schema().is_none());
        assert_eq!(unbound.type_name(), "Other");
    }

    #[test]
    fn test_build_without_schema_fails() {
        let memory = MemoryDestination::new();
        let mut base = ObjectBase::new("Plain", DiagnosticsConfig::verbose(1))
            .with_interactive_destination(memory.clone());

        let err = base.build_data_map(Some(json!({"a": 1}))).unwrap_err();
        assert_eq!(err, DataMapError::NoSchema { type_name: "Plain".into() });
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_build_with_schema() {
        let schema = Schema::from_fields("Session", [("hits", FieldSpec::int().with_default(5))]);
        let mut base =
            ObjectBase::new("Session", DiagnosticsConfig::default()).with_schema(Arc::new(schema));

        let record = base.build_data_map(None).unwrap();
        assert_eq!(record["hits"], json!(5));
    }

    #[test]
    fn test_log_mode_toggle() {
        let log = MemoryDestination::new();
        let mut base = ObjectBase::new("Session", DiagnosticsConfig::verbose(1))
            .with_log_destination(log.clone());

        assert!(!base.log_mode());
        base.set_log_mode(true);
        base.set_warning("logged");
        assert_eq!(log.len(), 1);
    }
}
