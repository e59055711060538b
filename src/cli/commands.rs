//! CLI command implementations
//!
//! Each command decodes one request, runs it against a fresh object, and
//! writes one response. Diagnostics always go to stderr so stdout stays a
//! single JSON line.

use std::io;

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::diagnostics::{DiagnosticsConfig, OutputContext, WriterDestination};
use crate::object::{DataObject, ObjectBase, PropertyBag};
use crate::schema::{parse_schema, Schema, SchemaRegistry};

use super::args::{Cli, Command};
use super::errors::CliResult;
use super::io::{read_request, write_error, write_response};

/// `build` request body
#[derive(Debug, Deserialize)]
struct BuildRequest {
    schema: Schema,
    #[serde(default)]
    bundle: Option<Value>,
}

/// `reconcile` request body
#[derive(Debug, Deserialize)]
struct ReconcileRequest {
    #[serde(default)]
    schema: Option<Schema>,
    #[serde(default)]
    properties: Map<String, Value>,
    bundle: Value,
}

/// Parse arguments, install logging, and run the selected command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_tracing();
    run_command(&cli)
}

/// Install a stderr fmt subscriber filtered by `RUST_LOG` (default `warn`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Dispatch a parsed command line.
pub fn run_command(cli: &Cli) -> CliResult<()> {
    let config = cli.diagnostics_config();
    let request = read_request()?;

    debug!(command = ?cli.command, "running command");

    let result = match cli.command {
        Command::Build => build(&request, &config),
        Command::Reconcile => reconcile(&request, &config),
        Command::CheckSchema => check_schema(&request),
    };

    match result {
        Ok(data) => write_response(data),
        Err(err) => {
            write_error(err.code_str(), err.message())?;
            Err(err)
        }
    }
}

/// Builds a normalized record from `{"schema", "bundle"}`.
pub fn build(request: &Value, config: &DiagnosticsConfig) -> CliResult<Value> {
    let request: BuildRequest = serde_json::from_value(request.clone())?;

    let mut registry = SchemaRegistry::new();
    let schema = registry.register(request.schema)?;
    let mut base = object_base(&schema.type_name, config).with_schema(schema);

    let record = base.build_data_map(request.bundle)?;
    Ok(Value::Object(record))
}

/// Reconciles `{"bundle"}` onto `{"properties"}`, returning both afterwards.
pub fn reconcile(request: &Value, config: &DiagnosticsConfig) -> CliResult<Value> {
    let request: ReconcileRequest = serde_json::from_value(request.clone())?;

    let base = match request.schema {
        Some(schema) => {
            let mut registry = SchemaRegistry::new();
            let schema = registry.register(schema)?;
            object_base(&schema.type_name, config).with_schema(schema)
        }
        None => object_base("PropertyBag", config),
    };

    let mut object = PropertyBag::from_json(base, request.properties);
    let mut bundle = request.bundle;
    object.set_instance_data(&mut bundle)?;

    Ok(json!({
        "properties": object.to_json(),
        "unconsumed": bundle,
        "data_source": object.base().data_source().cloned(),
    }))
}

/// Validates a schema document and summarizes it.
pub fn check_schema(request: &Value) -> CliResult<Value> {
    let document = serde_json::to_string(request)?;
    let schema = parse_schema(&document)?;

    let fields: Vec<Value> = schema
        .fields
        .iter()
        .map(|(moniker, spec)| {
            json!({
                "name": moniker,
                "datatype": spec.datatype.type_name(),
                "property": spec.property,
            })
        })
        .collect();

    Ok(json!({
        "type_name": schema.type_name,
        "fields": fields,
    }))
}

/// Object base whose diagnostics all land on stderr.
fn object_base(type_name: &str, config: &DiagnosticsConfig) -> ObjectBase {
    let base = ObjectBase::new(type_name, config.clone());
    match config.context {
        OutputContext::Console => base,
        OutputContext::Server => {
            base.with_interactive_destination(WriterDestination::markup(io::stderr()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DiagnosticsConfig {
        DiagnosticsConfig::default()
    }

    #[test]
    fn test_build_command() {
        let request = json!({
            "schema": {
                "type_name": "Session",
                "fields": {
                    "id": {"datatype": "uuid"},
                    "hits": {"datatype": "int", "default": 5}
                }
            },
            "bundle": {"id": "8d557775-e068-49d6-8126-537a8f57416a"}
        });

        let data = build(&request, &config()).unwrap();
        assert_eq!(
            data,
            json!({"id": "8d557775-e068-49d6-8126-537a8f57416a", "hits": 5})
        );
    }

    #[test]
    fn test_build_command_validation_error() {
        let request = json!({
            "schema": {"type_name": "Session", "fields": {"id": {"datatype": "uuid"}}},
            "bundle": {"id": "nope"}
        });

        let err = build(&request, &config()).unwrap_err();
        assert_eq!(err.code_str(), "UOBJ_INVALID_UUID");
    }

    #[test]
    fn test_build_command_bad_request() {
        let err = build(&json!({"bundle": {}}), &config()).unwrap_err();
        assert_eq!(err.code_str(), "UOBJ_CLI_BAD_REQUEST");
    }

    #[test]
    fn test_reconcile_command() {
        let request = json!({
            "schema": {
                "type_name": "Ticket",
                "fields": {
                    "title": {"property": "title"},
                    "owner": {"property": "owner"}
                }
            },
            "properties": {"title": null, "owner": "A"},
            "bundle": {"title": "Hello", "owner": "B", "stray": 1, "dataagent": "db"}
        });

        let data = reconcile(&request, &config()).unwrap();
        assert_eq!(data["properties"], json!({"title": "Hello", "owner": "A"}));
        assert_eq!(data["unconsumed"], json!({"stray": 1}));
        assert_eq!(data["data_source"], json!("db"));
    }

    #[test]
    fn test_reconcile_command_invalid_bundle() {
        let request = json!({"properties": {}, "bundle": "flat"});
        let err = reconcile(&request, &config()).unwrap_err();
        assert_eq!(err.code_str(), "UOBJ_INVALID_BUNDLE");
    }

    #[test]
    fn test_check_schema_command() {
        let request = json!({
            "type_name": "Ticket",
            "fields": {"id": {"datatype": "uuid"}, "title": {"property": "title"}}
        });

        let data = check_schema(&request).unwrap();
        assert_eq!(data["type_name"], json!("Ticket"));
        assert_eq!(data["fields"][0]["datatype"], json!("uuid"));
        assert_eq!(data["fields"][1]["property"], json!("title"));
    }

    #[test]
    fn test_check_schema_rejects_meta_key() {
        let request = json!({"type_name": "Ticket", "fields": {"debug": {}}});
        let err = check_schema(&request).unwrap_err();
        assert_eq!(err.code_str(), "UOBJ_SCHEMA_MALFORMED");
    }
}
