//! Data Map Invariant Tests
//!
//! Builder properties:
//! - Totality: a record holds exactly the schema's fields
//! - Determinism: same schema and bundle give the same record
//! - First failure wins, in declaration order
//! - Defaults and zero values fill absent fields
//! - "__now" timestamps fall inside the call window

use chrono::Utc;
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use uobject::datamap::DataMapBuilder;
use uobject::diagnostics::MemoryDestination;
use uobject::{
    DataMapError, DataType, DiagnosticsConfig, FieldSpec, ObjectBase, Schema, SchemaRegistry,
};
use uuid::Uuid;

// =============================================================================
// Helper Functions
// =============================================================================

fn object(schema: Schema) -> ObjectBase {
    ObjectBase::new(schema.type_name.clone(), DiagnosticsConfig::default())
        .with_schema(Arc::new(schema))
}

fn id_schema() -> Schema {
    Schema::from_fields("Session", [("id", FieldSpec::uuid())])
}

fn datatype_strategy() -> impl Strategy<Value = DataType> {
    prop_oneof![
        Just(DataType::None),
        Just(DataType::String),
        Just(DataType::Int),
        Just(DataType::Float),
        Just(DataType::Array),
        Just(DataType::Uuid),
        Just(DataType::Timestamp),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[a-z0-9-]{0,12}".prop_map(Value::from),
        Just(json!([1, 2])),
        Just(json!({"k": 1})),
    ]
}

// =============================================================================
// Totality Tests
// =============================================================================

proptest! {
    /// Any successful build returns exactly the schema keys, in order.
    #[test]
    fn prop_record_has_exactly_schema_keys(
        fields in proptest::collection::vec(
            ("[a-z]{1,6}", datatype_strategy(), value_strategy()),
            0..12,
        )
    ) {
        let schema = Schema::from_fields(
            "Prop",
            fields.iter().map(|(name, datatype, _)| (name.clone(), FieldSpec::new(*datatype))),
        );
        let bundle: Map<String, Value> = fields
            .iter()
            .map(|(name, _, value)| (name.clone(), value.clone()))
            .collect();

        if let Ok(record) = DataMapBuilder::new(&schema).build_at(&bundle, 0) {
            let keys: Vec<&str> = record.keys().map(String::as_str).collect();
            let expected: Vec<&str> = schema.monikers().collect();
            prop_assert_eq!(keys, expected);
        }
    }

    /// An empty bundle always builds, whatever the datatypes.
    #[test]
    fn prop_empty_bundle_always_builds(
        datatypes in proptest::collection::vec(datatype_strategy(), 0..10)
    ) {
        let schema = Schema::from_fields(
            "Prop",
            datatypes.iter().enumerate().map(|(i, dt)| (format!("f{}", i), FieldSpec::new(*dt))),
        );

        let record = DataMapBuilder::new(&schema).build_at(&Map::new(), 0);
        prop_assert!(record.is_ok());
        prop_assert_eq!(record.unwrap().len(), schema.len());
    }

    /// With fields before `first_bad` valid and the rest invalid, the error
    /// names `first_bad`.
    #[test]
    fn prop_first_failure_wins(count in 1usize..10, offset in 0usize..10) {
        let first_bad = offset % count;
        let schema = Schema::from_fields(
            "Prop",
            (0..count).map(|i| (format!("f{}", i), FieldSpec::string())),
        );
        let bundle: Map<String, Value> = (0..count)
            .map(|i| {
                let value = if i < first_bad { json!("ok") } else { json!(i + 1) };
                (format!("f{}", i), value)
            })
            .collect();

        let err = DataMapBuilder::new(&schema).build_at(&bundle, 0).unwrap_err();
        let expected = format!("f{}", first_bad);
        prop_assert_eq!(err.field(), Some(expected.as_str()));
    }
}

#[test]
fn test_record_omits_bundle_extras() {
    let mut base = object(id_schema());
    let record = base
        .build_data_map(Some(json!({"stray": 1, "debug": 2, "dataagent": "db"})))
        .unwrap();

    assert_eq!(Value::Object(record), json!({"id": ""}));
}

// =============================================================================
// Determinism Tests
// =============================================================================

/// Same bundle builds the same record every time.
#[test]
fn test_build_is_deterministic() {
    let schema = Schema::from_fields(
        "Session",
        [
            ("id", FieldSpec::uuid()),
            ("name", FieldSpec::string()),
            ("hits", FieldSpec::int().with_default(5)),
        ],
    );
    let bundle = json!({"id": "8d557775-e068-49d6-8126-537a8f57416a", "name": "Alice"});
    let mut base = object(schema);

    let first = base.build_data_map(Some(bundle.clone())).unwrap();
    for _ in 0..100 {
        assert_eq!(base.build_data_map(Some(bundle.clone())).unwrap(), first);
    }
}

/// Invalid bundle fails the same way every time.
#[test]
fn test_invalid_bundle_fails_consistently() {
    let mut base = object(id_schema());

    for _ in 0..100 {
        let err = base.build_data_map(Some(json!({"id": "not-a-uuid"}))).unwrap_err();
        assert_eq!(err, DataMapError::InvalidUuid { field: "id".into() });
    }
}

// =============================================================================
// Default Fallback Tests
// =============================================================================

#[test]
fn test_int_without_default_is_zero() {
    let mut base = object(Schema::from_fields("T", [("n", FieldSpec::int())]));
    let record = base.build_data_map(Some(json!({}))).unwrap();
    assert_eq!(record["n"], json!(0));
}

#[test]
fn test_int_with_default() {
    let mut base = object(Schema::from_fields("T", [("n", FieldSpec::int().with_default(5))]));
    let record = base.build_data_map(Some(json!({}))).unwrap();
    assert_eq!(record["n"], json!(5));
}

#[test]
fn test_timestamp_now_within_call_window() {
    let mut base = object(Schema::from_fields("T", [("ts", FieldSpec::timestamp().default_now())]));

    let before = Utc::now().timestamp();
    let record = base.build_data_map(Some(json!({}))).unwrap();
    let after = Utc::now().timestamp();

    let ts = record["ts"].as_i64().unwrap();
    assert!(ts >= before && ts <= after, "{ts} not in [{before}, {after}]");
}

#[test]
fn test_timestamp_without_default_is_zero() {
    let mut base = object(Schema::from_fields("T", [("ts", FieldSpec::timestamp())]));
    let record = base.build_data_map(None).unwrap();
    assert_eq!(record["ts"], json!(0));
}

// =============================================================================
// UUID Tests
// =============================================================================

#[test]
fn test_uuid_accepted() {
    let mut base = object(id_schema());
    let record = base
        .build_data_map(Some(json!({"id": "8d557775-e068-49d6-8126-537a8f57416a"})))
        .unwrap();
    assert_eq!(Value::Object(record), json!({"id": "8d557775-e068-49d6-8126-537a8f57416a"}));
}

#[test]
fn test_generated_uuids_accepted() {
    let mut base = object(id_schema());
    for _ in 0..20 {
        let id = Uuid::new_v4().to_string();
        let record = base.build_data_map(Some(json!({ "id": &id }))).unwrap();
        assert_eq!(record["id"], json!(id));
    }
}

#[test]
fn test_uuid_rejected() {
    let mut base = object(id_schema());
    let err = base.build_data_map(Some(json!({"id": "not-a-uuid"}))).unwrap_err();
    assert_eq!(err, DataMapError::InvalidUuid { field: "id".into() });
}

#[test]
fn test_uppercase_uuid_rejected() {
    let mut base = object(id_schema());
    let id = Uuid::new_v4().to_string().to_uppercase();
    let err = base.build_data_map(Some(json!({ "id": id }))).unwrap_err();
    assert_eq!(err.code(), "UOBJ_INVALID_UUID");
}

// =============================================================================
// Schema Registration Tests
// =============================================================================

#[test]
fn test_registered_schema_shared_by_instances() {
    let mut registry = SchemaRegistry::new();
    registry
        .register(Schema::from_fields("Session", [("hits", FieldSpec::int().with_default(1))]))
        .unwrap();

    let mut a = ObjectBase::for_type(&registry, "Session", DiagnosticsConfig::default());
    let mut b = ObjectBase::for_type(&registry, "Session", DiagnosticsConfig::default());

    assert!(Arc::ptr_eq(a.schema().unwrap(), b.schema().unwrap()));
    assert_eq!(a.build_data_map(None).unwrap(), b.build_data_map(None).unwrap());
}

#[test]
fn test_failed_build_narrated_once() {
    let memory = MemoryDestination::new();
    let mut base = ObjectBase::new("Session", DiagnosticsConfig::verbose(1))
        .with_schema(Arc::new(id_schema()))
        .with_interactive_destination(memory.clone());

    assert!(base.build_data_map(Some(json!({"id": 7}))).is_err());
    assert_eq!(memory.len(), 1);
}
