//! Targeted validation failures for mutated artifact documents.

use std::io::Cursor;

use obesity::persist::{Artifact, ReadError};
use obesity::{RandomForestClassifier, StandardScaler};
use serde_json::Value;

fn load_fixture_value(name: &str) -> Value {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/test-cases/v1")
        .join(name);
    let bytes = std::fs::read(&path).expect("read fixture");
    serde_json::from_slice(&bytes).expect("parse fixture json")
}

fn model_value() -> Value {
    load_fixture_value("random_forest_obesity_model.json")
}

fn model_err(v: Value) -> ReadError {
    let bytes = serde_json::to_vec(&v).expect("serialize mutated json");
    RandomForestClassifier::read_json(Cursor::new(&bytes)).expect_err("expected error")
}

fn scaler_err(v: Value) -> ReadError {
    let bytes = serde_json::to_vec(&v).expect("serialize mutated json");
    StandardScaler::read_json(Cursor::new(&bytes)).expect_err("expected error")
}

fn array_mut<'a>(v: &'a mut Value, pointer: &str) -> &'a mut Vec<Value> {
    v.pointer_mut(pointer)
        .and_then(|x| x.as_array_mut())
        .unwrap_or_else(|| panic!("{pointer} is an array"))
}

#[test]
fn unmodified_fixture_reads() {
    let bytes = serde_json::to_vec(&model_value()).unwrap();
    assert!(RandomForestClassifier::read_json(Cursor::new(&bytes)).is_ok());
}

#[test]
fn validation_fails_on_mismatched_array_lengths() {
    let mut v = model_value();
    array_mut(&mut v, "/artifact/forest/trees/0/threshold").pop();

    let err = model_err(v);
    assert!(matches!(err, ReadError::Validation(_)), "got: {err:?}");
}

#[test]
fn validation_fails_on_out_of_bounds_child_index() {
    let mut v = model_value();
    array_mut(&mut v, "/artifact/forest/trees/0/children_left")[0] = Value::from(9_999_999u64);

    let err = model_err(v);
    assert!(matches!(err, ReadError::Validation(_)), "got: {err:?}");
}

#[test]
fn validation_fails_on_cycle() {
    let mut v = model_value();
    // Internal node 2 points back at the root.
    array_mut(&mut v, "/artifact/forest/trees/0/children_left")[2] = Value::from(0);

    let err = model_err(v);
    assert!(matches!(err, ReadError::Validation(_)), "got: {err:?}");
}

#[test]
fn validation_fails_on_split_feature_out_of_range() {
    let mut v = model_value();
    array_mut(&mut v, "/artifact/forest/trees/1/feature")[0] = Value::from(31);

    let err = model_err(v);
    assert!(matches!(err, ReadError::Validation(_)), "got: {err:?}");
}

#[test]
fn validation_fails_on_wrong_class_width() {
    let mut v = model_value();
    for row in array_mut(&mut v, "/artifact/forest/trees/2/value") {
        row.as_array_mut().expect("value row").pop();
    }

    let err = model_err(v);
    assert!(
        matches!(err, ReadError::Validation(ref msg) if msg.contains("tree 2")),
        "got: {err:?}"
    );
}

#[test]
fn validation_fails_on_negative_leaf_mass() {
    let mut v = model_value();
    array_mut(&mut v, "/artifact/forest/trees/1/value/1")[0] = Value::from(-1.0);

    let err = model_err(v);
    assert!(matches!(err, ReadError::Validation(_)), "got: {err:?}");
}

#[test]
fn validation_fails_on_feature_name_count() {
    let mut v = model_value();
    array_mut(&mut v, "/artifact/meta/feature_names").pop();

    let err = model_err(v);
    assert!(matches!(err, ReadError::Validation(_)), "got: {err:?}");
}

#[test]
fn validation_fails_on_empty_forest() {
    let mut v = model_value();
    array_mut(&mut v, "/artifact/forest/trees").clear();

    let err = model_err(v);
    assert!(matches!(err, ReadError::Validation(_)), "got: {err:?}");
}

#[test]
fn envelope_version_is_checked() {
    let mut v = model_value();
    v["format_version"] = Value::from(7);

    let err = model_err(v);
    assert!(
        matches!(err, ReadError::UnsupportedVersion { found: 7, supported: 1 }),
        "got: {err:?}"
    );
}

#[test]
fn envelope_type_is_checked() {
    let v = load_fixture_value("scaler.json");

    let err = model_err(v);
    assert!(matches!(err, ReadError::WrongArtifactType { .. }), "got: {err:?}");
}

#[test]
fn malformed_body_is_a_json_error() {
    let mut v = model_value();
    v["artifact"]["meta"] = Value::from("not an object");

    let err = model_err(v);
    assert!(matches!(err, ReadError::Json(_)), "got: {err:?}");
}

#[test]
fn scaler_zero_scale_rejected() {
    let mut v = load_fixture_value("scaler.json");
    array_mut(&mut v, "/artifact/scale")[3] = Value::from(0.0);

    let err = scaler_err(v);
    assert!(matches!(err, ReadError::Validation(_)), "got: {err:?}");
}

#[test]
fn scaler_length_mismatch_rejected() {
    let mut v = load_fixture_value("scaler.json");
    array_mut(&mut v, "/artifact/mean").pop();

    let err = scaler_err(v);
    assert!(matches!(err, ReadError::Validation(_)), "got: {err:?}");
}
