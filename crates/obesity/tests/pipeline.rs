//! End-to-end prediction against the exported fixture artifacts.

use std::path::{Path, PathBuf};

use approx::assert_abs_diff_eq;
use obesity::persist::Artifact;
use obesity::{
    Error, FeatureSchema, Locale, ObesityPredictor, PredictorConfig, RandomForestClassifier,
    RawInput, StandardScaler,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Case {
    name: String,
    locale: Locale,
    input: RawInput,
    expected_label: String,
    expected_proba: Vec<f64>,
}

fn cases_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/test-cases/v1")
}

fn load_cases() -> Vec<Case> {
    let path = cases_dir().join("cases.json");
    let bytes = std::fs::read(&path).expect("read cases");
    serde_json::from_slice(&bytes).expect("parse cases")
}

fn config(locale: Locale) -> PredictorConfig {
    PredictorConfig::builder()
        .model_path(cases_dir().join("random_forest_obesity_model.json"))
        .scaler_path(cases_dir().join("scaler.json"))
        .locale(locale)
        .build()
        .expect("valid config")
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn fixture_artifacts_load() {
    init_logger();
    let model = RandomForestClassifier::load(cases_dir().join("random_forest_obesity_model.json"))
        .expect("load model");
    assert_eq!(model.forest().n_trees(), 3);
    assert_eq!(model.meta().n_classes(), 7);
    assert_eq!(
        model.meta().feature_names.as_deref(),
        Some(FeatureSchema::training().column_names().as_slice())
    );

    let scaler = StandardScaler::load(cases_dir().join("scaler.json")).expect("load scaler");
    assert_eq!(scaler.n_features(), 8);
    assert_eq!(scaler.feature_names().map(<[String]>::len), Some(8));
}

#[test]
fn expected_predictions() {
    init_logger();
    for case in load_cases() {
        let predictor = ObesityPredictor::load(&config(case.locale)).expect("load predictor");
        let result = predictor
            .predict(&case.input)
            .unwrap_or_else(|e| panic!("{}: {e}", case.name));

        assert_eq!(result.label, case.expected_label, "{}", case.name);
        assert_eq!(result.probabilities.len(), case.expected_proba.len());
        for (got, &want) in result.probabilities.iter().zip(&case.expected_proba) {
            assert_abs_diff_eq!(got.probability, want, epsilon = 1e-9);
        }
    }
}

#[test]
fn scenario_feature_vector() {
    let predictor = ObesityPredictor::load(&config(Locale::Indonesian)).unwrap();
    let case = load_cases().into_iter().find(|c| c.name == "scenario").unwrap();
    let features = predictor.encode(&case.input).unwrap();
    let schema = FeatureSchema::training();

    assert_eq!(features.len(), 31);
    for (name, value) in [
        ("Gender_Male", 1.0),
        ("Gender_Female", 0.0),
        ("family_history_with_overweight_no", 1.0),
        ("CAEC_no", 1.0),
        ("CALC_no", 1.0),
        ("MTRANS_Walking", 1.0),
        ("MTRANS_Bike", 0.0),
    ] {
        assert_eq!(features[schema.column_index(name).unwrap()], value, "{name}");
    }
    assert_abs_diff_eq!(features[2], (70.0 - 86.5861) / 26.1912, epsilon = 1e-12);
}

#[test]
fn batch_matches_single_predictions() {
    let predictor = ObesityPredictor::load(&config(Locale::Indonesian)).unwrap();
    let inputs: Vec<RawInput> = load_cases()
        .into_iter()
        .filter(|c| c.locale == Locale::Indonesian)
        .map(|c| c.input)
        .collect();

    let batch = predictor.predict_batch(&inputs);
    for (input, result) in inputs.iter().zip(batch) {
        assert_eq!(result.unwrap(), predictor.predict(input).unwrap());
    }
}

#[test]
fn missing_artifact_is_a_startup_error() {
    let config = PredictorConfig::builder()
        .model_path(cases_dir().join("no_such_model.json"))
        .scaler_path(cases_dir().join("scaler.json"))
        .build()
        .unwrap();
    let err = ObesityPredictor::load(&config).unwrap_err();
    match err {
        Error::Artifact { path, .. } => assert!(path.ends_with("no_such_model.json")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn narrow_scaler_is_a_schema_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let scaler_path = dir.path().join("scaler.json");
    StandardScaler::identity(7).save(&scaler_path).unwrap();

    let config = PredictorConfig::builder()
        .model_path(cases_dir().join("random_forest_obesity_model.json"))
        .scaler_path(scaler_path)
        .strict_feature_names(false)
        .build()
        .unwrap();
    match ObesityPredictor::load(&config).unwrap_err() {
        Error::SchemaMismatch(msg) => assert!(msg.contains("scaler has 7 features"), "{msg}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn swapped_artifacts_are_rejected() {
    let config = PredictorConfig::builder()
        .model_path(cases_dir().join("scaler.json"))
        .scaler_path(cases_dir().join("random_forest_obesity_model.json"))
        .build()
        .unwrap();
    assert!(matches!(
        ObesityPredictor::load(&config),
        Err(Error::Artifact { .. })
    ));
}
