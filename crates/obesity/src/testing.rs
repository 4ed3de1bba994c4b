//! Fixture builders shared by unit and integration tests.
//!
//! The sample forest is small enough to evaluate by hand:
//!
//! - tree 0 splits on scaled `Weight` (column 2) at -0.3 and 0.8,
//! - tree 1 splits on `MTRANS_Walking` (column 30),
//! - tree 2 splits on `Gender_Male` (column 9).

use ndarray::array;

use crate::input::RawInput;
use crate::model::{ModelMeta, RandomForestClassifier};
use crate::repr::{Forest, Tree};
use crate::scaler::StandardScaler;
use crate::schema::FeatureSchema;

/// Obesity categories in classifier output order.
pub const CLASSES: [&str; 7] = [
    "Insufficient_Weight",
    "Normal_Weight",
    "Obesity_Type_I",
    "Obesity_Type_II",
    "Obesity_Type_III",
    "Overweight_Level_I",
    "Overweight_Level_II",
];

/// Reference submission: a 25-year-old man of 70 kg who walks and answers
/// "Tidak" everywhere.
pub fn scenario_input() -> RawInput {
    RawInput {
        age: 25,
        height: 1.75,
        weight: 70.0,
        gender: "Pria".into(),
        family_history: "Tidak".into(),
        high_calorie_food: "Tidak".into(),
        vegetable_frequency: 2,
        main_meals: 3,
        snacking: "Tidak".into(),
        smoking: "Tidak".into(),
        water_intake: 2,
        calorie_monitoring: "Tidak".into(),
        activity_frequency: 1,
        device_time: 1,
        alcohol: "Tidak".into(),
        transport: "Jalan Kaki".into(),
    }
}

/// Scaler with parameters fitted on the training table.
pub fn training_scaler() -> StandardScaler {
    let mean = array![24.3126, 1.7017, 86.5861, 2.4190, 2.6856, 2.0080, 1.0103, 0.6579];
    let scale = array![6.3459, 0.0933, 26.1912, 0.5339, 0.7780, 0.6129, 0.8505, 0.6089];
    // Constants above are all finite and non-zero.
    match StandardScaler::new(mean, scale) {
        Ok(scaler) => scaler.with_feature_names(FeatureSchema::training().numeric_column_names()),
        Err(e) => unreachable!("fixture scaler is valid: {e}"),
    }
}

/// Three-tree forest over the 31 training columns.
pub fn sample_forest() -> Forest {
    let mut forest = Forest::new(CLASSES.len());
    forest.push_tree(Tree::new(
        vec![2, 0, 2, 0, 0],
        vec![-0.3, 0.0, 0.8, 0.0, 0.0],
        vec![1, 0, 3, 0, 0],
        vec![2, 0, 4, 0, 0],
        vec![false, true, false, true, true],
        [
            [2.0, 6.0, 4.0, 3.0, 4.0, 3.0, 4.0],
            [2.0, 6.0, 0.0, 0.0, 0.0, 2.0, 0.0],
            [0.0, 0.0, 4.0, 3.0, 4.0, 1.0, 4.0],
            [0.0, 0.0, 3.0, 0.0, 0.0, 1.0, 4.0],
            [0.0, 0.0, 1.0, 3.0, 4.0, 0.0, 0.0],
        ]
        .concat(),
        CLASSES.len(),
    ));
    forest.push_tree(Tree::stump(
        30,
        0.5,
        vec![1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0],
        vec![0.0, 4.0, 0.0, 0.0, 0.0, 1.0, 0.0],
    ));
    forest.push_tree(Tree::stump(
        9,
        0.5,
        vec![1.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0],
        vec![0.0, 2.0, 1.0, 1.0, 0.0, 0.0, 0.0],
    ));
    forest
}

/// Classifier wrapping [`sample_forest`], with training column names.
pub fn sample_classifier() -> RandomForestClassifier {
    let schema = FeatureSchema::training();
    let meta = ModelMeta::new(
        schema.n_columns(),
        CLASSES.iter().map(|c| c.to_string()).collect(),
    )
    .with_feature_names(schema.column_names());
    RandomForestClassifier::from_parts(meta, sample_forest())
}
