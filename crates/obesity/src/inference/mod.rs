//! Classifier adapter and prediction results.
//!
//! [`Classifier`] is the seam between the encoded feature vector and whatever
//! trained model scores it. [`PredictionResult`] pairs the predicted label with
//! the full probability list in class order.

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while scoring a feature vector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictError {
    #[error("classifier expects {expected} features, got {got}")]
    FeatureCountMismatch { expected: usize, got: usize },

    #[error("classifier returned {got} probabilities for {expected} classes")]
    ClassCountMismatch { expected: usize, got: usize },

    #[error("classifier predicted {0:?}, which is not one of its classes")]
    UnknownLabel(String),
}

/// A trained probabilistic classifier.
pub trait Classifier: Send + Sync {
    /// Class labels in output order.
    fn classes(&self) -> &[String];

    /// Number of input features.
    fn n_features(&self) -> usize;

    /// Column names seen at fit time, if recorded.
    fn feature_names(&self) -> Option<&[String]>;

    /// Probability per class, in [`classes`](Self::classes) order.
    fn predict_proba(&self, features: ArrayView1<'_, f64>) -> Result<Array1<f64>, PredictError>;

    /// Most probable class label. Ties go to the class listed first.
    fn predict(&self, features: ArrayView1<'_, f64>) -> Result<&str, PredictError> {
        let proba = self.predict_proba(features)?;
        let classes = self.classes();
        argmax(proba.view())
            .and_then(|i| classes.get(i))
            .map(String::as_str)
            .ok_or(PredictError::ClassCountMismatch {
                expected: classes.len(),
                got: proba.len(),
            })
    }
}

/// Index of the largest value; the first one wins ties.
pub fn argmax(values: ArrayView1<'_, f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Probability assigned to one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassProbability {
    pub label: String,
    pub probability: f64,
}

/// Predicted category plus the probability of every class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: String,
    pub probabilities: Vec<ClassProbability>,
}

impl PredictionResult {
    /// Pair `proba` with `classes` and pick the most probable label.
    pub fn from_proba(
        classes: &[String],
        proba: ArrayView1<'_, f64>,
    ) -> Result<Self, PredictError> {
        if classes.len() != proba.len() {
            return Err(PredictError::ClassCountMismatch {
                expected: classes.len(),
                got: proba.len(),
            });
        }
        let best = argmax(proba).ok_or(PredictError::ClassCountMismatch {
            expected: classes.len(),
            got: 0,
        })?;
        Self::with_label(&classes[best], classes, proba)
    }

    /// Pair `proba` with `classes` under a label the classifier already chose.
    pub fn with_label(
        label: &str,
        classes: &[String],
        proba: ArrayView1<'_, f64>,
    ) -> Result<Self, PredictError> {
        if classes.len() != proba.len() {
            return Err(PredictError::ClassCountMismatch {
                expected: classes.len(),
                got: proba.len(),
            });
        }
        if !classes.iter().any(|c| c == label) {
            return Err(PredictError::UnknownLabel(label.to_string()));
        }
        let probabilities = classes
            .iter()
            .zip(proba.iter())
            .map(|(label, &probability)| ClassProbability {
                label: label.clone(),
                probability,
            })
            .collect();
        Ok(Self {
            label: label.to_string(),
            probabilities,
        })
    }

    /// Label for display: underscores become spaces.
    pub fn display_label(&self) -> String {
        self.label.replace('_', " ")
    }

    /// Probability of `label`, if it is one of the classes.
    pub fn probability(&self, label: &str) -> Option<f64> {
        self.probabilities
            .iter()
            .find(|p| p.label == label)
            .map(|p| p.probability)
    }

    /// Probability of the predicted label.
    pub fn confidence(&self) -> f64 {
        self.probability(&self.label).unwrap_or(0.0)
    }
}
