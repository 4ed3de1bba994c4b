//! Schema types for artifact serialization.
//!
//! These types mirror the JSON documents exported from the training
//! environment and are kept separate from the runtime types so the format can
//! evolve independently and every document is validated on conversion.

use serde::{Deserialize, Serialize};

/// Versioned envelope wrapping every artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeSchema<T> {
    pub format_version: u32,
    pub artifact_type: String,
    pub artifact: T,
}

/// Classifier metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetaSchema {
    /// Number of input features.
    pub num_features: usize,
    /// Column names seen at fit time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    /// Class labels in output order.
    pub classes: Vec<String>,
}

/// One decision tree in the exporter's node-array layout.
///
/// Leaves have `children_left == children_right == -1`; their `feature` and
/// `threshold` entries are placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSchema {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Class distribution per node (counts or fractions).
    pub value: Vec<Vec<f64>>,
}

/// Trees in iteration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestSchema {
    pub trees: Vec<TreeSchema>,
}

/// `random_forest_classifier` artifact body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestSchema {
    pub meta: ModelMetaSchema,
    pub forest: ForestSchema,
}

/// `standard_scaler` artifact body.
///
/// An absent `mean` means no centering, an absent `scale` means unit
/// variance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec<f64>>,
}
