//! Model metadata.

use serde::{Deserialize, Serialize};

/// Introspection data about a trained classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMeta {
    /// Number of input features.
    pub n_features: usize,
    /// Column names seen at fit time (optional).
    pub feature_names: Option<Vec<String>>,
    /// Class labels in output order.
    pub classes: Vec<String>,
}

impl ModelMeta {
    /// Create metadata for a classifier over `classes`.
    pub fn new(n_features: usize, classes: Vec<String>) -> Self {
        Self {
            n_features,
            feature_names: None,
            classes,
        }
    }

    /// Attach fit-time feature names.
    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = Some(names);
        self
    }

    #[inline]
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }
}
