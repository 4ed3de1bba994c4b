//! Random forest classifier.

use ndarray::{Array1, ArrayView1};

use super::ModelMeta;
use crate::inference::{Classifier, PredictError};
use crate::repr::Forest;

/// Averaging ensemble of classification trees.
///
/// Each tree votes with the class distribution of the leaf a row lands in;
/// the forest reports the mean of those distributions.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestClassifier {
    meta: ModelMeta,
    forest: Forest,
}

impl RandomForestClassifier {
    /// Assemble a classifier from already validated parts.
    pub fn from_parts(meta: ModelMeta, forest: Forest) -> Self {
        debug_assert_eq!(meta.n_classes(), forest.n_classes());
        Self { meta, forest }
    }

    #[inline]
    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    #[inline]
    pub fn forest(&self) -> &Forest {
        &self.forest
    }
}

impl Classifier for RandomForestClassifier {
    fn classes(&self) -> &[String] {
        &self.meta.classes
    }

    fn n_features(&self) -> usize {
        self.meta.n_features
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.meta.feature_names.as_deref()
    }

    fn predict_proba(&self, features: ArrayView1<'_, f64>) -> Result<Array1<f64>, PredictError> {
        if features.len() != self.meta.n_features {
            return Err(PredictError::FeatureCountMismatch {
                expected: self.meta.n_features,
                got: features.len(),
            });
        }
        let owned;
        let row = match features.as_slice() {
            Some(row) => row,
            None => {
                owned = features.to_vec();
                &owned
            }
        };
        Ok(Array1::from_vec(self.forest.predict_proba_row(row)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use approx::assert_abs_diff_eq;
    use ndarray::{s, Array1};

    #[test]
    fn proba_is_a_distribution() {
        let model = testing::sample_classifier();
        let x = Array1::zeros(model.n_features());
        let p = model.predict_proba(x.view()).unwrap();
        assert_eq!(p.len(), model.classes().len());
        assert!(p.iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert_abs_diff_eq!(p.sum(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn wrong_width_is_rejected() {
        let model = testing::sample_classifier();
        let x = Array1::zeros(30);
        assert_eq!(
            model.predict_proba(x.view()),
            Err(PredictError::FeatureCountMismatch {
                expected: 31,
                got: 30
            })
        );
    }

    #[test]
    fn strided_view_matches_contiguous() {
        let model = testing::sample_classifier();
        let wide = Array1::from_shape_fn(62, |i| if i % 4 == 0 { 1.0 } else { -1.0 });
        let strided = wide.slice(s![..;2]);
        let contiguous = strided.to_owned();
        assert_eq!(
            model.predict_proba(strided).unwrap(),
            model.predict_proba(contiguous.view()).unwrap()
        );
    }
}
