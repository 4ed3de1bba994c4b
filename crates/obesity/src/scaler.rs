//! Fitted standard scaler.
//!
//! Applies the affine transform `(x - mean) / scale` per feature. Parameters
//! come from the training pipeline; nothing is fitted here.

use ndarray::{Array1, ArrayView1, Zip};
use thiserror::Error;

/// Errors from scaler construction or application.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScalerError {
    #[error("expected {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("scale for feature {index} must be finite and non-zero, got {value}")]
    InvalidScale { index: usize, value: f64 },

    #[error("mean for feature {index} must be finite, got {value}")]
    InvalidMean { index: usize, value: f64 },
}

/// Per-feature standardization with externally fitted parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
    feature_names: Option<Vec<String>>,
}

impl StandardScaler {
    /// Create a scaler from fitted `mean` and `scale` vectors.
    pub fn new(mean: Array1<f64>, scale: Array1<f64>) -> Result<Self, ScalerError> {
        if mean.len() != scale.len() {
            return Err(ScalerError::DimensionMismatch {
                expected: mean.len(),
                got: scale.len(),
            });
        }
        if let Some((index, &value)) = mean.iter().enumerate().find(|(_, m)| !m.is_finite()) {
            return Err(ScalerError::InvalidMean { index, value });
        }
        if let Some((index, &value)) = scale
            .iter()
            .enumerate()
            .find(|(_, s)| !s.is_finite() || **s == 0.0)
        {
            return Err(ScalerError::InvalidScale { index, value });
        }
        Ok(Self {
            mean,
            scale,
            feature_names: None,
        })
    }

    /// Scaler that leaves `n_features` values unchanged.
    pub fn identity(n_features: usize) -> Self {
        Self {
            mean: Array1::zeros(n_features),
            scale: Array1::ones(n_features),
            feature_names: None,
        }
    }

    /// Attach the column names the scaler was fitted on.
    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        debug_assert_eq!(names.len(), self.n_features());
        self.feature_names = Some(names);
        self
    }

    /// Number of features the scaler was fitted on.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    #[inline]
    pub fn mean(&self) -> ArrayView1<'_, f64> {
        self.mean.view()
    }

    #[inline]
    pub fn scale(&self) -> ArrayView1<'_, f64> {
        self.scale.view()
    }

    /// Column names seen at fit time, if the artifact recorded them.
    #[inline]
    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn check_width(&self, got: usize) -> Result<(), ScalerError> {
        if got != self.n_features() {
            return Err(ScalerError::DimensionMismatch {
                expected: self.n_features(),
                got,
            });
        }
        Ok(())
    }

    /// Standardize one sample.
    pub fn transform(&self, x: ArrayView1<'_, f64>) -> Result<Array1<f64>, ScalerError> {
        self.check_width(x.len())?;
        Ok(Zip::from(&x)
            .and(&self.mean)
            .and(&self.scale)
            .map_collect(|&v, &m, &s| (v - m) / s))
    }

    /// Undo [`transform`](Self::transform).
    pub fn inverse_transform(&self, z: ArrayView1<'_, f64>) -> Result<Array1<f64>, ScalerError> {
        self.check_width(z.len())?;
        Ok(Zip::from(&z)
            .and(&self.mean)
            .and(&self.scale)
            .map_collect(|&v, &m, &s| v * s + m))
    }
}
