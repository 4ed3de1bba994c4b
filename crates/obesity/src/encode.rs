//! Feature encoding.
//!
//! [`FeatureEncoder`] turns a [`CanonicalInput`] into the positional
//! [`FeatureVector`] the classifier was trained on by walking a
//! [`FeatureSchema`]: scaled numeric columns first, then one indicator column
//! per vocabulary token of every categorical field.

use std::ops::Index;

use ndarray::{Array1, ArrayView1};
use thiserror::Error;

use crate::scaler::{ScalerError, StandardScaler};
use crate::schema::{CategoricalField, FeatureSchema};
use crate::translate::CanonicalInput;

/// Errors raised while encoding a canonical input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("token {token:?} is not in the {field} vocabulary")]
    UnknownCategory {
        field: CategoricalField,
        token: String,
    },

    #[error("scaler failed: {0}")]
    Scaler(#[from] ScalerError),

    #[error("encoded {got} columns, schema defines {expected}")]
    SchemaMismatch { expected: usize, got: usize },
}

/// Encoded model input, positionally aligned with the training columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Array1<f64>,
}

impl FeatureVector {
    /// Wrap raw column values.
    pub fn from_array(values: Array1<f64>) -> Self {
        let values = if values.is_standard_layout() {
            values
        } else {
            values.as_standard_layout().into_owned()
        };
        Self { values }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    /// Column values as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        self.values
            .as_slice()
            .unwrap_or_else(|| unreachable!("feature vectors are stored in standard layout"))
    }
}

impl Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.values[index]
    }
}

/// Scales numeric fields and one-hot expands categorical fields.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    schema: FeatureSchema,
    scaler: StandardScaler,
}

impl FeatureEncoder {
    /// Create an encoder.
    ///
    /// The scaler must cover exactly the schema's numeric columns.
    pub fn new(schema: FeatureSchema, scaler: StandardScaler) -> Result<Self, EncodeError> {
        if scaler.n_features() != schema.n_numeric() {
            return Err(EncodeError::Scaler(ScalerError::DimensionMismatch {
                expected: schema.n_numeric(),
                got: scaler.n_features(),
            }));
        }
        Ok(Self { schema, scaler })
    }

    #[inline]
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    #[inline]
    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Encode one input into the training column layout.
    pub fn encode(&self, input: &CanonicalInput) -> Result<FeatureVector, EncodeError> {
        let n_columns = self.schema.n_columns();
        let mut values = Vec::with_capacity(n_columns);

        let numeric: Array1<f64> = self
            .schema
            .numeric_fields()
            .iter()
            .map(|&field| input.numeric(field))
            .collect();
        let scaled = self.scaler.transform(numeric.view())?;
        values.extend(scaled.iter().copied());

        for group in self.schema.groups() {
            let token = input.token(group.field());
            let hot = group
                .position(token)
                .ok_or_else(|| EncodeError::UnknownCategory {
                    field: group.field(),
                    token: token.to_string(),
                })?;
            values.extend((0..group.len()).map(|i| if i == hot { 1.0 } else { 0.0 }));
        }

        if values.len() != n_columns {
            return Err(EncodeError::SchemaMismatch {
                expected: n_columns,
                got: values.len(),
            });
        }

        log::debug!("encoded {} columns", values.len());
        Ok(FeatureVector::from_array(Array1::from_vec(values)))
    }
}
