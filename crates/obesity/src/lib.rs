//! obesity: obesity category prediction from lifestyle attributes.
//!
//! A stateless pipeline that turns one form submission into a predicted
//! obesity category with per-class probabilities:
//!
//! ```text
//! RawInput → LabelTranslator → FeatureEncoder → Classifier → PredictionResult
//! ```
//!
//! # Key Types
//!
//! - [`RawInput`] - one form submission (display labels, slider values)
//! - [`LabelTranslator`] / [`Locale`] - display label → training token tables
//! - [`FeatureSchema`] / [`FeatureEncoder`] - the 31 training columns and the
//!   scaler + one-hot encoding into them
//! - [`Classifier`] / [`RandomForestClassifier`] - probabilistic classifier
//! - [`ObesityPredictor`] - the loaded, validated pipeline
//!
//! # Loading artifacts
//!
//! The trained forest and the fitted scaler are read from enveloped JSON
//! exports; see the [`persist`] module.
//!
//! ```no_run
//! use obesity::{ObesityPredictor, PredictorConfig, RawInput};
//!
//! let config = PredictorConfig::builder().build()?;
//! let predictor = ObesityPredictor::load(&config)?;
//! let result = predictor.predict(&RawInput::default())?;
//! println!("{}", result.display_label());
//! # Ok::<(), obesity::Error>(())
//! ```

pub mod config;
pub mod encode;
pub mod error;
pub mod inference;
pub mod input;
pub mod model;
pub mod persist;
pub mod repr;
pub mod scaler;
pub mod schema;
pub mod service;
pub mod testing;
pub mod translate;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use config::{ConfigError, PredictorConfig};
pub use encode::{EncodeError, FeatureEncoder, FeatureVector};
pub use error::{Error, Result};
pub use inference::{ClassProbability, Classifier, PredictError, PredictionResult};
pub use input::{InputError, NumericBounds, RawInput};
pub use model::{ModelMeta, RandomForestClassifier};
pub use scaler::{ScalerError, StandardScaler};
pub use schema::{CategoricalField, FeatureSchema, NumericField, N_TRAINING_COLUMNS};
pub use service::ObesityPredictor;
pub use translate::{CanonicalInput, LabelTranslator, Locale, TranslateError};
