//! Predictor configuration.
//!
//! Uses `bon` for a builder with validation at build time.

use std::path::PathBuf;

use bon::Builder;
use thiserror::Error;

use crate::translate::Locale;

/// Default location of the exported classifier.
pub const DEFAULT_MODEL_PATH: &str = "random_forest_obesity_model.json";
/// Default location of the exported scaler.
pub const DEFAULT_SCALER_PATH: &str = "scaler.json";

/// Errors from [`PredictorConfig`] validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must not be empty")]
    EmptyPath { field: &'static str },

    #[error("model and scaler both point at {}", .0.display())]
    SamePath(PathBuf),
}

/// Where to find the artifacts and how to read form labels.
///
/// # Example
///
/// ```
/// use obesity::{Locale, PredictorConfig};
///
/// let config = PredictorConfig::builder()
///     .model_path("artifacts/model.json")
///     .scaler_path("artifacts/scaler.json")
///     .locale(Locale::English)
///     .build()
///     .unwrap();
/// assert!(config.strict_feature_names);
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct PredictorConfig {
    /// Classifier artifact. Default: `random_forest_obesity_model.json`.
    #[builder(into, default = PathBuf::from(DEFAULT_MODEL_PATH))]
    pub model_path: PathBuf,

    /// Scaler artifact. Default: `scaler.json`.
    #[builder(into, default = PathBuf::from(DEFAULT_SCALER_PATH))]
    pub scaler_path: PathBuf,

    /// Language of the form labels. Default: Indonesian.
    #[builder(default)]
    pub locale: Locale,

    /// Treat artifacts without recorded feature names as a startup error
    /// rather than skipping the name check. Default: true.
    #[builder(default = true)]
    pub strict_feature_names: bool,
}

impl<S: predictor_config_builder::IsComplete> PredictorConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// - either path is empty
    /// - model and scaler paths are identical
    pub fn build(self) -> Result<PredictorConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl PredictorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.model_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath { field: "model_path" });
        }
        if self.scaler_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath { field: "scaler_path" });
        }
        if self.model_path == self.scaler_path {
            return Err(ConfigError::SamePath(self.model_path.clone()));
        }
        Ok(())
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self::builder().__build_internal()
    }
}
