//! The prediction service.
//!
//! [`ObesityPredictor`] owns the translator, the encoder (schema + scaler) and
//! the classifier. It is built once per process, checked against the training
//! column schema at construction, and immutable afterwards.

use rayon::prelude::*;

use crate::config::PredictorConfig;
use crate::encode::{FeatureEncoder, FeatureVector};
use crate::error::{Error, Result};
use crate::inference::{Classifier, PredictionResult};
use crate::input::RawInput;
use crate::model::RandomForestClassifier;
use crate::persist::Artifact;
use crate::scaler::StandardScaler;
use crate::schema::FeatureSchema;
use crate::translate::{CanonicalInput, LabelTranslator};

/// Loaded pipeline: form labels in, obesity category out.
pub struct ObesityPredictor {
    translator: LabelTranslator,
    encoder: FeatureEncoder,
    classifier: Box<dyn Classifier>,
}

impl std::fmt::Debug for ObesityPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObesityPredictor")
            .field("locale", &self.translator.locale())
            .field("n_features", &self.classifier.n_features())
            .field("classes", &self.classifier.classes())
            .finish()
    }
}

impl ObesityPredictor {
    /// Load the artifacts named in `config` and validate them against the
    /// training schema.
    pub fn load(config: &PredictorConfig) -> Result<Self> {
        let scaler = StandardScaler::load(&config.scaler_path).map_err(|source| Error::Artifact {
            path: config.scaler_path.clone(),
            source,
        })?;
        let model =
            RandomForestClassifier::load(&config.model_path).map_err(|source| Error::Artifact {
                path: config.model_path.clone(),
                source,
            })?;
        log::info!(
            "loaded {} trees over {} features, {} classes from {}",
            model.forest().n_trees(),
            model.meta().n_features,
            model.meta().n_classes(),
            config.model_path.display()
        );

        Self::new(
            LabelTranslator::new(config.locale),
            FeatureSchema::training(),
            scaler,
            Box::new(model),
            config.strict_feature_names,
        )
    }

    /// Assemble a predictor from parts.
    ///
    /// Fails with [`Error::SchemaMismatch`] when the scaler or the classifier
    /// disagree with the schema's column layout. With `strict_feature_names`
    /// an artifact that recorded no column names is also rejected; otherwise
    /// the name check is skipped with a warning.
    pub fn new(
        translator: LabelTranslator,
        schema: FeatureSchema,
        scaler: StandardScaler,
        classifier: Box<dyn Classifier>,
        strict_feature_names: bool,
    ) -> Result<Self> {
        if scaler.n_features() != schema.n_numeric() {
            return Err(Error::SchemaMismatch(format!(
                "scaler has {} features, schema has {} numeric columns",
                scaler.n_features(),
                schema.n_numeric()
            )));
        }
        check_names(
            "scaler",
            scaler.feature_names(),
            &schema.numeric_column_names(),
            strict_feature_names,
        )?;

        if classifier.n_features() != schema.n_columns() {
            return Err(Error::SchemaMismatch(format!(
                "classifier expects {} features, schema has {} columns",
                classifier.n_features(),
                schema.n_columns()
            )));
        }
        check_names(
            "classifier",
            classifier.feature_names(),
            &schema.column_names(),
            strict_feature_names,
        )?;

        if classifier.classes().is_empty() {
            return Err(Error::SchemaMismatch("classifier has no classes".into()));
        }

        let encoder = FeatureEncoder::new(schema, scaler)?;
        Ok(Self {
            translator,
            encoder,
            classifier,
        })
    }

    #[inline]
    pub fn translator(&self) -> &LabelTranslator {
        &self.translator
    }

    #[inline]
    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    #[inline]
    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// Class labels in probability order.
    pub fn classes(&self) -> &[String] {
        self.classifier.classes()
    }

    /// Validate numeric ranges and translate labels.
    pub fn translate(&self, raw: &RawInput) -> Result<CanonicalInput> {
        raw.validate()?;
        Ok(self.translator.translate(raw)?)
    }

    /// Run the pipeline up to the encoded feature vector.
    pub fn encode(&self, raw: &RawInput) -> Result<FeatureVector> {
        let canonical = self.translate(raw)?;
        Ok(self.encoder.encode(&canonical)?)
    }

    /// Predict the obesity category of one submission.
    pub fn predict(&self, raw: &RawInput) -> Result<PredictionResult> {
        let features = self.encode(raw)?;
        let proba = self.classifier.predict_proba(features.view())?;
        let label = self.classifier.predict(features.view())?;
        let result = PredictionResult::with_label(label, self.classifier.classes(), proba.view())?;
        log::debug!("predicted {} ({:.3})", result.label, result.confidence());
        Ok(result)
    }

    /// Predict many independent submissions in parallel.
    ///
    /// Results are in input order; one bad submission does not affect the
    /// others.
    pub fn predict_batch(&self, inputs: &[RawInput]) -> Vec<Result<PredictionResult>> {
        inputs.par_iter().map(|raw| self.predict(raw)).collect()
    }
}

fn check_names(
    artifact: &str,
    found: Option<&[String]>,
    expected: &[String],
    strict: bool,
) -> Result<()> {
    match found {
        Some(names) if names == expected => Ok(()),
        Some(names) => {
            let detail = match names.iter().zip(expected).position(|(a, b)| a != b) {
                Some(i) => format!("column {i} is {:?}, expected {:?}", names[i], expected[i]),
                None => format!("{} columns, expected {}", names.len(), expected.len()),
            };
            Err(Error::SchemaMismatch(format!("{artifact} feature names differ: {detail}")))
        }
        None if strict => Err(Error::SchemaMismatch(format!(
            "{artifact} artifact records no feature names"
        ))),
        None => {
            log::warn!("{artifact} artifact records no feature names; skipping name check");
            Ok(())
        }
    }
}
