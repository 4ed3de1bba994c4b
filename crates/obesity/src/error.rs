//! Crate-level error type.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::encode::EncodeError;
use crate::inference::PredictError;
use crate::input::InputError;
use crate::persist::ReadError;
use crate::translate::TranslateError;

/// Any failure along the prediction pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Predict(#[from] PredictError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An artifact could not be read at startup.
    #[error("failed to load {}: {source}", path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: ReadError,
    },

    /// Loaded artifacts disagree with the training column schema.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
