//! Artifact read/write errors.

use thiserror::Error;

use super::ArtifactType;

/// Errors raised while reading an artifact.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported format version {found} (this build reads version {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("expected a {expected} artifact, found {found:?}")]
    WrongArtifactType { expected: ArtifactType, found: String },

    #[error("invalid artifact: {0}")]
    Validation(String),
}

/// Errors raised while writing an artifact.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
