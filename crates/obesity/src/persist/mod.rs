//! Artifact persistence.
//!
//! The classifier and the scaler are exported from the training environment
//! as JSON documents wrapped in a versioned envelope:
//!
//! ```json
//! { "format_version": 1, "artifact_type": "standard_scaler", "artifact": { ... } }
//! ```
//!
//! Reading checks the envelope first, then converts the body into runtime
//! types with full validation. Use the [`Artifact`] trait:
//!
//! ```no_run
//! use obesity::persist::Artifact;
//! use obesity::RandomForestClassifier;
//!
//! let model = RandomForestClassifier::load("random_forest_obesity_model.json")?;
//! # Ok::<(), obesity::persist::ReadError>(())
//! ```

mod convert;
mod error;
pub mod schema;

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use error::{ReadError, WriteError};

use crate::model::RandomForestClassifier;
use crate::scaler::StandardScaler;
use schema::{EnvelopeSchema, RandomForestSchema, ScalerSchema};

/// Envelope version written and accepted by this build.
pub const FORMAT_VERSION: u32 = 1;

/// Kind of artifact stored in an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactType {
    RandomForestClassifier,
    StandardScaler,
}

impl ArtifactType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RandomForestClassifier => "random_forest_classifier",
            Self::StandardScaler => "standard_scaler",
        }
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A runtime type with an enveloped JSON representation.
pub trait Artifact: Sized {
    const TYPE: ArtifactType;

    /// Serialized body.
    type Schema: Serialize + DeserializeOwned;

    fn to_schema(&self) -> Self::Schema;

    fn from_schema(schema: Self::Schema) -> Result<Self, ReadError>;

    /// Read and validate an artifact from JSON.
    fn read_json<R: Read>(reader: R) -> Result<Self, ReadError> {
        let envelope: EnvelopeSchema<serde_json::Value> = serde_json::from_reader(reader)?;
        if envelope.format_version != FORMAT_VERSION {
            return Err(ReadError::UnsupportedVersion {
                found: envelope.format_version,
                supported: FORMAT_VERSION,
            });
        }
        if envelope.artifact_type != Self::TYPE.as_str() {
            return Err(ReadError::WrongArtifactType {
                expected: Self::TYPE,
                found: envelope.artifact_type,
            });
        }
        let schema: Self::Schema = serde_json::from_value(envelope.artifact)?;
        Self::from_schema(schema)
    }

    /// Read an artifact from a file.
    fn load(path: impl AsRef<Path>) -> Result<Self, ReadError> {
        let file = File::open(path)?;
        Self::read_json(BufReader::new(file))
    }

    /// Write the artifact as pretty-printed JSON.
    fn write_json<W: Write>(&self, writer: W) -> Result<(), WriteError> {
        let envelope = EnvelopeSchema {
            format_version: FORMAT_VERSION,
            artifact_type: Self::TYPE.as_str().to_string(),
            artifact: self.to_schema(),
        };
        serde_json::to_writer_pretty(writer, &envelope)?;
        Ok(())
    }

    /// Write the artifact to a file.
    fn save(&self, path: impl AsRef<Path>) -> Result<(), WriteError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_json(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

impl Artifact for RandomForestClassifier {
    const TYPE: ArtifactType = ArtifactType::RandomForestClassifier;
    type Schema = RandomForestSchema;

    fn to_schema(&self) -> Self::Schema {
        self.into()
    }

    fn from_schema(schema: Self::Schema) -> Result<Self, ReadError> {
        schema.try_into()
    }
}

impl Artifact for StandardScaler {
    const TYPE: ArtifactType = ArtifactType::StandardScaler;
    type Schema = ScalerSchema;

    fn to_schema(&self) -> Self::Schema {
        self.into()
    }

    fn from_schema(schema: Self::Schema) -> Result<Self, ReadError> {
        schema.try_into()
    }
}
