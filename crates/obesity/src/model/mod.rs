//! High-level model wrappers.
//!
//! - [`RandomForestClassifier`]: averaging tree ensemble
//! - [`ModelMeta`]: feature and class metadata

mod meta;
mod random_forest;

pub use meta::ModelMeta;
pub use random_forest::RandomForestClassifier;
