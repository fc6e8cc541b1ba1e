//! Artifact store: frozen encoders and classifier as versioned blobs
//!
//! Artifacts are created exclusively by a training run, published
//! atomically, then shared read-only by every inference call. Encoders
//! and classifier carry the run id that produced them; the manifest is
//! the single pointer pairing them, so a mixed-run artifact set cannot
//! be assembled.

mod store;

pub use store::{ArtifactStore, Manifest, TrainingArtifacts};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::EncoderBundle;
use crate::model::RandomForest;

/// Artifact store errors
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact missing: {0}")]
    Missing(String),

    #[error("Artifact '{file}' is from run {found}, manifest expects {expected}")]
    VersionMismatch {
        file: String,
        expected: String,
        found: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for artifact operations
pub type Result<T> = std::result::Result<T, ArtifactError>;

/// One coherent, immutable artifact set as loaded for serving
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactBundle {
    pub run_id: String,
    pub encoders: EncoderBundle,
    pub classifier: RandomForest,
}
