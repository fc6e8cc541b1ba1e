//! Crate-level error type
//!
//! Each module defines its own error enum; this aggregates them so CLI
//! handlers and orchestration code can use one `Result` alias.

use thiserror::Error;

use crate::artifact::ArtifactError;
use crate::encode::EncodeError;
use crate::infer::InferError;
use crate::model::ModelError;
use crate::schema::SchemaError;
use crate::train::TrainError;

/// Top-level error for pipeline operations
#[derive(Debug, Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Train(#[from] TrainError),

    #[error(transparent)]
    Infer(#[from] InferError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;
