//! Claim field schema: the fixed field order, per-field roles, and the
//! typed record shape accepted at the serving boundary.
//!
//! Every downstream stage consults the registry for column order instead
//! of trusting the order of the incoming payload.

mod record;
mod registry;

pub use record::{ClaimRecord, RawValue};
pub use registry::{FieldDef, FieldRole, SchemaRegistry, TARGET_COLUMN};

use thiserror::Error;

/// Schema validation errors
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Target column '{0}' is absent from the dataset")]
    MissingTarget(String),

    #[error("Target value '{value}' in row {row} is not a known label")]
    UnknownLabel { row: usize, value: String },

    #[error("Field '{field}' in row {row}: expected {expected}, got '{value}'")]
    InvalidValue {
        row: usize,
        field: String,
        expected: &'static str,
        value: String,
    },
}

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;
