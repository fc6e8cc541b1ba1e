//! reclamar: deterministic claim-decision pipeline
//!
//! Turns raw insurance claim records into the exact numeric feature
//! vectors a trained classifier expects, with bit-for-bit train/serve
//! parity: every transformation statistic (imputation fills, label
//! maps, one-hot vocabularies) is fitted once during training, frozen
//! into versioned artifacts, and only replayed at serving time.
//!
//! # Example
//!
//! ```no_run
//! use reclamar::config::load_spec;
//! use reclamar::infer::InferenceService;
//! use reclamar::schema::ClaimRecord;
//!
//! let spec = load_spec("reclamar.yaml")?;
//! let mut service = InferenceService::new(spec);
//! service.ensure_ready()?; // trains first if no artifacts exist
//! let decision = service.predict(&ClaimRecord::sample())?;
//! # Ok::<(), reclamar::Error>(())
//! ```

pub mod artifact;
pub mod cli;
pub mod config;
pub mod data;
pub mod encode;
mod error;
pub mod eval;
pub mod explain;
pub mod infer;
pub mod model;
pub mod schema;
pub mod train;

pub use error::{Error, Result};
