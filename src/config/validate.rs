//! Configuration validation, run before any training or serving

use crate::error::{Error, Result};

use super::schema::PipelineSpec;

/// Validate a parsed configuration. Returns the first problem found.
pub fn validate_config(spec: &PipelineSpec) -> Result<()> {
    if !(spec.data.test_size > 0.0 && spec.data.test_size < 1.0) {
        return Err(Error::Config(format!(
            "data.test_size must be in (0, 1), got {}",
            spec.data.test_size
        )));
    }
    if spec.model.forest.n_trees == 0 {
        return Err(Error::Config("model.forest.n_trees must be at least 1".into()));
    }
    if spec.model.forest.min_samples_split < 2 {
        return Err(Error::Config(
            "model.forest.min_samples_split must be at least 2".into(),
        ));
    }
    if spec.model.forest.min_samples_leaf == 0 {
        return Err(Error::Config(
            "model.forest.min_samples_leaf must be at least 1".into(),
        ));
    }
    if spec.target.keys.is_empty() || spec.target.keys.len() != spec.target.values.len() {
        return Err(Error::Config(format!(
            "target.keys and target.values must be non-empty and the same length, got {} and {}",
            spec.target.keys.len(),
            spec.target.values.len()
        )));
    }
    Ok(())
}
