//! `validate` command: parse and sanity-check a configuration file

use std::path::Path;

use crate::cli::logging::{log, LogLevel};
use crate::config::{load_spec, validate_config};
use crate::error::Result;

pub fn run(config: &Path, level: LogLevel) -> Result<()> {
    let spec = load_spec(config)?;
    validate_config(&spec)?;

    log(level, LogLevel::Normal, "✓ Config is valid");
    log(
        level,
        LogLevel::Normal,
        &format!("  Dataset: {}", spec.data.train.display()),
    );
    log(
        level,
        LogLevel::Normal,
        &format!(
            "  Split: test_size={} seed={}",
            spec.data.test_size, spec.seed
        ),
    );
    log(
        level,
        LogLevel::Normal,
        &format!("  Artifacts: {}", spec.artifacts.dir.display()),
    );
    log(
        level,
        LogLevel::Normal,
        &format!("  Forest: {} trees", spec.model.forest.n_trees),
    );
    Ok(())
}
