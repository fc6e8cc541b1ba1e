//! `train` command: one explicit training run

use std::path::Path;

use crate::artifact::ArtifactStore;
use crate::cli::logging::{log, LogLevel};
use crate::config::{load_spec, validate_config};
use crate::error::Result;
use crate::schema::SchemaRegistry;
use crate::train;

pub fn run(config: &Path, level: LogLevel) -> Result<()> {
    let spec = load_spec(config)?;
    validate_config(&spec)?;
    log(level, LogLevel::Normal, "✓ Config loaded and validated");

    let registry = SchemaRegistry::claims();
    let outcome = train::run(&spec, &registry)?;

    log(
        level,
        LogLevel::Normal,
        &format!(
            "✓ Run {} trained on {} rows, evaluated on {}",
            outcome.run_id, outcome.train_rows, outcome.test_rows
        ),
    );
    log(level, LogLevel::Normal, &outcome.report.to_string());
    let store = ArtifactStore::new(&spec.artifacts.dir);
    log(
        level,
        LogLevel::Verbose,
        &format!("Scores saved to {}", store.metrics_path(&outcome.run_id).display()),
    );
    Ok(())
}
