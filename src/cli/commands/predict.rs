//! `predict` command: build-if-absent, then score the input

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::cli::logging::{log, LogLevel};
use crate::config::{load_spec, validate_config};
use crate::error::{Error, Result};
use crate::infer::InferenceService;
use crate::schema::ClaimRecord;

/// A JSON object is one claim; an array is a batch.
#[derive(Deserialize)]
#[serde(untagged)]
enum PredictInput {
    Batch(Vec<ClaimRecord>),
    Single(ClaimRecord),
}

pub fn run(config: &Path, input: &Path, level: LogLevel) -> Result<()> {
    let spec = load_spec(config)?;
    validate_config(&spec)?;

    let raw = fs::read_to_string(input)
        .map_err(|e| Error::Config(format!("Failed to read input {}: {e}", input.display())))?;
    let parsed: PredictInput = serde_json::from_str(&raw)
        .map_err(|e| Error::Serialization(format!("{}: {e}", input.display())))?;

    let mut service = InferenceService::new(spec);
    service.ensure_ready()?;
    if let Some(run_id) = service.run_id() {
        log(level, LogLevel::Verbose, &format!("Serving artifacts from run {run_id}"));
    }

    let response = match parsed {
        PredictInput::Single(record) => {
            let prediction = service.predict(&record)?;
            serde_json::json!({ "prediction": prediction })
        }
        PredictInput::Batch(records) => {
            let predictions = service.predict_batch(&records)?;
            serde_json::json!({ "predictions": predictions })
        }
    };
    println!("{response}");
    Ok(())
}
