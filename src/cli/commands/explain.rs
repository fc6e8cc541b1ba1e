//! `explain` command: print the prompt pair for a decided record
//!
//! The actual language-model call happens outside this binary; the
//! command only renders what that caller needs.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::explain::build_prompts;
use crate::schema::{ClaimRecord, SchemaRegistry, TARGET_COLUMN};

pub fn run(input: &Path) -> Result<()> {
    let raw = fs::read_to_string(input)
        .map_err(|e| Error::Config(format!("Failed to read input {}: {e}", input.display())))?;
    let record: ClaimRecord = serde_json::from_str(&raw)
        .map_err(|e| Error::Serialization(format!("{}: {e}", input.display())))?;

    if record.get(TARGET_COLUMN).is_null() {
        return Err(Error::Config(format!(
            "Input record must already carry a '{TARGET_COLUMN}' field; this command explains \
             decisions, it does not make them"
        )));
    }

    let registry = SchemaRegistry::claims();
    let (system, user) = build_prompts(&registry, &record)?;
    println!("--- system ---");
    println!("{system}");
    println!();
    println!("--- user ---");
    println!("{user}");
    Ok(())
}
