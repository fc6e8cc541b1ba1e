//! Reclamar CLI
//!
//! # Usage
//!
//! ```bash
//! # Train and publish artifacts
//! reclamar train reclamar.yaml
//!
//! # Predict a single claim or a batch
//! reclamar predict reclamar.yaml --input claim.json
//!
//! # Render explanation prompts for a decided claim
//! reclamar explain --input decided_claim.json
//!
//! # Validate config
//! reclamar validate reclamar.yaml
//! ```

use clap::Parser;
use reclamar::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
