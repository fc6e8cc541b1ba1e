//! CLI surface: argument parsing and command handlers

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::{log, LogLevel};

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Claim decision pipeline
#[derive(Parser)]
#[command(name = "reclamar", version, about = "Train and serve the claim decision pipeline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print additional details
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a full training pass and publish artifacts
    Train {
        /// Pipeline configuration (YAML)
        config: PathBuf,
    },

    /// Predict one record or a batch from a JSON file
    Predict {
        /// Pipeline configuration (YAML)
        config: PathBuf,

        /// JSON object (single record) or array (batch)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the explanation prompts for an already-decided record
    Explain {
        /// JSON record including its decision field
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Parse and validate a configuration file
    Validate {
        /// Pipeline configuration (YAML)
        config: PathBuf,
    },
}
