//! Command dispatch

mod explain;
mod predict;
mod train;
mod validate;

use crate::error::Result;

use super::logging::LogLevel;
use super::{Cli, Commands};

/// Execute the parsed command.
pub fn run_command(cli: Cli) -> Result<()> {
    let level = LogLevel::from_flags(cli.quiet, cli.verbose);
    match cli.command {
        Commands::Train { config } => train::run(&config, level),
        Commands::Predict { config, input } => predict::run(&config, &input, level),
        Commands::Explain { input } => explain::run(&input),
        Commands::Validate { config } => validate::run(&config, level),
    }
}
