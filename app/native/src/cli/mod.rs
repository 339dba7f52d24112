//! CLI module for Trellis.
//!
//! The CLI drives the tiling core without a native adapter: scenarios are
//! replayed through the actor with a recording effect sink.

mod commands;
mod output;
pub mod scenario;

use clap::Parser;
pub use commands::Cli;

use crate::error::TrellisError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), TrellisError> {
    let cli = Cli::parse();
    cli.execute()
}
