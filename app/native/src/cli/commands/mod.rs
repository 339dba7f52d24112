//! CLI command definitions using Clap.
//!
//! - `simulate` - Scenario replay through the tiling core
//! - `config_cmd` - Configuration file commands

use std::io;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::error::TrellisError;

pub mod config_cmd;
pub mod simulate;

pub use config_cmd::ConfigCommands;
pub use simulate::SimulateArgs;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Trellis CLI - tiling window manager core tooling.
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Replay a scenario through the tiling core.
    ///
    /// Reads monitors, pre-existing windows and a list of events and
    /// commands, then prints the resulting container tree and the final
    /// placement of every window.
    #[command(after_long_help = r"Examples:
  trellis simulate session.jsonc
  trellis simulate session.jsonc --json
  trellis simulate session.jsonc --effects")]
    Simulate(SimulateArgs),

    /// Configuration file commands.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions.
    ///
    /// Usage:
    ///   eval "$(trellis completions zsh)"
    ///   trellis completions fish > ~/.config/fish/completions/trellis.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<&Path> { self.config.as_deref() }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), TrellisError> {
        if let Some(path) = self.config_path()
            && !path.exists()
        {
            return Err(TrellisError::ConfigError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        match &self.command {
            Commands::Simulate(args) => simulate::execute(args, self.config_path()),
            Commands::Config(cmd) => config_cmd::execute(cmd, self.config_path()),
            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "trellis", &mut io::stdout());
    }
}
