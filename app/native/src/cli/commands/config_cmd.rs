//! Config CLI commands.
//!
//! Commands for locating, describing and checking the configuration file.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use colored::Colorize;

use crate::cli::output;
use crate::config::{TilingConfig, config_paths, load_config_default, load_config_from_path};
use crate::error::TrellisError;

/// Config management commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Show where Trellis looks for its configuration file.
    ///
    /// Lists the search paths in priority order and marks the one in use.
    Path,

    /// Output the configuration JSON Schema.
    ///
    /// Redirect it to a file for editors that support JSON Schema validation.
    Schema,

    /// Check a configuration file for errors.
    ///
    /// Parses the file and reports semantic problems such as duplicate
    /// workspace names or ignore rules without criteria.
    #[command(after_long_help = r"Examples:
  trellis config validate                     # Check the active configuration
  trellis config validate ~/my-config.jsonc   # Check a specific file")]
    Validate {
        /// File to check. Defaults to the active configuration.
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },
}

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cmd: &ConfigCommands, config_path: Option<&Path>) -> Result<(), TrellisError> {
    match cmd {
        ConfigCommands::Path => {
            show_config_path();
            Ok(())
        }
        ConfigCommands::Schema => print_schema(),
        ConfigCommands::Validate { path } => validate(path.as_deref().or(config_path)),
    }
}

fn show_config_path() {
    println!("Configuration file search paths (in priority order):\n");

    let mut found_config = false;
    for (i, path) in config_paths().iter().enumerate() {
        let exists = path.exists();
        let marker = if exists && !found_config {
            found_config = true;
            " (active)".green().to_string()
        } else if exists {
            " (exists)".to_string()
        } else {
            String::new()
        };

        println!("  {}. {}{}", i + 1, path.display(), marker);
    }

    if !found_config {
        println!("\nNo configuration file found. Defaults are in effect.");
    }
}

fn print_schema() -> Result<(), TrellisError> {
    let schema = schemars::schema_for!(TilingConfig);
    output::print_highlighted_json(&serde_json::to_value(&schema)?);
    Ok(())
}

fn validate(path: Option<&Path>) -> Result<(), TrellisError> {
    let (config, path) = match path {
        Some(path) => load_config_from_path(path)?,
        None => load_config_default()?,
    };

    let problems = config.problems();
    if problems.is_empty() {
        println!("{} {}", "✓".green(), path.display());
        return Ok(());
    }

    for problem in &problems {
        println!("{} {problem}", "✗".red());
    }
    Err(TrellisError::ConfigError(format!(
        "{} problem(s) found in {}",
        problems.len(),
        path.display()
    )))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_validate_accepts_clean_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "gaps": {{ "inner": 8, "outer": 8 }} }}"#).unwrap();

        assert!(validate(Some(file.path())).is_ok());
    }

    #[test]
    fn test_validate_reports_problems() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{
                // Duplicate names
                "workspaces": [{{ "name": "code" }}, {{ "name": "code" }}]
            }}"#
        )
        .unwrap();

        let err = validate(Some(file.path())).unwrap_err();
        assert!(matches!(err, TrellisError::ConfigError(_)));
        assert!(err.to_string().contains("1 problem(s)"));
    }

    #[test]
    fn test_validate_missing_file() {
        let result = validate(Some(Path::new("/nonexistent/trellis/config.jsonc")));
        assert!(matches!(result, Err(TrellisError::ConfigError(_))));
    }
}
