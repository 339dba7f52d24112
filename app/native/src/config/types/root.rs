//! Configuration loading.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::tiling::TilingConfig;

/// Configuration file names searched in each directory, in order.
const CONFIG_FILE_NAMES: [&str; 2] = ["config.jsonc", "config.json"];

/// Application directory name.
const APP_DIR: &str = "trellis";

/// Errors that can occur when loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at $XDG_CONFIG_HOME/trellis/config.jsonc or \
         ~/.config/trellis/config.jsonc"
    )]
    NotFound,

    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Returns the candidate configuration file paths, most preferred first.
///
/// 1. `$XDG_CONFIG_HOME/trellis/`
/// 2. `~/.config/trellis/`
/// 3. The platform configuration directory (e.g., `%APPDATA%\trellis\`)
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut dirs_to_search = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        dirs_to_search.push(PathBuf::from(xdg_config).join(APP_DIR));
    }
    if let Some(home) = dirs::home_dir() {
        dirs_to_search.push(home.join(".config").join(APP_DIR));
    }
    if let Some(config_dir) = dirs::config_dir() {
        dirs_to_search.push(config_dir.join(APP_DIR));
    }

    let mut paths = Vec::new();
    for dir in dirs_to_search {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }
    paths
}

/// Parses JSONC text into a prepared configuration.
///
/// # Errors
///
/// Returns [`ConfigError::ParseError`] if the text is not valid configuration.
pub fn parse_config(reader: impl Read) -> Result<TilingConfig, ConfigError> {
    let reader = json_comments::StripComments::new(reader);
    let mut config: TilingConfig = serde_json::from_reader(reader)?;
    config.prepare();
    Ok(config)
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, or invalid.
pub fn load_config_from_path(path: &Path) -> Result<(TilingConfig, PathBuf), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }
    let file = fs::File::open(path)?;
    let config = parse_config(file)?;
    Ok((config, path.to_path_buf()))
}

/// Loads the configuration from the first existing file in [`config_paths`].
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if no file exists, or the read/parse
/// error of the first file found.
pub fn load_config() -> Result<(TilingConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.exists() {
            return load_config_from_path(&path);
        }
    }
    Err(ConfigError::NotFound)
}
