//! Configuration module for Trellis.
//!
//! This module provides configuration types, loading functionality, and file watching
//! for hot-reloading configuration changes.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

pub mod types;
mod watcher;

use std::path::{Path, PathBuf};

pub use types::{
    AutomaticTilingDirection, BorderStateConfig, ConfigError, FocusBordersConfig, GapsConfig,
    TilingConfig, WindowAnimations, WindowRule, WorkspaceConfig, config_paths,
    load_config as load_config_default, load_config_from_path, parse_config,
};
pub use watcher::{CONFIG_DEBOUNCE_MS, watch_config_file};

/// Locates the configuration file, honoring an explicit override.
#[must_use]
pub fn resolve_config_path(custom: Option<&Path>) -> Option<PathBuf> {
    match custom {
        Some(path) => Some(path.to_path_buf()),
        None => config_paths().into_iter().find(|path| path.exists()),
    }
}

/// Loads the configuration, falling back to defaults.
///
/// A missing file is normal and yields the defaults silently; any other
/// failure is logged. Returns the path that was loaded, if any.
#[must_use]
pub fn load_or_default(custom: Option<&Path>) -> (TilingConfig, Option<PathBuf>) {
    let result = custom.map_or_else(load_config_default, load_config_from_path);

    match result {
        Ok((config, path)) => {
            tracing::debug!(path = %path.display(), "loaded configuration");
            (config, Some(path))
        }
        Err(ConfigError::NotFound) => {
            tracing::debug!("no configuration file found, using defaults");
            (TilingConfig::default(), None)
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration, using defaults");
            (TilingConfig::default(), None)
        }
    }
}
