//! Configuration types for Trellis.
//!
//! This module provides all configuration types organized by domain.
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

pub mod borders;
pub mod gaps;
pub mod root;
pub mod tiling;
pub mod workspaces;

// Border types
pub use borders::{BorderStateConfig, FocusBordersConfig};
// Gap types
pub use gaps::GapsConfig;
// Root config types
pub use root::{ConfigError, config_paths, load_config, load_config_from_path, parse_config};
// Tiling types
pub use tiling::{AutomaticTilingDirection, TilingConfig, WindowAnimations};
// Workspace types
pub use workspaces::{WindowRule, WorkspaceConfig};
