//! Focus border configuration types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Settings for one border state (active or inactive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct BorderStateConfig {
    /// Whether the border is drawn for this state.
    pub enabled: bool,

    /// Border color as a hex string (`#rrggbb` or `#rrggbbaa`).
    pub color: String,
}

impl BorderStateConfig {
    fn with_defaults(enabled: bool, color: &str) -> Self {
        Self { enabled, color: color.to_string() }
    }

    /// Returns whether this border state is enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool { self.enabled }

    /// Returns `true` if `color` is a well-formed hex color.
    #[must_use]
    pub fn has_valid_color(&self) -> bool {
        let Some(hex) = self.color.strip_prefix('#') else {
            return false;
        };
        matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
    }
}

impl Default for BorderStateConfig {
    fn default() -> Self { Self::with_defaults(false, "#585b70") }
}

/// Focus border configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct FocusBordersConfig {
    /// Border drawn around the focused window.
    /// Default: enabled, `#89b4fa`
    pub active: BorderStateConfig,

    /// Border drawn around the window that just lost focus.
    /// Default: disabled
    pub inactive: BorderStateConfig,
}

impl Default for FocusBordersConfig {
    fn default() -> Self {
        Self {
            active: BorderStateConfig::with_defaults(true, "#89b4fa"),
            inactive: BorderStateConfig::default(),
        }
    }
}
