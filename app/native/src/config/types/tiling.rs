//! Tiling window manager configuration types.
//!
//! [`TilingConfig`] is the root of the configuration file. The manager holds
//! an immutable snapshot of it and swaps the whole snapshot on reload.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::borders::FocusBordersConfig;
use super::gaps::GapsConfig;
use super::workspaces::{WindowRule, WorkspaceConfig};
use crate::tiling::constants::timing::MOUSE_SAMPLE_INTERVAL_MS;
use crate::tiling::state::TilingDirection;

/// Policy for recomputing a window's split direction on focus and move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AutomaticTilingDirection {
    /// Never change directions automatically.
    #[default]
    Unchanged,
    /// Always split horizontally.
    Horizontal,
    /// Always split vertically.
    Vertical,
    /// Flip the direction relative to the parent container.
    Alternate,
    /// Split along the window's longer side.
    LargestDimension,
}

/// Window animation mode requested from the placement adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum WindowAnimations {
    /// Leave the system setting alone.
    #[default]
    Unchanged,
    /// Animate window placement.
    Enabled,
    /// Place windows without animation.
    Disabled,
}

const fn default_mouse_sample_interval() -> u64 { MOUSE_SAMPLE_INTERVAL_MS }

/// Tiling window manager configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct TilingConfig {
    /// Direction of newly created workspaces.
    /// Default: "horizontal"
    pub tiling_direction: TilingDirection,

    /// Automatic split direction policy.
    /// Default: "unchanged"
    pub automatic_tiling_direction: AutomaticTilingDirection,

    /// Focus the window under the cursor as it moves.
    /// Default: false
    pub focus_follows_cursor: bool,

    /// Move the cursor to the center of a newly focused window.
    /// Default: false
    pub cursor_follows_focus: bool,

    /// Window animation mode.
    /// Default: "unchanged"
    pub window_animations: WindowAnimations,

    /// Focus border settings.
    pub focus_borders: FocusBordersConfig,

    /// Gap sizes.
    pub gaps: GapsConfig,

    /// Workspace definitions.
    /// If empty, workspaces are named "1", "2", ... one per monitor.
    pub workspaces: Vec<WorkspaceConfig>,

    /// Windows that are never managed.
    pub ignore: Vec<WindowRule>,

    /// Minimum interval between processed mouse-move samples, in milliseconds.
    /// Default: 50
    #[serde(default = "default_mouse_sample_interval")]
    pub mouse_sample_interval_ms: u64,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            tiling_direction: TilingDirection::Horizontal,
            automatic_tiling_direction: AutomaticTilingDirection::Unchanged,
            focus_follows_cursor: false,
            cursor_follows_focus: false,
            window_animations: WindowAnimations::Unchanged,
            focus_borders: FocusBordersConfig::default(),
            gaps: GapsConfig::default(),
            workspaces: Vec::new(),
            ignore: Vec::new(),
            mouse_sample_interval_ms: MOUSE_SAMPLE_INTERVAL_MS,
        }
    }
}

impl TilingConfig {
    /// Pre-computes matching data for window rules.
    pub fn prepare(&mut self) {
        for rule in &mut self.ignore {
            rule.prepare();
        }
    }

    /// Returns the configured workspace with the given name.
    #[must_use]
    pub fn workspace(&self, name: &str) -> Option<&WorkspaceConfig> {
        self.workspaces.iter().find(|ws| ws.name == name)
    }

    /// Whether positioning requests should ask for animation.
    #[must_use]
    pub const fn animate(&self) -> bool {
        matches!(self.window_animations, WindowAnimations::Enabled)
    }

    /// Collects semantic problems that parsing alone does not catch.
    #[must_use]
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for (i, ws) in self.workspaces.iter().enumerate() {
            if ws.name.trim().is_empty() {
                problems.push(format!("workspaces[{i}] has an empty name"));
            }
            if self.workspaces[..i].iter().any(|other| other.name == ws.name) {
                problems.push(format!("workspace '{}' is defined more than once", ws.name));
            }
        }
        for (i, rule) in self.ignore.iter().enumerate() {
            if !rule.is_valid() {
                problems.push(format!("ignore[{i}] has no criteria and never matches"));
            }
        }
        for (state, border) in
            [("active", &self.focus_borders.active), ("inactive", &self.focus_borders.inactive)]
        {
            if !border.has_valid_color() {
                problems.push(format!("focusBorders.{state}.color '{}' is not a hex color", border.color));
            }
        }
        problems
    }
}
