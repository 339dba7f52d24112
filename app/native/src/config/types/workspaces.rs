//! Workspace and window rule configuration types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Window matching rule.
///
/// All specified properties must match (AND logic); each is a
/// case-insensitive substring match. A rule with no properties never matches.
///
/// # Performance
///
/// Call [`WindowRule::prepare()`] after loading rules from config to pre-compute
/// lowercase versions of string fields. This avoids repeated `to_lowercase()` calls
/// during window matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct WindowRule {
    /// Match by window title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Match by native window class name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Match by owning process name (e.g., "explorer.exe").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_name: Option<String>,

    // Cached lowercase versions for fast matching (computed by prepare())
    #[serde(skip)]
    #[schemars(skip)]
    pub(crate) title_lower: Option<String>,

    #[serde(skip)]
    #[schemars(skip)]
    pub(crate) class_name_lower: Option<String>,

    #[serde(skip)]
    #[schemars(skip)]
    pub(crate) process_name_lower: Option<String>,
}

impl WindowRule {
    /// Returns true if the rule has at least one matching criterion.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.title.is_some() || self.class_name.is_some() || self.process_name.is_some()
    }

    /// Pre-computes lowercase versions of string fields for faster matching.
    pub fn prepare(&mut self) {
        self.title_lower = self.title.as_ref().map(|s| s.to_lowercase());
        self.class_name_lower = self.class_name.as_ref().map(|s| s.to_lowercase());
        self.process_name_lower = self.process_name.as_ref().map(|s| s.to_lowercase());
    }

    /// Returns the cached lowercase title, or the original if not cached.
    #[must_use]
    pub fn title_lowercase(&self) -> Option<&str> {
        self.title_lower.as_deref().or(self.title.as_deref())
    }

    /// Returns the cached lowercase class name, or the original if not cached.
    #[must_use]
    pub fn class_name_lowercase(&self) -> Option<&str> {
        self.class_name_lower.as_deref().or(self.class_name.as_deref())
    }

    /// Returns the cached lowercase process name, or the original if not cached.
    #[must_use]
    pub fn process_name_lowercase(&self) -> Option<&str> {
        self.process_name_lower.as_deref().or(self.process_name.as_deref())
    }
}

/// Workspace configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    /// Unique name for the workspace.
    pub name: String,

    /// Index of the monitor (in enumeration order) this workspace starts on.
    /// Unbound workspaces fill monitors left without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_to_monitor: Option<usize>,

    /// Keep the workspace when it is hidden and empty.
    /// Default: false
    #[serde(default)]
    pub keep_alive: bool,
}
