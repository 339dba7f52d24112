//! Window rule matching.
//!
//! Rules use AND logic: every property a rule specifies must match, and a
//! rule without properties never matches. Each property is a
//! case-insensitive substring match.
//!
//! # Examples
//!
//! ```text
//! // Rule: processName = "explorer.exe"
//! // Matches: any window owned by explorer.exe
//!
//! // Rule: processName = "firefox", title = "Picture-in-Picture"
//! // Matches: only Firefox's PiP window (AND logic)
//! ```

use crate::config::WindowRule;
use crate::tiling::state::WindowInfo;

/// Checks if a window matches a rule.
///
/// The rule is expected to have been prepared with
/// [`WindowRule::prepare`], which the config loader does for every rule.
#[must_use]
pub fn matches_window(rule: &WindowRule, window: &WindowInfo) -> bool {
    if !rule.is_valid() {
        return false;
    }

    field_matches(&window.title, rule.title_lowercase())
        && field_matches(&window.class_name, rule.class_name_lowercase())
        && field_matches(&window.process_name, rule.process_name_lowercase())
}

/// Checks if any rule in the list matches the window.
#[must_use]
pub fn is_ignored(rules: &[WindowRule], window: &WindowInfo) -> bool {
    rules.iter().any(|rule| matches_window(rule, window))
}

fn field_matches(value: &str, pattern: Option<&str>) -> bool {
    pattern.is_none_or(|pattern| value.to_lowercase().contains(pattern))
}
