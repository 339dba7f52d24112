//! Command types for the tiling manager.
//!
//! A [`Command`] is a typed request with exactly one handler. Commands are
//! dispatched synchronously by [`TilingManager::invoke`](super::TilingManager::invoke)
//! and either complete or leave the tree untouched.

use serde::Serialize;

use crate::tiling::state::{
    ContainerId, Direction, InsertPosition, MonitorInfo, Rect, TilingDirection, WindowHandle,
    WindowInfo,
};

/// Requests that mutate (or act on) the container tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ════════════════════════════════════════════════════════════════════════
    // Structure
    // ════════════════════════════════════════════════════════════════════════
    /// Moves the focused window one step in a direction.
    MoveFocusedWindow { direction: Direction },

    /// Attaches a container under `parent`, detaching it first if needed.
    AttachContainer {
        parent: ContainerId,
        child: ContainerId,
        position: InsertPosition,
    },

    /// Exchanges the positions of two containers.
    SwapContainers { a: ContainerId, b: ContainerId },

    /// Sets the layout direction associated with a container.
    ChangeTilingDirection {
        container: ContainerId,
        direction: TilingDirection,
    },

    /// Flips the layout direction associated with the focused container.
    ToggleTilingDirection,

    /// Grows (positive) or shrinks (negative) the focused window's share.
    ResizeFocusedWindow { amount: f64 },

    // ════════════════════════════════════════════════════════════════════════
    // Redraw & Focus
    // ════════════════════════════════════════════════════════════════════════
    /// Lays out every dirty container and positions its windows.
    RedrawContainers,

    /// Brings the focused window to the native foreground.
    SyncNativeFocus,

    /// Draws the focus border around a window, or clears it.
    SetActiveWindowBorder { window: Option<ContainerId> },

    /// Focuses a Window or an empty Workspace.
    SetFocusedDescendant { container: ContainerId },

    /// Focuses the nearest window in a direction.
    FocusInDirection { direction: Direction },

    // ════════════════════════════════════════════════════════════════════════
    // Window Lifecycle
    // ════════════════════════════════════════════════════════════════════════
    /// Starts managing a native window.
    AddWindow {
        handle: WindowHandle,
        rect: Rect,
        info: WindowInfo,
    },

    /// Stops managing a native window.
    RemoveWindow { handle: WindowHandle },

    /// Refreshes the cached geometry of a managed window.
    UpdateWindowRect { handle: WindowHandle, rect: Rect },

    // ════════════════════════════════════════════════════════════════════════
    // Workspaces & Monitors
    // ════════════════════════════════════════════════════════════════════════
    /// Displays a workspace, creating it if needed.
    FocusWorkspace { name: String },

    /// Moves the focused window to the end of a workspace.
    MoveWindowToWorkspace { name: String },

    /// Reconciles Monitor nodes with the enumerated displays.
    RefreshMonitors { monitors: Vec<MonitorInfo> },

    /// Makes every managed window visible.
    ShowAllWindows,
}

impl Command {
    /// Returns the command name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            // Structure
            Self::MoveFocusedWindow { .. } => "MoveFocusedWindow",
            Self::AttachContainer { .. } => "AttachContainer",
            Self::SwapContainers { .. } => "SwapContainers",
            Self::ChangeTilingDirection { .. } => "ChangeTilingDirection",
            Self::ToggleTilingDirection => "ToggleTilingDirection",
            Self::ResizeFocusedWindow { .. } => "ResizeFocusedWindow",

            // Redraw & Focus
            Self::RedrawContainers => "RedrawContainers",
            Self::SyncNativeFocus => "SyncNativeFocus",
            Self::SetActiveWindowBorder { .. } => "SetActiveWindowBorder",
            Self::SetFocusedDescendant { .. } => "SetFocusedDescendant",
            Self::FocusInDirection { .. } => "FocusInDirection",

            // Window Lifecycle
            Self::AddWindow { .. } => "AddWindow",
            Self::RemoveWindow { .. } => "RemoveWindow",
            Self::UpdateWindowRect { .. } => "UpdateWindowRect",

            // Workspaces & Monitors
            Self::FocusWorkspace { .. } => "FocusWorkspace",
            Self::MoveWindowToWorkspace { .. } => "MoveWindowToWorkspace",
            Self::RefreshMonitors { .. } => "RefreshMonitors",
            Self::ShowAllWindows => "ShowAllWindows",
        }
    }
}

/// Successful result of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "container", rename_all = "kebab-case")]
pub enum Outcome {
    /// The command changed state or issued effects.
    Applied,
    /// Nothing needed to change.
    NoOp,
    /// The command created a container.
    Created(ContainerId),
}

impl Outcome {
    /// Returns `true` unless the command was a no-op.
    #[must_use]
    pub const fn changed(self) -> bool { !matches!(self, Self::NoOp) }

    /// Collapses a flag into `Applied`/`NoOp`.
    #[must_use]
    pub const fn from_changed(changed: bool) -> Self {
        if changed { Self::Applied } else { Self::NoOp }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names() {
        assert_eq!(
            Command::MoveFocusedWindow { direction: Direction::Left }.name(),
            "MoveFocusedWindow"
        );
        assert_eq!(Command::RedrawContainers.name(), "RedrawContainers");
        assert_eq!(Command::ShowAllWindows.name(), "ShowAllWindows");
    }

    #[test]
    fn test_outcome_helpers() {
        assert!(Outcome::Applied.changed());
        assert!(!Outcome::NoOp.changed());
        assert_eq!(Outcome::from_changed(false), Outcome::NoOp);
        assert_eq!(Outcome::from_changed(true), Outcome::Applied);
    }
}
