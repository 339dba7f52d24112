//! Command handlers.
//!
//! Each module implements the handlers for one category of commands:
//! - `structure` - Attach, swap and directional moves
//! - `direction` - Tiling direction changes and pending splits
//! - `redraw` - Layout of dirty containers
//! - `focus` - Focus, native foreground sync and borders
//! - `window` - Window lifecycle
//! - `workspace` - Workspace display and window transfer
//! - `monitor` - Display reconciliation and visibility restore
//! - `resize` - Share adjustments
//!
//! Handlers are free functions over [`TilingManager`]. They may invoke other
//! commands re-entrantly; the manager rolls the whole chain back if any step
//! fails.

pub mod direction;
pub mod focus;
pub mod monitor;
pub mod redraw;
pub mod resize;
pub mod structure;
pub mod window;
pub mod workspace;

pub use direction::{on_change_tiling_direction, on_toggle_tiling_direction};
pub use focus::{
    on_focus_in_direction, on_set_active_window_border, on_set_focused_descendant,
    on_sync_native_focus,
};
pub use monitor::{on_refresh_monitors, on_show_all_windows};
pub use redraw::on_redraw_containers;
pub use resize::on_resize_focused_window;
pub use structure::{on_attach_container, on_move_focused_window, on_swap_containers};
pub use window::{on_add_window, on_remove_window, on_update_window_rect};
pub use workspace::{on_focus_workspace, on_move_window_to_workspace};

use super::commands::Outcome;
use super::error::{TilingError, TilingResult};
use super::events::Event;
use super::manager::TilingManager;
use super::state::{ContainerId, ContainerTree};

// ============================================================================
// Shared helpers
// ============================================================================

/// The container that should receive focus when `workspace` is shown.
///
/// Prefers the workspace's last focused window, then its first window, then
/// the workspace itself.
#[must_use]
pub fn focus_target_in(tree: &ContainerTree, workspace: ContainerId) -> ContainerId {
    tree.get(workspace)
        .and_then(|ws| ws.as_workspace())
        .and_then(|data| data.last_focused)
        .filter(|&last| tree.is_window(last) && tree.workspace_of(last) == Some(workspace))
        .or_else(|| tree.windows_under(workspace).first().copied())
        .unwrap_or(workspace)
}

/// The window to focus once `window` leaves its workspace.
///
/// Looks at the previous sibling (descending to its last window), then the
/// next sibling (descending to its first), then any other window in the
/// workspace. Returns `None` when `window` is the workspace's only window.
#[must_use]
pub fn fallback_focus(tree: &ContainerTree, window: ContainerId) -> Option<ContainerId> {
    let parent = tree.parent_of(window)?;
    let siblings = tree.children_of(parent);
    let index = tree.index_in_parent(window)?;

    index
        .checked_sub(1)
        .and_then(|prev| siblings.get(prev))
        .and_then(|&prev| tree.descend_to_window(prev, true))
        .or_else(|| siblings.get(index + 1).and_then(|&next| tree.descend_to_window(next, false)))
        .or_else(|| {
            tree.workspace_of(window).and_then(|ws| {
                tree.windows_under(ws).into_iter().find(|&other| other != window)
            })
        })
}

/// Returns `true` if `workspace` is its monitor's displayed workspace.
#[must_use]
pub fn is_displayed(tree: &ContainerTree, workspace: ContainerId) -> bool {
    tree.monitor_of(workspace)
        .and_then(|monitor| tree.get(monitor))
        .and_then(|monitor| monitor.as_monitor())
        .is_some_and(|data| data.displayed_workspace == Some(workspace))
}

/// Moves focus and emits [`Event::FocusChanged`] when it actually moved.
pub(crate) fn apply_focus(manager: &mut TilingManager, target: ContainerId) -> TilingResult<Outcome> {
    match manager.containers_mut().set_focus(target)? {
        Some(change) => {
            manager.emit(Event::FocusChanged {
                previous: change.previous,
                current: change.current,
            });
            Ok(Outcome::Applied)
        }
        None => Ok(Outcome::NoOp),
    }
}

/// Moves focus off a workspace that is no longer empty.
///
/// Focus may only rest on a workspace while it has no children, so an
/// attach or swap that fills the focused workspace hands focus to one of its
/// windows.
pub(crate) fn refocus_filled_workspace(manager: &mut TilingManager) -> TilingResult<Outcome> {
    let service = manager.containers();
    let Some(focused) = service.focused_container() else {
        return Ok(Outcome::NoOp);
    };
    let tree = service.tree();
    let filled = tree
        .get(focused)
        .is_some_and(|node| node.is_workspace() && !node.children().is_empty());
    if !filled {
        return Ok(Outcome::NoOp);
    }

    let target = focus_target_in(tree, focused);
    apply_focus(manager, target)
}

/// The workspace-level name of a container, for logs and events.
pub(crate) fn workspace_name(tree: &ContainerTree, workspace: ContainerId) -> TilingResult<String> {
    tree.container(workspace)?
        .as_workspace()
        .map(|data| data.name.clone())
        .ok_or_else(|| TilingError::topology(format!("{workspace:?} is not a workspace")))
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Builders shared by the handler tests.

    use crate::config::TilingConfig;
    use crate::tiling::commands::Command;
    use crate::tiling::effects::RecordingSink;
    use crate::tiling::manager::TilingManager;
    use crate::tiling::state::{ContainerId, MonitorInfo, Rect, WindowHandle, WindowInfo};

    pub fn monitor(id: &str, x: f64) -> MonitorInfo {
        MonitorInfo {
            id: id.to_string(),
            rect: Rect::new(x, 0.0, 1000.0, 800.0),
            is_primary: x == 0.0,
        }
    }

    /// A manager without policies, one 1000x800 monitor and workspace "1".
    pub fn manager_with(config: TilingConfig) -> (TilingManager, RecordingSink) {
        let sink = RecordingSink::new();
        let mut manager = TilingManager::bare(config, Box::new(sink.clone()));
        manager.populate(vec![monitor("primary", 0.0)], Vec::new()).unwrap();
        sink.take();
        (manager, sink)
    }

    pub fn manager() -> (TilingManager, RecordingSink) { manager_with(TilingConfig::default()) }

    pub fn add(manager: &mut TilingManager, handle: u64) -> ContainerId {
        let outcome = manager
            .invoke(Command::AddWindow {
                handle: WindowHandle(handle),
                rect: Rect::new(0.0, 0.0, 300.0, 200.0),
                info: WindowInfo::default(),
            })
            .unwrap();
        match outcome {
            crate::tiling::commands::Outcome::Created(id) => id,
            other => panic!("expected a new window, got {other:?}"),
        }
    }

    pub fn shape(manager: &TilingManager) -> String {
        let tree = manager.containers().tree();
        let workspace = tree
            .workspaces()
            .into_iter()
            .find(|&ws| super::is_displayed(tree, ws))
            .unwrap();
        crate::tiling::state::TreeSnapshot::capture(tree, workspace, None).shape()
    }
}
