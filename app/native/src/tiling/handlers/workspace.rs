//! Workspace handlers.

use tracing::debug;

use super::{apply_focus, fallback_focus, focus_target_in, is_displayed, workspace_name};
use crate::tiling::commands::{Command, Outcome};
use crate::tiling::effects::SideEffect;
use crate::tiling::error::{TilingError, TilingResult};
use crate::tiling::events::Event;
use crate::tiling::manager::TilingManager;
use crate::tiling::state::{
    ContainerId, ContainerKind, InsertPosition, WindowHandle, WorkspaceData,
};

/// Handles `FocusWorkspace`.
///
/// The workspace is created on the focused monitor if it does not exist yet.
/// Focus returns to the window that last had it there.
pub fn on_focus_workspace(manager: &mut TilingManager, name: &str) -> TilingResult<Outcome> {
    let workspace = ensure_workspace(manager, name)?;
    let switched = display_workspace(manager, workspace)?;

    let target = focus_target_in(manager.containers().tree(), workspace);
    let focused = apply_focus(manager, target)?;
    manager.invoke(Command::SyncNativeFocus)?;
    manager.invoke(Command::RedrawContainers)?;

    Ok(Outcome::from_changed(switched || focused.changed()))
}

/// Handles `MoveWindowToWorkspace`.
///
/// The focused window goes to the end of the target workspace and is hidden
/// if that workspace is not displayed. Focus stays in the source workspace.
pub fn on_move_window_to_workspace(
    manager: &mut TilingManager,
    name: &str,
) -> TilingResult<Outcome> {
    let Some(window) = manager.containers().focused_window() else {
        return Ok(Outcome::NoOp);
    };
    let tree = manager.containers().tree();
    let source = tree
        .workspace_of(window)
        .ok_or_else(|| TilingError::not_found(format!("workspace of {window:?}")))?;
    if workspace_name(tree, source)? == name {
        return Ok(Outcome::NoOp);
    }
    let fallback = fallback_focus(tree, window).unwrap_or(source);
    let handle = manager
        .containers()
        .handle_of(window)
        .ok_or_else(|| TilingError::not_found(format!("handle of {window:?}")))?;

    let target = ensure_workspace(manager, name)?;
    manager.invoke(Command::AttachContainer {
        parent: target,
        child: window,
        position: InsertPosition::End,
    })?;

    let tree = manager.containers_mut().tree_mut();
    if let Some(data) = tree.container_mut(window)?.as_window_mut() {
        data.pending_split = None;
    }
    if let Some(data) = tree.container_mut(target)?.as_workspace_mut() {
        data.last_focused = Some(window);
    }
    if !is_displayed(manager.containers().tree(), target) {
        manager.push_effect(SideEffect::HideWindow { handle });
    }

    apply_focus(manager, fallback)?;
    manager.invoke(Command::SyncNativeFocus)?;
    manager.invoke(Command::RedrawContainers)?;
    debug!(%handle, workspace = name, "moved window to workspace");
    Ok(Outcome::Applied)
}

/// Finds a workspace by name, creating it on the focused monitor if needed.
pub(crate) fn ensure_workspace(manager: &mut TilingManager, name: &str) -> TilingResult<ContainerId> {
    let tree = manager.containers().tree();
    if let Some(workspace) = tree.workspace_by_name(name) {
        return Ok(workspace);
    }
    if name.trim().is_empty() {
        return Err(TilingError::topology("workspace names cannot be empty"));
    }

    let monitor = manager
        .containers()
        .focused_container()
        .and_then(|focused| tree.monitor_of(focused))
        .or_else(|| tree.monitors().first().copied())
        .ok_or_else(|| TilingError::not_found("monitor for new workspace"))?;

    create_workspace(manager, monitor, name)
}

/// Creates a hidden workspace at the end of `monitor`.
pub(crate) fn create_workspace(
    manager: &mut TilingManager,
    monitor: ContainerId,
    name: &str,
) -> TilingResult<ContainerId> {
    let config = manager.config();
    let data = WorkspaceData {
        name: name.to_string(),
        direction: config.tiling_direction,
        last_focused: None,
        keep_alive: config.workspace(name).is_some_and(|ws| ws.keep_alive),
    };

    let workspace = manager.containers_mut().insert(ContainerKind::Workspace(data));
    manager.containers_mut().attach(monitor, workspace, InsertPosition::End)?;
    debug!(workspace = name, ?monitor, "created workspace");
    Ok(workspace)
}

/// Makes `workspace` the displayed workspace of its monitor.
///
/// Windows of the previously displayed workspace are hidden and those of the
/// new one shown. The previous workspace is destroyed when it is empty and
/// not kept alive. Returns `false` if it was already displayed.
pub(crate) fn display_workspace(
    manager: &mut TilingManager,
    workspace: ContainerId,
) -> TilingResult<bool> {
    let tree = manager.containers().tree();
    let name = workspace_name(tree, workspace)?;
    let monitor = tree
        .monitor_of(workspace)
        .ok_or_else(|| TilingError::not_found(format!("monitor of {workspace:?}")))?;
    let previous = tree.container(monitor)?.as_monitor().and_then(|data| data.displayed_workspace);
    if previous == Some(workspace) {
        return Ok(false);
    }

    let retired = match previous {
        Some(old) => {
            let data = tree
                .container(old)?
                .as_workspace()
                .ok_or_else(|| TilingError::topology(format!("{old:?} is not a workspace")))?;
            let disposable = !data.keep_alive && tree.children_of(old).is_empty();
            Some((old, data.name.clone(), disposable))
        }
        None => None,
    };
    let hidden = previous.map(|old| window_handles(manager, old)).unwrap_or_default();
    let shown = window_handles(manager, workspace);

    for handle in hidden {
        manager.push_effect(SideEffect::HideWindow { handle });
    }
    for handle in shown {
        manager.push_effect(SideEffect::ShowWindow { handle });
    }
    let monitor_node = manager.containers_mut().tree_mut().container_mut(monitor)?;
    if let Some(data) = monitor_node.as_monitor_mut() {
        data.displayed_workspace = Some(workspace);
    }
    manager.containers_mut().mark_dirty(workspace);

    if let Some((old, old_name, disposable)) = retired {
        if disposable {
            manager.containers_mut().remove(old)?;
            debug!(workspace = %old_name, "destroyed empty workspace");
        }
        manager.emit(Event::WorkspaceDeactivated { name: old_name });
    }
    manager.emit(Event::WorkspaceActivated { workspace, name: name.clone() });
    debug!(workspace = %name, "workspace displayed");
    Ok(true)
}

fn window_handles(manager: &TilingManager, workspace: ContainerId) -> Vec<WindowHandle> {
    let containers = manager.containers();
    containers
        .tree()
        .windows_under(workspace)
        .into_iter()
        .filter_map(|window| containers.handle_of(window))
        .collect()
}
