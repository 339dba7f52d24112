//! Window lifecycle handlers.

use tracing::debug;

use super::{apply_focus, fallback_focus};
use crate::tiling::commands::{Command, Outcome};
use crate::tiling::constants::layout::RECT_EPSILON;
use crate::tiling::error::{TilingError, TilingResult};
use crate::tiling::events::Event;
use crate::tiling::manager::TilingManager;
use crate::tiling::rules;
use crate::tiling::state::{
    ContainerId, ContainerKind, InsertPosition, Rect, WindowData, WindowHandle, WindowInfo,
};

/// Handles `AddWindow`.
///
/// The window lands right after the focused window, or at the end of the
/// focused (or first) monitor's displayed workspace when no window has
/// focus. A pending split on the focused window is realized here.
pub fn on_add_window(
    manager: &mut TilingManager,
    handle: WindowHandle,
    rect: Rect,
    info: WindowInfo,
) -> TilingResult<Outcome> {
    if manager.containers().window_by_handle(handle).is_some() {
        debug!(%handle, "window already managed");
        return Ok(Outcome::NoOp);
    }
    if rules::is_ignored(&manager.config().ignore, &info) {
        debug!(%handle, title = %info.title, process = %info.process_name, "window ignored by rule");
        return Ok(Outcome::NoOp);
    }

    let window = manager.containers_mut().insert(ContainerKind::Window(WindowData {
        handle,
        info,
        pending_split: None,
    }));
    manager.containers_mut().tree_mut().container_mut(window)?.rect = rect;

    let tree = manager.containers().tree();
    let anchor = manager
        .containers()
        .focused_window()
        .and_then(|focused| tree.parent_of(focused).map(|parent| (focused, parent)));

    match anchor {
        Some((focused, parent)) => {
            let pending =
                tree.get(focused).and_then(|node| node.as_window()).and_then(|w| w.pending_split);
            let parent_direction = tree.direction_of(parent);
            let index = tree.index_in_parent(focused).map_or(0, |i| i + 1);

            if let Some(data) =
                manager.containers_mut().tree_mut().container_mut(focused)?.as_window_mut()
            {
                data.pending_split = None;
            }

            match pending.filter(|&direction| Some(direction) != parent_direction) {
                Some(direction) => {
                    let split = manager.containers_mut().wrap_pair(focused, window, direction)?;
                    manager.containers_mut().mark_dirty(parent);
                    debug!(?split, %direction, "realized pending split");
                }
                None => {
                    manager.invoke(Command::AttachContainer {
                        parent,
                        child: window,
                        position: InsertPosition::Index(index),
                    })?;
                }
            }
        }
        None => {
            let workspace = target_workspace(manager)?;
            manager.invoke(Command::AttachContainer {
                parent: workspace,
                child: window,
                position: InsertPosition::End,
            })?;
        }
    }

    apply_focus(manager, window)?;
    manager.emit(Event::WindowManaged { container: window, handle });
    manager.invoke(Command::RedrawContainers)?;
    debug!(%handle, container = ?window, "window managed");
    Ok(Outcome::Created(window))
}

/// Handles `RemoveWindow`.
///
/// When the removed window held focus, focus falls back to its closest
/// neighbour in the same workspace, or to the workspace once it is empty.
pub fn on_remove_window(manager: &mut TilingManager, handle: WindowHandle) -> TilingResult<Outcome> {
    let window = manager.containers().require_window(handle)?;
    let tree = manager.containers().tree();
    let was_focused = manager.containers().focused_container() == Some(window);
    let workspace = tree.workspace_of(window);
    let fallback = fallback_focus(tree, window);

    let detached = manager.containers_mut().remove(window)?;
    manager.containers_mut().mark_dirty(detached.parent);

    if manager.border_window() == Some(handle) {
        manager.set_border_window(None);
    }
    if manager.native_foreground() == Some(handle) {
        manager.set_native_foreground(None);
    }

    if was_focused && let Some(target) = fallback.or(workspace) {
        apply_focus(manager, target)?;
        manager.invoke(Command::SyncNativeFocus)?;
    }

    manager.emit(Event::WindowUnmanaged { handle });
    manager.invoke(Command::RedrawContainers)?;
    debug!(%handle, "window unmanaged");
    Ok(Outcome::Applied)
}

/// Handles `UpdateWindowRect`.
///
/// Only the cached geometry changes; the layout is left alone.
pub fn on_update_window_rect(
    manager: &mut TilingManager,
    handle: WindowHandle,
    rect: Rect,
) -> TilingResult<Outcome> {
    let window = manager.containers().require_window(handle)?;
    let node = manager.containers_mut().tree_mut().container_mut(window)?;
    if node.rect.approx_eq(&rect, RECT_EPSILON) {
        return Ok(Outcome::NoOp);
    }
    node.rect = rect;
    Ok(Outcome::Applied)
}

/// The workspace a window goes to when no window holds focus.
fn target_workspace(manager: &TilingManager) -> TilingResult<ContainerId> {
    let tree = manager.containers().tree();
    if let Some(focused) = manager.containers().focused_container()
        && tree.get(focused).is_some_and(|node| node.is_workspace())
    {
        return Ok(focused);
    }

    let monitor = manager
        .containers()
        .focused_container()
        .and_then(|focused| tree.monitor_of(focused))
        .or_else(|| tree.monitors().first().copied())
        .ok_or_else(|| TilingError::not_found("monitor for new window"))?;

    tree.get(monitor)
        .and_then(|node| node.as_monitor())
        .and_then(|data| data.displayed_workspace)
        .ok_or_else(|| TilingError::topology(format!("{monitor:?} has no displayed workspace")))
}
