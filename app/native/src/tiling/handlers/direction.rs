//! Tiling direction handlers.
//!
//! A direction change on a Window with siblings is recorded as a pending
//! split on the window. The split container itself is created when the next
//! window is inserted beside it, so no split ever holds a single child.

use tracing::debug;

use crate::tiling::commands::{Command, Outcome};
use crate::tiling::error::{TilingError, TilingResult};
use crate::tiling::events::Event;
use crate::tiling::manager::TilingManager;
use crate::tiling::state::{ContainerId, ContainerKind, TilingDirection};

/// Handles `ChangeTilingDirection`.
pub fn on_change_tiling_direction(
    manager: &mut TilingManager,
    container: ContainerId,
    direction: TilingDirection,
) -> TilingResult<Outcome> {
    let tree = manager.containers().tree();
    let node = tree.container(container)?;

    match &node.kind {
        ContainerKind::Workspace(_) | ContainerKind::Split(_) => {
            set_direction(manager, container, direction)
        }
        ContainerKind::Window(window) => {
            let parent = node
                .parent()
                .ok_or_else(|| TilingError::topology(format!("{container:?} is not attached")))?;
            let only_child = tree.children_of(parent).len() == 1;
            let parent_direction = tree.direction_of(parent);
            let had_pending = window.pending_split.is_some();

            if only_child || parent_direction == Some(direction) {
                clear_pending(manager, container)?;
                if only_child {
                    let outcome = set_direction(manager, parent, direction)?;
                    return Ok(Outcome::from_changed(outcome.changed() || had_pending));
                }
                return Ok(Outcome::from_changed(had_pending));
            }

            let data = manager
                .containers_mut()
                .tree_mut()
                .container_mut(container)?
                .as_window_mut()
                .ok_or_else(|| TilingError::topology("expected a window"))?;
            if data.pending_split == Some(direction) {
                return Ok(Outcome::NoOp);
            }
            data.pending_split = Some(direction);
            debug!(?container, %direction, "pending split recorded");
            Ok(Outcome::Applied)
        }
        ContainerKind::Monitor(_) | ContainerKind::Root => Err(TilingError::topology(format!(
            "a {} has no tiling direction",
            node.kind.name()
        ))),
    }
}

/// Handles `ToggleTilingDirection`.
///
/// Flips whatever direction currently applies to the focused container: its
/// pending split, its parent's direction, or an empty workspace's own.
pub fn on_toggle_tiling_direction(manager: &mut TilingManager) -> TilingResult<Outcome> {
    let Some(focused) = manager.containers().focused_container() else {
        return Ok(Outcome::NoOp);
    };
    let tree = manager.containers().tree();
    let node = tree.container(focused)?;

    let current = match node.as_window() {
        Some(window) => window
            .pending_split
            .or_else(|| node.parent().and_then(|parent| tree.direction_of(parent))),
        None => node.direction(),
    };
    let Some(current) = current else {
        return Ok(Outcome::NoOp);
    };

    let outcome = manager.invoke(Command::ChangeTilingDirection {
        container: focused,
        direction: current.inverse(),
    })?;
    manager.invoke(Command::RedrawContainers)?;
    Ok(outcome)
}

/// Sets a Workspace or Split direction, marking it dirty on change.
fn set_direction(
    manager: &mut TilingManager,
    container: ContainerId,
    direction: TilingDirection,
) -> TilingResult<Outcome> {
    let changed =
        manager.containers_mut().tree_mut().container_mut(container)?.set_direction(direction);
    if !changed {
        return Ok(Outcome::NoOp);
    }

    manager.containers_mut().mark_dirty(container);
    manager.emit(Event::TilingDirectionChanged { container, direction });
    debug!(?container, %direction, "tiling direction changed");
    Ok(Outcome::Applied)
}

fn clear_pending(manager: &mut TilingManager, window: ContainerId) -> TilingResult<()> {
    if let Some(data) =
        manager.containers_mut().tree_mut().container_mut(window)?.as_window_mut()
    {
        data.pending_split = None;
    }
    Ok(())
}
