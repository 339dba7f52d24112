//! Focus handlers.

use tracing::debug;

use super::apply_focus;
use super::workspace::display_workspace;
use crate::tiling::commands::{Command, Outcome};
use crate::tiling::effects::SideEffect;
use crate::tiling::error::{TilingError, TilingResult};
use crate::tiling::events::Event;
use crate::tiling::manager::TilingManager;
use crate::tiling::state::{ContainerId, Direction};

/// Handles `SyncNativeFocus`.
///
/// Pushes the focused window to the OS foreground unless the OS already
/// reported it there.
pub fn on_sync_native_focus(manager: &mut TilingManager) -> TilingResult<Outcome> {
    let Some(container) = manager.containers().focused_window() else {
        return Ok(Outcome::NoOp);
    };
    let handle = manager
        .containers()
        .handle_of(container)
        .ok_or_else(|| TilingError::not_found(format!("handle of {container:?}")))?;

    if manager.native_foreground() == Some(handle) {
        return Ok(Outcome::NoOp);
    }

    manager.push_effect(SideEffect::SetForegroundWindow { handle });
    manager.set_native_foreground(Some(handle));
    manager.emit(Event::NativeFocusSynced { container, handle });
    debug!(%handle, "native focus synced");
    Ok(Outcome::Applied)
}

/// Handles `SetActiveWindowBorder`.
///
/// Never touches the tree. The previous window gets the inactive border when
/// inactive borders are enabled.
pub fn on_set_active_window_border(
    manager: &mut TilingManager,
    window: Option<ContainerId>,
) -> TilingResult<Outcome> {
    let handle = match window {
        Some(id) => Some(
            manager
                .containers()
                .handle_of(id)
                .ok_or_else(|| TilingError::not_found(format!("window {id:?}")))?,
        ),
        None => None,
    };

    let previous = manager.border_window();
    if previous == handle {
        return Ok(Outcome::NoOp);
    }
    manager.set_border_window(handle);

    let borders = &manager.config().focus_borders;
    let (active, inactive) = (borders.active.is_enabled(), borders.inactive.is_enabled());

    if active {
        manager.push_effect(SideEffect::SetFocusBorder { handle });
    }
    if inactive
        && let Some(previous) = previous
        && manager.containers().window_by_handle(previous).is_some()
    {
        manager.push_effect(SideEffect::SetInactiveBorder { handle: previous });
    }
    Ok(Outcome::Applied)
}

/// Handles `SetFocusedDescendant`.
///
/// Shows the target's workspace first when it is hidden.
pub fn on_set_focused_descendant(
    manager: &mut TilingManager,
    container: ContainerId,
) -> TilingResult<Outcome> {
    let tree = manager.containers().tree();
    let node = tree.container(container)?;
    let focusable = node.is_window() || (node.is_workspace() && node.children().is_empty());
    if !focusable {
        return Err(TilingError::topology(format!("a {} cannot hold focus", node.kind.name())));
    }
    let workspace = tree
        .workspace_of(container)
        .ok_or_else(|| TilingError::not_found(format!("workspace of {container:?}")))?;

    let switched = display_workspace(manager, workspace)?;
    let focused = apply_focus(manager, container)?;
    if switched {
        manager.invoke(Command::RedrawContainers)?;
    }
    Ok(Outcome::from_changed(switched || focused.changed()))
}

/// Handles `FocusInDirection`.
///
/// Walks up from the focused window to the nearest ancestor laid out along
/// the movement axis that has a neighbour in that direction, then focuses
/// the closest window inside that neighbour.
pub fn on_focus_in_direction(
    manager: &mut TilingManager,
    direction: Direction,
) -> TilingResult<Outcome> {
    let Some(window) = manager.containers().focused_window() else {
        return Ok(Outcome::NoOp);
    };
    let axis = direction.tiling_direction();
    let backward = direction.is_backward();
    let tree = manager.containers().tree();
    let workspace = tree
        .workspace_of(window)
        .ok_or_else(|| TilingError::not_found("focused workspace"))?;

    let mut path_child = window;
    let mut neighbour = None;
    for ancestor in tree.traverse_up(window) {
        if tree.direction_of(ancestor) == Some(axis) {
            let siblings = tree.children_of(ancestor);
            let index = siblings.iter().position(|&child| child == path_child);
            let next = index.and_then(|i| if backward { i.checked_sub(1) } else { Some(i + 1) });
            if let Some(&found) = next.and_then(|i| siblings.get(i)) {
                neighbour = Some(found);
                break;
            }
        }
        if ancestor == workspace {
            break;
        }
        path_child = ancestor;
    }

    let Some(target) = neighbour.and_then(|found| tree.descend_to_window(found, backward)) else {
        return Ok(Outcome::NoOp);
    };

    manager.invoke(Command::SetFocusedDescendant { container: target })?;
    manager.invoke(Command::SyncNativeFocus)?;
    Ok(Outcome::Applied)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::{BorderStateConfig, FocusBordersConfig, TilingConfig};
    use crate::tiling::handlers::test_support::{add, manager, manager_with};
    use crate::tiling::state::WindowHandle;

    #[test]
    fn test_sync_native_focus_once() {
        let (mut manager, sink) = manager();
        add(&mut manager, 1);
        sink.take();

        assert_eq!(manager.invoke(Command::SyncNativeFocus).unwrap(), Outcome::Applied);
        assert_eq!(
            sink.take(),
            vec![SideEffect::SetForegroundWindow { handle: WindowHandle(1) }]
        );
        assert_eq!(manager.invoke(Command::SyncNativeFocus).unwrap(), Outcome::NoOp);
    }

    #[test]
    fn test_border_follows_active_and_inactive_flags() {
        let config = TilingConfig {
            focus_borders: FocusBordersConfig {
                active: BorderStateConfig { enabled: true, color: "#ffffff".into() },
                inactive: BorderStateConfig { enabled: true, color: "#000000".into() },
            },
            ..TilingConfig::default()
        };
        let (mut manager, sink) = manager_with(config);
        let a = add(&mut manager, 1);
        let b = add(&mut manager, 2);
        sink.take();

        manager.invoke(Command::SetActiveWindowBorder { window: Some(a) }).unwrap();
        manager.invoke(Command::SetActiveWindowBorder { window: Some(b) }).unwrap();
        manager.invoke(Command::SetActiveWindowBorder { window: None }).unwrap();

        assert_eq!(
            sink.take(),
            vec![
                SideEffect::SetFocusBorder { handle: Some(WindowHandle(1)) },
                SideEffect::SetFocusBorder { handle: Some(WindowHandle(2)) },
                SideEffect::SetInactiveBorder { handle: WindowHandle(1) },
                SideEffect::SetFocusBorder { handle: None },
                SideEffect::SetInactiveBorder { handle: WindowHandle(2) },
            ]
        );
    }

    #[test]
    fn test_border_disabled_emits_nothing() {
        let mut config = TilingConfig::default();
        config.focus_borders.active.enabled = false;
        let (mut manager, sink) = manager_with(config);
        let a = add(&mut manager, 1);
        sink.take();

        manager.invoke(Command::SetActiveWindowBorder { window: Some(a) }).unwrap();
        assert!(sink.is_empty());
        assert_eq!(manager.border_window(), Some(WindowHandle(1)));
    }

    #[test]
    fn test_focus_descendant_rejects_split() {
        let (mut manager, _) = manager();
        add(&mut manager, 1);
        add(&mut manager, 2);
        manager.invoke(Command::ToggleTilingDirection).unwrap();
        let c = add(&mut manager, 3);
        let split = manager.containers().tree().parent_of(c).unwrap();

        let err = manager.invoke(Command::SetFocusedDescendant { container: split }).unwrap_err();
        assert!(matches!(err, TilingError::InvalidTopology(_)));
    }

    #[test]
    fn test_focus_in_direction_crosses_splits() {
        let (mut manager, _) = manager();
        let a = add(&mut manager, 1);
        add(&mut manager, 2);
        manager.invoke(Command::ToggleTilingDirection).unwrap();
        let c = add(&mut manager, 3);
        // workspace[h](0x1 split[v](0x2 0x3)), focus on 0x3

        manager.invoke(Command::FocusInDirection { direction: Direction::Left }).unwrap();
        assert_eq!(manager.containers().focused_container(), Some(a));

        manager.invoke(Command::FocusInDirection { direction: Direction::Right }).unwrap();
        let focused = manager.containers().focused_container().unwrap();
        assert_ne!(focused, c);
        assert_eq!(manager.containers().handle_of(focused), Some(WindowHandle(2)));

        let outcome =
            manager.invoke(Command::FocusInDirection { direction: Direction::Up }).unwrap();
        assert_eq!(outcome, Outcome::NoOp);
    }
}
