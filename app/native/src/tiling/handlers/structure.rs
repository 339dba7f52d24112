//! Structural handlers: attach, swap and directional moves.

use tracing::debug;

use super::{is_displayed, refocus_filled_workspace};
use crate::tiling::commands::{Command, Outcome};
use crate::tiling::effects::SideEffect;
use crate::tiling::error::{TilingError, TilingResult};
use crate::tiling::events::Event;
use crate::tiling::manager::TilingManager;
use crate::tiling::state::{ContainerId, Direction, InsertPosition};

/// Handles `AttachContainer`.
///
/// An already attached child is detached first (collapsing splits it leaves
/// behind). Marks the old and new parents dirty; callers redraw.
pub fn on_attach_container(
    manager: &mut TilingManager,
    parent: ContainerId,
    child: ContainerId,
    position: InsertPosition,
) -> TilingResult<Outcome> {
    let tree = manager.containers().tree();
    let parent_node = tree.container(parent)?;
    let child_node = tree.container(child)?;

    if !parent_node.kind.accepts(&child_node.kind) {
        return Err(TilingError::topology(format!(
            "a {} cannot hold a {}",
            parent_node.kind.name(),
            child_node.kind.name()
        )));
    }
    if parent == child || tree.is_ancestor(child, parent) {
        return Err(TilingError::topology(format!(
            "attaching {child:?} under {parent:?} would form a cycle"
        )));
    }

    if child_node.parent().is_some() {
        let detached = manager.containers_mut().detach(child)?;
        if detached.collapsed.contains(&parent) {
            return Err(TilingError::topology(format!(
                "{parent:?} collapsed when {child:?} left it"
            )));
        }
        manager.containers_mut().mark_dirty(detached.parent);
    }

    let index = manager.containers_mut().attach(parent, child, position)?;
    manager.containers_mut().mark_dirty(parent);
    refocus_filled_workspace(manager)?;
    debug!(?parent, ?child, index, "attached container");
    Ok(Outcome::Applied)
}

/// Handles `SwapContainers`.
///
/// Windows that move between a displayed and a hidden workspace are shown or
/// hidden accordingly.
pub fn on_swap_containers(
    manager: &mut TilingManager,
    a: ContainerId,
    b: ContainerId,
) -> TilingResult<Outcome> {
    let tree = manager.containers().tree();
    let visible_before = |id| tree.workspace_of(id).is_some_and(|ws| is_displayed(tree, ws));
    let (a_visible, b_visible) = (visible_before(a), visible_before(b));

    manager.containers_mut().swap(a, b)?;

    let tree = manager.containers().tree();
    let parents: Vec<ContainerId> = [a, b].iter().filter_map(|&id| tree.parent_of(id)).collect();
    let mut effects = Vec::new();
    if a_visible != b_visible {
        for (node, now_visible) in [(a, b_visible), (b, a_visible)] {
            for window in tree.windows_under(node) {
                let Some(handle) = manager.containers().handle_of(window) else { continue };
                effects.push(if now_visible {
                    SideEffect::ShowWindow { handle }
                } else {
                    SideEffect::HideWindow { handle }
                });
            }
        }
    }

    for parent in parents {
        manager.containers_mut().mark_dirty(parent);
    }
    for effect in effects {
        manager.push_effect(effect);
    }
    refocus_filled_workspace(manager)?;
    Ok(Outcome::Applied)
}

/// Handles `MoveFocusedWindow`.
///
/// Looks for the nearest ancestor (up to the workspace) laid out along the
/// movement axis:
/// - none: the workspace switches to that axis
/// - the direct parent: the window swaps with its neighbour, or stays put at
///   the boundary
/// - a higher ancestor: the window moves to that ancestor's start or end
pub fn on_move_focused_window(
    manager: &mut TilingManager,
    direction: Direction,
) -> TilingResult<Outcome> {
    let Some(window) = manager.containers().focused_window() else {
        return Ok(Outcome::NoOp);
    };
    let axis = direction.tiling_direction();
    let tree = manager.containers().tree();
    let workspace =
        tree.workspace_of(window).ok_or_else(|| TilingError::not_found("focused workspace"))?;
    let parent = tree.parent_of(window).ok_or_else(|| TilingError::not_found("focused parent"))?;

    let mut matching = None;
    for ancestor in tree.traverse_up(window) {
        if tree.direction_of(ancestor) == Some(axis) {
            matching = Some(ancestor);
            break;
        }
        if ancestor == workspace {
            break;
        }
    }

    match matching {
        None => {
            manager.containers_mut().tree_mut().container_mut(workspace)?.set_direction(axis);
            manager.containers_mut().mark_dirty(workspace);
            manager.emit(Event::TilingDirectionChanged { container: workspace, direction: axis });
            debug!(?workspace, %axis, "workspace direction switched by move");
        }
        Some(ancestor) if ancestor == parent => {
            let siblings = tree.children_of(parent);
            let index = tree
                .index_in_parent(window)
                .ok_or_else(|| TilingError::topology("dangling parent link"))?;
            let neighbour = if direction.is_backward() {
                index.checked_sub(1).and_then(|i| siblings.get(i))
            } else {
                siblings.get(index + 1)
            };
            let Some(&neighbour) = neighbour else {
                return Ok(Outcome::NoOp);
            };
            manager.invoke(Command::SwapContainers { a: window, b: neighbour })?;
        }
        Some(ancestor) => {
            let position =
                if direction.is_backward() { InsertPosition::Start } else { InsertPosition::End };
            manager.invoke(Command::AttachContainer { parent: ancestor, child: window, position })?;
        }
    }

    manager.invoke(Command::RedrawContainers)?;
    Ok(Outcome::Applied)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tiling::handlers::test_support::{add, manager, monitor, shape};
    use crate::tiling::state::TilingDirection;

    #[test]
    fn test_move_swaps_with_neighbour() {
        let (mut manager, _) = manager();
        add(&mut manager, 1);
        add(&mut manager, 2);

        manager.invoke(Command::MoveFocusedWindow { direction: Direction::Left }).unwrap();
        assert_eq!(shape(&manager), "workspace:1[h](0x2 0x1)");
    }

    #[test]
    fn test_move_at_boundary_is_noop() {
        let (mut manager, sink) = manager();
        add(&mut manager, 1);
        add(&mut manager, 2);
        sink.take();
        let before = manager.snapshot();

        let outcome =
            manager.invoke(Command::MoveFocusedWindow { direction: Direction::Right }).unwrap();

        assert_eq!(outcome, Outcome::NoOp);
        assert_eq!(manager.snapshot(), before);
        assert!(manager.containers().dirty().is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_move_without_matching_ancestor_switches_workspace() {
        let (mut manager, _) = manager();
        add(&mut manager, 1);
        add(&mut manager, 2);

        manager.invoke(Command::MoveFocusedWindow { direction: Direction::Down }).unwrap();
        assert_eq!(shape(&manager), "workspace:1[v](0x1 0x2)");
    }

    #[test]
    fn test_move_out_of_split_to_ancestor_end() {
        let (mut manager, _) = manager();
        let a = add(&mut manager, 1);
        manager
            .invoke(Command::ChangeTilingDirection {
                container: a,
                direction: TilingDirection::Vertical,
            })
            .unwrap();
        add(&mut manager, 2);
        // 0x1 is an only child, so the workspace itself turned vertical.
        assert_eq!(shape(&manager), "workspace:1[v](0x1 0x2)");

        let c = add(&mut manager, 3);
        manager
            .invoke(Command::ChangeTilingDirection {
                container: c,
                direction: TilingDirection::Horizontal,
            })
            .unwrap();
        add(&mut manager, 4);
        assert_eq!(shape(&manager), "workspace:1[v](0x1 0x2 split[h](0x3 0x4))");

        manager.invoke(Command::MoveFocusedWindow { direction: Direction::Up }).unwrap();
        assert_eq!(shape(&manager), "workspace:1[v](0x4 0x1 0x2 0x3)");
        assert!(manager.containers().tree().check_invariants().is_ok());
    }

    #[test]
    fn test_attach_rejects_cycles() {
        let (mut manager, _) = manager();
        let tree = manager.containers().tree();
        let workspace = tree.workspaces()[0];
        let monitor = tree.monitors()[0];

        let err = manager
            .invoke(Command::AttachContainer {
                parent: workspace,
                child: monitor,
                position: InsertPosition::End,
            })
            .unwrap_err();
        assert!(matches!(err, TilingError::InvalidTopology(_)));
    }

    #[test]
    fn test_swap_marks_parents_dirty() {
        let (mut manager, _) = manager();
        let a = add(&mut manager, 1);
        let b = add(&mut manager, 2);

        manager.invoke(Command::SwapContainers { a, b }).unwrap();
        let workspace = manager.containers().tree().workspace_of(a).unwrap();
        assert!(manager.containers().dirty().contains(workspace));
    }

    #[test]
    fn test_attach_into_focused_empty_workspace_moves_focus() {
        let (mut manager, _) = manager();
        let a = add(&mut manager, 1);
        manager
            .invoke(Command::RefreshMonitors {
                monitors: vec![monitor("primary", 0.0), monitor("side", 1000.0)],
            })
            .unwrap();
        let tree = manager.containers().tree();
        let home = tree.workspace_of(a).unwrap();
        let empty = tree.workspaces().into_iter().find(|&ws| ws != home).unwrap();
        manager.invoke(Command::SetFocusedDescendant { container: empty }).unwrap();
        assert_eq!(manager.containers().focused_container(), Some(empty));

        manager
            .invoke(Command::AttachContainer {
                parent: empty,
                child: a,
                position: InsertPosition::End,
            })
            .unwrap();

        let service = manager.containers();
        assert_eq!(service.tree().workspace_of(a), Some(empty));
        assert_eq!(service.focused_container(), Some(a));
        assert_eq!(service.focused_window(), Some(a));
    }
}
