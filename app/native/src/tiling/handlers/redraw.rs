//! Redraw handler.
//!
//! Lays out every dirty container and asks the placement adapter to move
//! each window underneath it exactly once.

use tracing::debug;

use crate::tiling::commands::Outcome;
use crate::tiling::effects::SideEffect;
use crate::tiling::error::TilingResult;
use crate::tiling::layout::{Gaps, distribute};
use crate::tiling::manager::TilingManager;
use crate::tiling::state::{ContainerId, ContainerKind, ContainerTree, Rect};

/// Handles `RedrawContainers`.
///
/// Dirty containers nested inside another dirty container are covered by the
/// outer one. Workspaces take their monitor's frame minus the outer gap;
/// splits keep the frame they were last given.
pub fn on_redraw_containers(manager: &mut TilingManager) -> TilingResult<Outcome> {
    let dirty = manager.containers_mut().drain_dirty();
    if dirty.is_empty() {
        return Ok(Outcome::NoOp);
    }

    let tree = manager.containers().tree();
    let gaps = *manager.gaps();
    let animate = manager.config().animate();

    let mut frames = Vec::new();
    for &id in &dirty {
        let covered = dirty.iter().any(|&other| other != id && tree.is_ancestor(other, id));
        if covered || !tree.contains(id) {
            continue;
        }
        if let Some(frame) = container_frame(tree, id, &gaps) {
            layout_subtree(tree, id, frame, &gaps, &mut frames);
        }
    }

    let mut placements = Vec::new();
    for &(id, rect) in &frames {
        if let Some(handle) = manager.containers().handle_of(id) {
            placements.push(SideEffect::PositionWindow { handle, rect, animate });
        }
    }

    let tree = manager.containers_mut().tree_mut();
    for (id, rect) in frames {
        if let Some(node) = tree.get_mut(id) {
            node.rect = rect;
        }
    }

    debug!(containers = dirty.len(), windows = placements.len(), "redrew containers");
    for placement in placements {
        manager.push_effect(placement);
    }
    Ok(Outcome::Applied)
}

fn container_frame(tree: &ContainerTree, id: ContainerId, gaps: &Gaps) -> Option<Rect> {
    let node = tree.get(id)?;
    match node.kind {
        ContainerKind::Workspace(_) => {
            let monitor = tree.monitor_of(id).and_then(|monitor| tree.get(monitor))?;
            Some(gaps.apply_outer(&monitor.rect))
        }
        ContainerKind::Split(_) | ContainerKind::Window(_) => Some(node.rect),
        ContainerKind::Monitor(_) | ContainerKind::Root => None,
    }
}

/// Assigns `frame` to `id` and recursively divides it among the children.
fn layout_subtree(
    tree: &ContainerTree,
    id: ContainerId,
    frame: Rect,
    gaps: &Gaps,
    out: &mut Vec<(ContainerId, Rect)>,
) {
    out.push((id, frame));

    let children = tree.children_of(id);
    let Some(direction) = tree.direction_of(id) else { return };
    if children.is_empty() {
        return;
    }

    let weights: Vec<f64> =
        children.iter().map(|&child| tree.get(child).map_or(1.0, |node| node.weight)).collect();
    let rects = distribute(&frame, direction, &weights, gaps);
    for (&child, rect) in children.iter().zip(rects) {
        layout_subtree(tree, child, rect, gaps, out);
    }
}
