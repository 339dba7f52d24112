//! Resize handler.

use tracing::debug;

use crate::tiling::commands::{Command, Outcome};
use crate::tiling::error::{TilingError, TilingResult};
use crate::tiling::manager::{TilingManager, resize_share, shares_from_weights};
use crate::tiling::state::ContainerId;

/// Handles `ResizeFocusedWindow`.
///
/// `amount` is a fraction of the parent's axis. The focused window's share
/// is clamped so every sibling keeps at least the minimum share, and the
/// siblings absorb the difference in proportion to their current shares.
pub fn on_resize_focused_window(manager: &mut TilingManager, amount: f64) -> TilingResult<Outcome> {
    if !amount.is_finite() || amount.abs() < f64::EPSILON {
        return Ok(Outcome::NoOp);
    }
    let Some(window) = manager.containers().focused_window() else {
        return Ok(Outcome::NoOp);
    };

    let tree = manager.containers().tree();
    let parent = tree.parent_of(window).ok_or_else(|| TilingError::not_found("focused parent"))?;
    let siblings: Vec<ContainerId> = tree.children_of(parent).to_vec();
    if siblings.len() < 2 {
        return Ok(Outcome::NoOp);
    }
    let index = tree
        .index_in_parent(window)
        .ok_or_else(|| TilingError::topology("dangling parent link"))?;

    let weights: Vec<f64> =
        siblings.iter().map(|&id| tree.get(id).map_or(1.0, |node| node.weight)).collect();
    let current = shares_from_weights(&weights);
    let resized = resize_share(&current, index, amount);
    if current.iter().zip(&resized).all(|(a, b)| (a - b).abs() < f64::EPSILON) {
        return Ok(Outcome::NoOp);
    }

    let tree = manager.containers_mut().tree_mut();
    for (&id, &share) in siblings.iter().zip(&resized) {
        tree.container_mut(id)?.weight = share;
    }
    manager.containers_mut().mark_dirty(parent);
    debug!(?window, share = resized[index], "resized focused window");

    manager.invoke(Command::RedrawContainers)?;
    Ok(Outcome::Applied)
}
