//! Automatic tiling direction policy.
//!
//! After focus moves to a window (or a window changes size), the split
//! direction for the next insertion beside it is recomputed from the
//! configured mode:
//!
//! | Mode               | Direction                                          |
//! |--------------------|----------------------------------------------------|
//! | `unchanged`        | left alone                                         |
//! | `horizontal`       | horizontal                                         |
//! | `vertical`         | vertical                                           |
//! | `alternate`        | inverse of the parent's direction                  |
//! | `largestDimension` | horizontal when wider than tall, vertical otherwise |
//!
//! `alternate` skips a window that is the only child of a parent whose
//! direction already differs from the grandparent's, so repeated focus events
//! converge instead of flipping back and forth.

use crate::config::AutomaticTilingDirection;
use crate::tiling::bus::EventSubscriber;
use crate::tiling::commands::Command;
use crate::tiling::error::TilingResult;
use crate::tiling::events::{Event, EventKind};
use crate::tiling::manager::TilingManager;
use crate::tiling::state::{ContainerId, ContainerTree, TilingDirection};

/// Recomputes the split direction of the focused window.
#[derive(Debug, Default)]
pub struct AutoTilingPolicy;

impl EventSubscriber for AutoTilingPolicy {
    fn name(&self) -> &'static str { "auto-tiling" }

    fn interests(&self) -> &'static [EventKind] {
        &[EventKind::FocusChanged, EventKind::WindowMovedOrResized]
    }

    fn on_event(&mut self, event: &Event, manager: &mut TilingManager) -> TilingResult<()> {
        let mode = manager.config().automatic_tiling_direction;
        if mode == AutomaticTilingDirection::Unchanged {
            return Ok(());
        }

        let service = manager.containers();
        let window = match event {
            Event::FocusChanged { current, .. } => Some(*current),
            Event::WindowMovedOrResized { handle, .. } => service
                .window_by_handle(*handle)
                .filter(|&id| service.focused_container() == Some(id)),
            _ => None,
        };
        let Some(window) = window.filter(|&id| service.tree().is_window(id)) else {
            return Ok(());
        };

        let tree = service.tree();
        let Some(target) = automatic_direction(tree, window, mode) else {
            return Ok(());
        };
        if effective_direction(tree, window) == Some(target) {
            return Ok(());
        }

        manager.dispatch(Command::ChangeTilingDirection { container: window, direction: target })?;
        manager.dispatch(Command::RedrawContainers)?;
        Ok(())
    }
}

/// The direction the configured mode asks for at `window`, or `None` when it
/// should be left alone.
#[must_use]
pub fn automatic_direction(
    tree: &ContainerTree,
    window: ContainerId,
    mode: AutomaticTilingDirection,
) -> Option<TilingDirection> {
    match mode {
        AutomaticTilingDirection::Unchanged => None,
        AutomaticTilingDirection::Horizontal => Some(TilingDirection::Horizontal),
        AutomaticTilingDirection::Vertical => Some(TilingDirection::Vertical),
        AutomaticTilingDirection::LargestDimension => {
            let rect = tree.get(window)?.rect;
            if rect.width > rect.height {
                Some(TilingDirection::Horizontal)
            } else {
                Some(TilingDirection::Vertical)
            }
        }
        AutomaticTilingDirection::Alternate => {
            let parent = tree.parent_of(window)?;
            let parent_direction = tree.direction_of(parent)?;

            let only_child = tree.children_of(parent).len() == 1;
            let grandparent_direction = tree.parent_of(parent).and_then(|gp| tree.direction_of(gp));
            if only_child && grandparent_direction != Some(parent_direction) {
                return None;
            }
            Some(parent_direction.inverse())
        }
    }
}

/// The direction a window would split in right now.
fn effective_direction(tree: &ContainerTree, window: ContainerId) -> Option<TilingDirection> {
    tree.get(window)
        .and_then(|node| node.as_window())
        .and_then(|data| data.pending_split)
        .or_else(|| tree.parent_of(window).and_then(|parent| tree.direction_of(parent)))
}
