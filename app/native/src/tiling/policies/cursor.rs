//! Cursor-driven focus policies.

use std::time::{Duration, Instant};

use tracing::trace;

use super::sampler::MouseSampler;
use crate::tiling::bus::EventSubscriber;
use crate::tiling::commands::Command;
use crate::tiling::effects::SideEffect;
use crate::tiling::error::TilingResult;
use crate::tiling::events::{Event, EventKind};
use crate::tiling::handlers::is_displayed;
use crate::tiling::manager::TilingManager;
use crate::tiling::state::{ContainerId, ContainerTree, Point};

/// The window on a displayed workspace whose rect contains `point`.
#[must_use]
pub fn window_at(tree: &ContainerTree, point: Point) -> Option<ContainerId> {
    tree.workspaces()
        .into_iter()
        .filter(|&ws| is_displayed(tree, ws))
        .flat_map(|ws| tree.windows_under(ws))
        .find(|&window| tree.get(window).is_some_and(|node| node.rect.contains_point(point)))
}

// ============================================================================
// Focus follows cursor
// ============================================================================

/// Focuses the window under the cursor.
///
/// Moves are sampled at the configured interval and ignored while a mouse
/// button is held, so drags do not steal focus.
#[derive(Debug, Default)]
pub struct FocusFollowsCursorPolicy {
    sampler: MouseSampler,
}

impl FocusFollowsCursorPolicy {
    fn handle_move(
        &mut self,
        manager: &mut TilingManager,
        point: Point,
        now: Instant,
    ) -> TilingResult<()> {
        let interval = Duration::from_millis(manager.config().mouse_sample_interval_ms);
        if !self.sampler.should_sample_at(now, interval) {
            return Ok(());
        }

        let service = manager.containers();
        let Some(target) = window_at(service.tree(), point) else {
            return Ok(());
        };
        if service.focused_container() == Some(target) {
            return Ok(());
        }

        trace!(x = point.x, y = point.y, "focusing window under cursor");
        manager.dispatch(Command::SetFocusedDescendant { container: target })?;
        manager.dispatch(Command::SyncNativeFocus)?;
        Ok(())
    }
}

impl EventSubscriber for FocusFollowsCursorPolicy {
    fn name(&self) -> &'static str { "focus-follows-cursor" }

    fn interests(&self) -> &'static [EventKind] { &[EventKind::MouseMoved] }

    fn on_event(&mut self, event: &Event, manager: &mut TilingManager) -> TilingResult<()> {
        let Event::MouseMoved { point, buttons } = event else {
            return Ok(());
        };
        manager.set_cursor_position(*point);

        if !manager.config().focus_follows_cursor || buttons.any_pressed() {
            return Ok(());
        }
        self.handle_move(manager, *point, Instant::now())
    }
}

// ============================================================================
// Cursor follows focus
// ============================================================================

/// Warps the cursor to the centre of a newly focused window it is not
/// already over.
#[derive(Debug, Default)]
pub struct CursorFollowsFocusPolicy;

impl EventSubscriber for CursorFollowsFocusPolicy {
    fn name(&self) -> &'static str { "cursor-follows-focus" }

    fn interests(&self) -> &'static [EventKind] { &[EventKind::FocusChanged] }

    fn on_event(&mut self, event: &Event, manager: &mut TilingManager) -> TilingResult<()> {
        let Event::FocusChanged { current, .. } = event else {
            return Ok(());
        };
        if !manager.config().cursor_follows_focus {
            return Ok(());
        }

        let tree = manager.containers().tree();
        let Some(rect) = tree.get(*current).filter(|node| node.is_window()).map(|node| node.rect)
        else {
            return Ok(());
        };
        if !rect.is_valid() || manager.cursor_position().is_some_and(|p| rect.contains_point(p)) {
            return Ok(());
        }

        let center = rect.center();
        manager.push_effect(SideEffect::SetCursorPosition { point: center });
        manager.set_cursor_position(center);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TilingConfig;
    use crate::tiling::effects::RecordingSink;
    use crate::tiling::handlers::test_support::{add, manager_with};
    use crate::tiling::state::{MouseButtons, WindowHandle};

    fn moved(x: f64, y: f64) -> Event {
        Event::MouseMoved { point: Point::new(x, y), buttons: MouseButtons::default() }
    }

    mod focus_follows_cursor {
        use super::*;

        fn setup() -> (TilingManager, RecordingSink) {
            let config = TilingConfig {
                focus_follows_cursor: true,
                mouse_sample_interval_ms: 0,
                ..TilingConfig::default()
            };
            let (mut manager, sink) = manager_with(config);
            manager.subscribe(Box::new(FocusFollowsCursorPolicy::default()));
            (manager, sink)
        }

        #[test]
        fn test_focuses_window_under_cursor() {
            let (mut manager, sink) = setup();
            let left = add(&mut manager, 1);
            add(&mut manager, 2);
            sink.take();

            manager.ingest(moved(100.0, 100.0));

            assert_eq!(manager.containers().focused_container(), Some(left));
            assert!(sink.take().contains(&SideEffect::SetForegroundWindow {
                handle: WindowHandle(1)
            }));
        }

        #[test]
        fn test_ignores_moves_with_button_held() {
            let (mut manager, _sink) = setup();
            add(&mut manager, 1);
            let right = add(&mut manager, 2);

            manager.ingest(Event::MouseMoved {
                point: Point::new(100.0, 100.0),
                buttons: MouseButtons { left: true, right: false },
            });

            assert_eq!(manager.containers().focused_container(), Some(right));
            assert_eq!(manager.cursor_position(), Some(Point::new(100.0, 100.0)));
        }

        #[test]
        fn test_disabled_by_config() {
            let (mut manager, _sink) = manager_with(TilingConfig::default());
            manager.subscribe(Box::new(FocusFollowsCursorPolicy::default()));
            add(&mut manager, 1);
            let right = add(&mut manager, 2);

            manager.ingest(moved(100.0, 100.0));

            assert_eq!(manager.containers().focused_container(), Some(right));
        }

        #[test]
        fn test_samples_are_rate_limited() {
            let config = TilingConfig { focus_follows_cursor: true, ..TilingConfig::default() };
            let (mut manager, _sink) = manager_with(config);
            let left = add(&mut manager, 1);
            let right = add(&mut manager, 2);

            let mut policy = FocusFollowsCursorPolicy::default();
            let start = Instant::now();

            policy.handle_move(&mut manager, Point::new(100.0, 100.0), start).unwrap();
            assert_eq!(manager.containers().focused_container(), Some(left));

            policy
                .handle_move(&mut manager, Point::new(900.0, 100.0), start + Duration::from_millis(5))
                .unwrap();
            assert_eq!(manager.containers().focused_container(), Some(left));

            policy
                .handle_move(&mut manager, Point::new(900.0, 100.0), start + Duration::from_millis(60))
                .unwrap();
            assert_eq!(manager.containers().focused_container(), Some(right));
        }

        #[test]
        fn test_window_at_skips_gaps() {
            let (mut manager, _sink) = setup();
            add(&mut manager, 1);

            let tree = manager.containers().tree();
            assert!(window_at(tree, Point::new(500.0, 400.0)).is_some());
            assert!(window_at(tree, Point::new(5000.0, 400.0)).is_none());
        }
    }

    mod cursor_follows_focus {
        use super::*;

        fn setup() -> (TilingManager, RecordingSink) {
            let config = TilingConfig { cursor_follows_focus: true, ..TilingConfig::default() };
            let (mut manager, sink) = manager_with(config);
            manager.subscribe(Box::new(CursorFollowsFocusPolicy));
            (manager, sink)
        }

        #[test]
        fn test_warps_cursor_to_focused_window() {
            let (mut manager, sink) = setup();
            add(&mut manager, 1);
            let effects = sink.take();

            assert!(effects.contains(&SideEffect::SetCursorPosition {
                point: Point::new(500.0, 400.0)
            }));
            assert_eq!(manager.cursor_position(), Some(Point::new(500.0, 400.0)));
        }

        #[test]
        fn test_no_warp_when_cursor_already_inside() {
            let (mut manager, sink) = setup();
            let window = add(&mut manager, 1);
            sink.take();

            manager.emit(Event::FocusChanged { previous: None, current: window });

            assert!(
                !sink
                    .take()
                    .iter()
                    .any(|effect| matches!(effect, SideEffect::SetCursorPosition { .. }))
            );
        }
    }
}
