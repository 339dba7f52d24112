//! Window and display lifecycle policy.
//!
//! Translates inbound platform events into structural commands.

use tracing::debug;

use crate::tiling::bus::EventSubscriber;
use crate::tiling::commands::Command;
use crate::tiling::effects::SideEffect;
use crate::tiling::error::TilingResult;
use crate::tiling::events::{Event, EventKind};
use crate::tiling::handlers::is_displayed;
use crate::tiling::manager::TilingManager;

const INTERESTS: &[EventKind] = &[
    EventKind::WindowOpened,
    EventKind::WindowClosed,
    EventKind::WindowMovedOrResized,
    EventKind::DisplaySettingsChanged,
    EventKind::ForegroundWindowChanged,
    EventKind::ConfigReloaded,
];

/// Keeps the tree in step with the platform's windows and displays.
#[derive(Debug, Default)]
pub struct LifecyclePolicy;

impl EventSubscriber for LifecyclePolicy {
    fn name(&self) -> &'static str { "lifecycle" }

    fn interests(&self) -> &'static [EventKind] { INTERESTS }

    fn on_event(&mut self, event: &Event, manager: &mut TilingManager) -> TilingResult<()> {
        match event {
            Event::WindowOpened { handle, rect, info } => {
                manager.dispatch(Command::AddWindow {
                    handle: *handle,
                    rect: *rect,
                    info: info.clone(),
                })?;
            }
            Event::WindowClosed { handle } => {
                manager.dispatch(Command::RemoveWindow { handle: *handle })?;
            }
            Event::WindowMovedOrResized { handle, rect } => {
                manager.dispatch(Command::UpdateWindowRect { handle: *handle, rect: *rect })?;
            }
            Event::DisplaySettingsChanged { monitors } => {
                manager.dispatch(Command::RefreshMonitors { monitors: monitors.clone() })?;
            }
            Event::ForegroundWindowChanged { handle } => {
                manager.set_native_foreground(Some(*handle));
                match manager.containers().window_by_handle(*handle) {
                    Some(container) => {
                        manager.dispatch(Command::SetFocusedDescendant { container })?;
                    }
                    None => debug!(handle = %handle, "foreground window is not managed"),
                }
            }
            Event::ConfigReloaded { config } => reload(manager, config.clone())?,
            _ => {}
        }
        Ok(())
    }
}

fn reload(
    manager: &mut TilingManager,
    config: std::sync::Arc<crate::config::TilingConfig>,
) -> TilingResult<()> {
    manager.replace_config(config);

    let tree = manager.containers().tree();
    let displayed: Vec<_> =
        tree.workspaces().into_iter().filter(|&ws| is_displayed(tree, ws)).collect();
    for workspace in displayed {
        manager.containers_mut().mark_dirty(workspace);
    }

    manager.dispatch(Command::RedrawContainers)?;
    manager.push_effect(SideEffect::ShowTrayNotification {
        text: "Configuration reloaded".to_string(),
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::{GapsConfig, TilingConfig};
    use crate::tiling::effects::RecordingSink;
    use crate::tiling::handlers::test_support::{add, manager, monitor, shape};
    use crate::tiling::state::{Rect, WindowHandle, WindowInfo};

    fn with_lifecycle() -> (TilingManager, RecordingSink) {
        let (mut manager, sink) = manager();
        manager.subscribe(Box::new(LifecyclePolicy));
        (manager, sink)
    }

    #[test]
    fn test_window_opened_and_closed() {
        let (mut manager, _sink) = with_lifecycle();

        manager.ingest(Event::WindowOpened {
            handle: WindowHandle(1),
            rect: Rect::new(0.0, 0.0, 200.0, 200.0),
            info: WindowInfo::default(),
        });
        manager.ingest(Event::WindowOpened {
            handle: WindowHandle(2),
            rect: Rect::new(0.0, 0.0, 200.0, 200.0),
            info: WindowInfo::default(),
        });
        assert_eq!(manager.containers().window_count(), 2);

        manager.ingest(Event::WindowClosed { handle: WindowHandle(1) });
        assert_eq!(manager.containers().window_count(), 1);
        assert!(manager.containers().window_by_handle(WindowHandle(1)).is_none());
    }

    #[test]
    fn test_closing_unknown_window_is_ignored() {
        let (mut manager, _sink) = with_lifecycle();
        add(&mut manager, 1);
        let before = manager.snapshot();

        manager.ingest(Event::WindowClosed { handle: WindowHandle(99) });

        assert_eq!(manager.snapshot(), before);
    }

    #[test]
    fn test_foreground_change_moves_focus_to_managed_window() {
        let (mut manager, _sink) = with_lifecycle();
        let first = add(&mut manager, 1);
        add(&mut manager, 2);

        manager.ingest(Event::ForegroundWindowChanged { handle: WindowHandle(1) });

        assert_eq!(manager.containers().focused_container(), Some(first));
        assert_eq!(manager.native_foreground(), Some(WindowHandle(1)));
    }

    #[test]
    fn test_foreground_change_to_unmanaged_window_keeps_focus() {
        let (mut manager, _sink) = with_lifecycle();
        let window = add(&mut manager, 1);

        manager.ingest(Event::ForegroundWindowChanged { handle: WindowHandle(500) });

        assert_eq!(manager.containers().focused_container(), Some(window));
        assert_eq!(manager.native_foreground(), Some(WindowHandle(500)));
    }

    #[test]
    fn test_display_change_adds_monitor() {
        let (mut manager, _sink) = with_lifecycle();

        manager.ingest(Event::DisplaySettingsChanged {
            monitors: vec![monitor("primary", 0.0), monitor("side", 1000.0)],
        });

        assert_eq!(manager.containers().tree().monitors().len(), 2);
    }

    #[test]
    fn test_config_reload_relayouts_and_notifies() {
        let (mut manager, sink) = with_lifecycle();
        add(&mut manager, 1);
        sink.take();

        let config = TilingConfig {
            gaps: GapsConfig { inner: 0, outer: 10 },
            ..TilingConfig::default()
        };
        manager.ingest(Event::ConfigReloaded { config: Arc::new(config) });

        let effects = sink.take();
        assert!(effects.iter().any(|effect| matches!(
            effect,
            SideEffect::PositionWindow { handle, rect, .. }
                if *handle == WindowHandle(1) && *rect == Rect::new(10.0, 10.0, 980.0, 780.0)
        )));
        assert!(effects.contains(&SideEffect::ShowTrayNotification {
            text: "Configuration reloaded".to_string(),
        }));
        assert_eq!(shape(&manager), "workspace:1[h](0x1)");
    }
}
