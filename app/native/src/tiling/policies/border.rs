//! Focus border policy.

use crate::tiling::bus::EventSubscriber;
use crate::tiling::commands::Command;
use crate::tiling::error::TilingResult;
use crate::tiling::events::{Event, EventKind};
use crate::tiling::manager::TilingManager;

/// Moves the active border to the newly focused window.
#[derive(Debug, Default)]
pub struct BorderPolicy;

impl EventSubscriber for BorderPolicy {
    fn name(&self) -> &'static str { "border" }

    fn interests(&self) -> &'static [EventKind] { &[EventKind::FocusChanged] }

    fn on_event(&mut self, event: &Event, manager: &mut TilingManager) -> TilingResult<()> {
        let Event::FocusChanged { current, .. } = event else {
            return Ok(());
        };
        let window = Some(*current).filter(|&id| manager.containers().tree().is_window(id));
        manager.dispatch(Command::SetActiveWindowBorder { window })?;
        Ok(())
    }
}
