//! Side-effect requests and the sinks that carry them out.
//!
//! Handlers never touch native windows. They queue [`SideEffect`]s on the
//! manager, which hands each finished batch to an [`EffectSink`]. The sink is
//! the boundary to the platform adapter; requests are fire-and-forget and the
//! core never waits for them.
//!
//! # Sinks
//!
//! - [`ChannelSink`]: forwards effects over a tokio channel to an adapter task
//! - [`RecordingSink`]: keeps effects in memory (tests, scenario replay)

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::tiling::state::{Point, Rect, WindowHandle};

// ============================================================================
// Effect Types
// ============================================================================

/// A request for the native adapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SideEffect {
    /// Move/resize a window to a target frame.
    PositionWindow {
        handle: WindowHandle,
        rect: Rect,
        /// Whether to animate the transition.
        animate: bool,
    },

    /// Make a window visible.
    ShowWindow { handle: WindowHandle },

    /// Hide a window (workspace switched away).
    HideWindow { handle: WindowHandle },

    /// Draw the focus border around a window, or clear it.
    SetFocusBorder { handle: Option<WindowHandle> },

    /// Draw the inactive border around a window that lost focus.
    SetInactiveBorder { handle: WindowHandle },

    /// Bring a window to the foreground.
    SetForegroundWindow { handle: WindowHandle },

    /// Warp the mouse cursor.
    SetCursorPosition { point: Point },

    /// Show a tray balloon.
    ShowTrayNotification { text: String },
}

impl SideEffect {
    /// Returns the effect name as a static kebab-case string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PositionWindow { .. } => "position-window",
            Self::ShowWindow { .. } => "show-window",
            Self::HideWindow { .. } => "hide-window",
            Self::SetFocusBorder { .. } => "set-focus-border",
            Self::SetInactiveBorder { .. } => "set-inactive-border",
            Self::SetForegroundWindow { .. } => "set-foreground-window",
            Self::SetCursorPosition { .. } => "set-cursor-position",
            Self::ShowTrayNotification { .. } => "show-tray-notification",
        }
    }

    /// The window this effect targets, if any.
    #[must_use]
    pub const fn handle(&self) -> Option<WindowHandle> {
        match self {
            Self::PositionWindow { handle, .. }
            | Self::ShowWindow { handle }
            | Self::HideWindow { handle }
            | Self::SetInactiveBorder { handle }
            | Self::SetForegroundWindow { handle } => Some(*handle),
            Self::SetFocusBorder { handle } => *handle,
            Self::SetCursorPosition { .. } | Self::ShowTrayNotification { .. } => None,
        }
    }
}

// ============================================================================
// Effect Sinks
// ============================================================================

/// Destination for batches of side effects.
pub trait EffectSink: Send {
    /// Executes (or forwards) a batch in order.
    fn execute_batch(&mut self, effects: Vec<SideEffect>);
}

/// Forwards effects to an adapter task over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SideEffect>,
}

impl ChannelSink {
    /// Creates a sink and the receiver the adapter drains.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SideEffect>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EffectSink for ChannelSink {
    fn execute_batch(&mut self, effects: Vec<SideEffect>) {
        for effect in effects {
            if let Err(err) = self.tx.send(effect) {
                tracing::warn!(effect = err.0.name(), "effect receiver dropped");
                return;
            }
        }
    }
}

/// Records effects in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    effects: Arc<Mutex<Vec<SideEffect>>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Removes and returns everything recorded so far.
    #[must_use]
    pub fn take(&self) -> Vec<SideEffect> { std::mem::take(&mut *self.effects.lock()) }

    /// Copies everything recorded so far.
    #[must_use]
    pub fn recorded(&self) -> Vec<SideEffect> { self.effects.lock().clone() }

    #[must_use]
    pub fn len(&self) -> usize { self.effects.lock().len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.effects.lock().is_empty() }
}

impl EffectSink for RecordingSink {
    fn execute_batch(&mut self, effects: Vec<SideEffect>) {
        self.effects.lock().extend(effects);
    }
}
