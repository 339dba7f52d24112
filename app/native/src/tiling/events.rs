//! Event types for the tiling manager.
//!
//! Events are notifications with zero or more subscribers. Inbound events come
//! from the native adapters; core events are emitted by command handlers.

use std::sync::Arc;

use crate::config::TilingConfig;
use crate::tiling::state::{
    ContainerId, MonitorInfo, MouseButtons, Point, Rect, TilingDirection, WindowHandle,
    WindowInfo,
};

/// A notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // ════════════════════════════════════════════════════════════════════════
    // Inbound (native adapters)
    // ════════════════════════════════════════════════════════════════════════
    /// A manageable window appeared.
    WindowOpened {
        handle: WindowHandle,
        rect: Rect,
        info: WindowInfo,
    },

    /// A window was destroyed.
    WindowClosed { handle: WindowHandle },

    /// A window was moved or resized by someone else.
    WindowMovedOrResized { handle: WindowHandle, rect: Rect },

    /// The display configuration changed.
    DisplaySettingsChanged { monitors: Vec<MonitorInfo> },

    /// The OS foreground window changed.
    ForegroundWindowChanged { handle: WindowHandle },

    /// The mouse cursor moved.
    MouseMoved { point: Point, buttons: MouseButtons },

    /// The configuration file was reparsed.
    ConfigReloaded { config: Arc<TilingConfig> },

    // ════════════════════════════════════════════════════════════════════════
    // Core
    // ════════════════════════════════════════════════════════════════════════
    /// The focused container changed.
    FocusChanged {
        previous: Option<ContainerId>,
        current: ContainerId,
    },

    /// The focused window was pushed to the native foreground.
    NativeFocusSynced { container: ContainerId, handle: WindowHandle },

    /// A container's layout direction changed.
    TilingDirectionChanged {
        container: ContainerId,
        direction: TilingDirection,
    },

    /// A workspace became the displayed workspace of its monitor.
    WorkspaceActivated { workspace: ContainerId, name: String },

    /// A workspace stopped being displayed.
    WorkspaceDeactivated { name: String },

    /// A window became managed.
    WindowManaged { container: ContainerId, handle: WindowHandle },

    /// A window stopped being managed.
    WindowUnmanaged { handle: WindowHandle },
}

/// Discriminant of [`Event`], used for subscriber interests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    WindowOpened,
    WindowClosed,
    WindowMovedOrResized,
    DisplaySettingsChanged,
    ForegroundWindowChanged,
    MouseMoved,
    ConfigReloaded,
    FocusChanged,
    NativeFocusSynced,
    TilingDirectionChanged,
    WorkspaceActivated,
    WorkspaceDeactivated,
    WindowManaged,
    WindowUnmanaged,
}

impl Event {
    /// Returns the event's kind.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::WindowOpened { .. } => EventKind::WindowOpened,
            Self::WindowClosed { .. } => EventKind::WindowClosed,
            Self::WindowMovedOrResized { .. } => EventKind::WindowMovedOrResized,
            Self::DisplaySettingsChanged { .. } => EventKind::DisplaySettingsChanged,
            Self::ForegroundWindowChanged { .. } => EventKind::ForegroundWindowChanged,
            Self::MouseMoved { .. } => EventKind::MouseMoved,
            Self::ConfigReloaded { .. } => EventKind::ConfigReloaded,
            Self::FocusChanged { .. } => EventKind::FocusChanged,
            Self::NativeFocusSynced { .. } => EventKind::NativeFocusSynced,
            Self::TilingDirectionChanged { .. } => EventKind::TilingDirectionChanged,
            Self::WorkspaceActivated { .. } => EventKind::WorkspaceActivated,
            Self::WorkspaceDeactivated { .. } => EventKind::WorkspaceDeactivated,
            Self::WindowManaged { .. } => EventKind::WindowManaged,
            Self::WindowUnmanaged { .. } => EventKind::WindowUnmanaged,
        }
    }

    /// Returns the event name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str { self.kind().name() }
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: &'static [Self] = &[
        Self::WindowOpened,
        Self::WindowClosed,
        Self::WindowMovedOrResized,
        Self::DisplaySettingsChanged,
        Self::ForegroundWindowChanged,
        Self::MouseMoved,
        Self::ConfigReloaded,
        Self::FocusChanged,
        Self::NativeFocusSynced,
        Self::TilingDirectionChanged,
        Self::WorkspaceActivated,
        Self::WorkspaceDeactivated,
        Self::WindowManaged,
        Self::WindowUnmanaged,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::WindowOpened => "WindowOpened",
            Self::WindowClosed => "WindowClosed",
            Self::WindowMovedOrResized => "WindowMovedOrResized",
            Self::DisplaySettingsChanged => "DisplaySettingsChanged",
            Self::ForegroundWindowChanged => "ForegroundWindowChanged",
            Self::MouseMoved => "MouseMoved",
            Self::ConfigReloaded => "ConfigReloaded",
            Self::FocusChanged => "FocusChanged",
            Self::NativeFocusSynced => "NativeFocusSynced",
            Self::TilingDirectionChanged => "TilingDirectionChanged",
            Self::WorkspaceActivated => "WorkspaceActivated",
            Self::WorkspaceDeactivated => "WorkspaceDeactivated",
            Self::WindowManaged => "WindowManaged",
            Self::WindowUnmanaged => "WindowUnmanaged",
        }
    }

    /// Returns `true` for events produced by the native adapters.
    #[must_use]
    pub const fn is_inbound(self) -> bool {
        matches!(
            self,
            Self::WindowOpened
                | Self::WindowClosed
                | Self::WindowMovedOrResized
                | Self::DisplaySettingsChanged
                | Self::ForegroundWindowChanged
                | Self::MouseMoved
                | Self::ConfigReloaded
        )
    }
}
