//! Scenario files for `trellis simulate`.
//!
//! A scenario describes the displays, the windows that exist at startup and a
//! list of steps to replay:
//!
//! ```jsonc
//! {
//!   "monitors": [{ "id": "primary", "rect": { "x": 0, "y": 0, "width": 1920, "height": 1080 } }],
//!   "windows": [{ "handle": 1, "rect": { "x": 0, "y": 0, "width": 800, "height": 600 } }],
//!   "steps": [
//!     { "type": "window-opened", "handle": 2 },
//!     { "type": "move-focused-window", "direction": "left" },
//!     { "type": "focus-workspace", "name": "2" }
//!   ]
//! }
//! ```
//!
//! Steps refer to windows by native handle only; container ids never leave
//! the process.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::config::TilingConfig;
use crate::error::TrellisError;
use crate::tiling::{
    Command, Direction, Event, MonitorInfo, MouseButtons, Point, Rect, WindowHandle, WindowInfo,
    WindowSeed,
};

/// Frame used for windows opened without an explicit rect.
const DEFAULT_WINDOW_RECT: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

const fn default_rect() -> Rect { DEFAULT_WINDOW_RECT }

/// A replayable session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scenario {
    /// Overrides the loaded configuration when present.
    pub config: Option<TilingConfig>,
    pub monitors: Vec<MonitorInfo>,
    pub windows: Vec<WindowSeed>,
    pub steps: Vec<Step>,
}

/// One replayed input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Step {
    // ════════════════════════════════════════════════════════════════════════
    // Native events
    // ════════════════════════════════════════════════════════════════════════
    WindowOpened {
        handle: WindowHandle,
        #[serde(default = "default_rect")]
        rect: Rect,
        #[serde(default)]
        info: WindowInfo,
    },
    WindowClosed {
        handle: WindowHandle,
    },
    WindowMoved {
        handle: WindowHandle,
        rect: Rect,
    },
    DisplaysChanged {
        monitors: Vec<MonitorInfo>,
    },
    ForegroundChanged {
        handle: WindowHandle,
    },
    MouseMoved {
        point: Point,
        #[serde(default)]
        buttons: MouseButtons,
    },

    // ════════════════════════════════════════════════════════════════════════
    // User commands
    // ════════════════════════════════════════════════════════════════════════
    MoveFocusedWindow {
        direction: Direction,
    },
    FocusInDirection {
        direction: Direction,
    },
    ToggleTilingDirection,
    ResizeFocusedWindow {
        amount: f64,
    },
    FocusWorkspace {
        name: String,
    },
    MoveWindowToWorkspace {
        name: String,
    },
    RedrawContainers,
    ShowAllWindows,
}

/// What a step turns into on the actor side.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Event(Event),
    Command(Command),
}

impl Step {
    /// Converts the step into an inbound event or a command.
    #[must_use]
    pub fn into_action(self) -> Action {
        match self {
            Self::WindowOpened { handle, rect, info } => {
                Action::Event(Event::WindowOpened { handle, rect, info })
            }
            Self::WindowClosed { handle } => Action::Event(Event::WindowClosed { handle }),
            Self::WindowMoved { handle, rect } => {
                Action::Event(Event::WindowMovedOrResized { handle, rect })
            }
            Self::DisplaysChanged { monitors } => {
                Action::Event(Event::DisplaySettingsChanged { monitors })
            }
            Self::ForegroundChanged { handle } => {
                Action::Event(Event::ForegroundWindowChanged { handle })
            }
            Self::MouseMoved { point, buttons } => {
                Action::Event(Event::MouseMoved { point, buttons })
            }
            Self::MoveFocusedWindow { direction } => {
                Action::Command(Command::MoveFocusedWindow { direction })
            }
            Self::FocusInDirection { direction } => {
                Action::Command(Command::FocusInDirection { direction })
            }
            Self::ToggleTilingDirection => Action::Command(Command::ToggleTilingDirection),
            Self::ResizeFocusedWindow { amount } => {
                Action::Command(Command::ResizeFocusedWindow { amount })
            }
            Self::FocusWorkspace { name } => Action::Command(Command::FocusWorkspace { name }),
            Self::MoveWindowToWorkspace { name } => {
                Action::Command(Command::MoveWindowToWorkspace { name })
            }
            Self::RedrawContainers => Action::Command(Command::RedrawContainers),
            Self::ShowAllWindows => Action::Command(Command::ShowAllWindows),
        }
    }
}

impl Scenario {
    /// Parses a JSONC scenario.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::ScenarioError`] if the text is not a valid
    /// scenario or lists no monitors.
    pub fn parse(reader: impl Read) -> Result<Self, TrellisError> {
        let reader = json_comments::StripComments::new(reader);
        let mut scenario: Self = serde_json::from_reader(reader)?;
        if scenario.monitors.is_empty() {
            return Err(TrellisError::ScenarioError("scenario lists no monitors".to_string()));
        }
        if let Some(config) = scenario.config.as_mut() {
            config.prepare();
        }
        Ok(scenario)
    }
}
