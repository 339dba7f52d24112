//! Message types for the tiling actor.

use tokio::sync::oneshot;

use crate::tiling::commands::{Command, Outcome};
use crate::tiling::error::TilingResult;
use crate::tiling::events::Event;
use crate::tiling::state::{TreeSnapshot, WindowHandle};

/// Messages processed by the tiling actor, one at a time.
#[derive(Debug)]
pub enum ActorMessage {
    // ════════════════════════════════════════════════════════════════════════
    // Inbound
    // ════════════════════════════════════════════════════════════════════════
    /// An event from a native adapter or the config watcher.
    Event(Event),

    // ════════════════════════════════════════════════════════════════════════
    // Commands
    // ════════════════════════════════════════════════════════════════════════
    /// Run a command and report its result.
    Invoke {
        command: Command,
        respond_to: oneshot::Sender<TilingResult<Outcome>>,
    },

    /// Run a command without reporting back.
    InvokeAsync(Command),

    // ════════════════════════════════════════════════════════════════════════
    // Queries
    // ════════════════════════════════════════════════════════════════════════
    /// Capture the whole tree.
    Snapshot { respond_to: oneshot::Sender<TreeSnapshot> },

    /// List the handles of every managed window.
    ManagedHandles { respond_to: oneshot::Sender<Vec<WindowHandle>> },

    // ════════════════════════════════════════════════════════════════════════
    // Lifecycle
    // ════════════════════════════════════════════════════════════════════════
    /// Restore every window and stop the loop.
    Shutdown { respond_to: Option<oneshot::Sender<()>> },
}

impl ActorMessage {
    /// Short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Event(event) => event.name(),
            Self::Invoke { command, .. } | Self::InvokeAsync(command) => command.name(),
            Self::Snapshot { .. } => "Snapshot",
            Self::ManagedHandles { .. } => "ManagedHandles",
            Self::Shutdown { .. } => "Shutdown",
        }
    }
}
