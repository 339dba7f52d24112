//! Error types for the tiling window manager core.
//!
//! Every fallible operation on the container tree, the command bus and the
//! handlers returns a [`TilingResult`]. The variants follow how each failure is
//! recovered:
//!
//! - **Structural errors** ([`TilingError::InvalidTopology`]): an attach, detach
//!   or swap would break a tree invariant. The command aborts before mutating.
//! - **Lookup errors** ([`TilingError::ContainerNotFound`]): a node or native
//!   handle vanished between event emission and command execution. The
//!   dispatch boundary treats these as no-ops.
//! - **Handler faults** ([`TilingError::HandlerFault`]): a handler panicked. The
//!   bus restores the pre-command tree and keeps running.
//! - **Startup faults** ([`TilingError::FatalStartupFault`]): initial population
//!   failed. These are the only errors that end the process.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::tiling::error::{TilingError, TilingResult};
//!
//! fn focused_window(service: &ContainerService) -> TilingResult<ContainerId> {
//!     service
//!         .focused_container()
//!         .filter(|&id| service.tree().is_window(id))
//!         .ok_or_else(|| TilingError::not_found("focused window"))
//! }
//! ```

use thiserror::Error;

/// Result type alias for tiling operations.
pub type TilingResult<T> = Result<T, TilingError>;

/// Errors that can occur while mutating or querying the container tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TilingError {
    /// An attach, detach or swap would violate a tree invariant.
    ///
    /// Examples:
    /// - attaching a node under one of its own descendants
    /// - attaching a Monitor under anything but the root
    /// - attaching a node that already has a parent
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    /// A command referenced a tree node or native handle that is gone.
    ///
    /// The window set changes underneath the manager all the time, so this is
    /// expected and never fatal.
    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    /// A command handler panicked.
    ///
    /// The command's effect is rolled back and the bus keeps running.
    #[error("Handler for '{command}' faulted: {message}")]
    HandlerFault {
        /// Name of the command that was executing.
        command: &'static str,
        /// The panic payload, if it was a string.
        message: String,
    },

    /// Initial state population failed (no monitors or workspaces resolvable).
    #[error("Fatal startup fault: {0}")]
    FatalStartupFault(String),
}

impl TilingError {
    /// Creates an invalid topology error with the given message.
    #[must_use]
    pub fn topology(message: impl Into<String>) -> Self { Self::InvalidTopology(message.into()) }

    /// Creates a not found error describing the missing container.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self { Self::ContainerNotFound(what.into()) }

    /// Creates a handler fault for the named command.
    #[must_use]
    pub fn fault(command: &'static str, message: impl Into<String>) -> Self {
        Self::HandlerFault { command, message: message.into() }
    }

    /// Creates a fatal startup fault with the given message.
    #[must_use]
    pub fn startup(message: impl Into<String>) -> Self { Self::FatalStartupFault(message.into()) }

    /// Returns `true` if this error is a missing container or handle.
    #[must_use]
    pub const fn is_not_found(&self) -> bool { matches!(self, Self::ContainerNotFound(_)) }

    /// Returns `true` if the dispatch boundary can absorb this error.
    ///
    /// Everything except startup faults is recoverable.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool { !matches!(self, Self::FatalStartupFault(_)) }
}

// ============================================================================
// Tests
// ============================================================================
