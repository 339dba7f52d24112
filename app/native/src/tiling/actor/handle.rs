//! Handle for talking to the tiling actor.
//!
//! The `TilingHandle` is the only way other tasks reach the tree. It is cheap
//! to clone and can be shared across threads.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use super::messages::ActorMessage;
use crate::tiling::commands::{Command, Outcome};
use crate::tiling::error::TilingError;
use crate::tiling::events::Event;
use crate::tiling::state::{TreeSnapshot, WindowHandle};

/// Errors for actor communication.
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    /// Failed to send a message: the actor has stopped or its queue is full.
    #[error("Failed to send message to actor: channel closed or full")]
    SendFailed,

    /// The actor dropped the response channel.
    #[error("Failed to receive response from actor: channel closed")]
    ReceiveFailed,

    /// A request did not complete in time.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The command ran and failed.
    #[error(transparent)]
    Command(#[from] TilingError),
}

/// Handle for communicating with the tiling actor.
#[derive(Debug, Clone)]
pub struct TilingHandle {
    sender: mpsc::Sender<ActorMessage>,
}

impl TilingHandle {
    pub(crate) const fn new(sender: mpsc::Sender<ActorMessage>) -> Self { Self { sender } }

    /// Returns `true` while the actor is still receiving.
    #[must_use]
    pub fn is_alive(&self) -> bool { !self.sender.is_closed() }

    // ========================================================================
    // Events
    // ========================================================================

    /// Queues an inbound event without waiting.
    ///
    /// Native adapters call this from their own callbacks.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the actor has stopped or its
    /// queue is full.
    pub fn send_event(&self, event: Event) -> Result<(), ActorError> {
        self.sender.try_send(ActorMessage::Event(event)).map_err(|_| ActorError::SendFailed)
    }

    /// Queues an inbound event, waiting for room in the queue.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the actor has stopped.
    pub async fn send_event_async(&self, event: Event) -> Result<(), ActorError> {
        self.sender.send(ActorMessage::Event(event)).await.map_err(|_| ActorError::SendFailed)
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Runs a command and waits for its outcome.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Command`] if the command failed (the tree is
    /// left as it was), or a channel error if the actor is gone.
    pub async fn invoke(&self, command: Command) -> Result<Outcome, ActorError> {
        let (tx, rx) = oneshot::channel();

        self.sender
            .send(ActorMessage::Invoke { command, respond_to: tx })
            .await
            .map_err(|_| ActorError::SendFailed)?;

        let result = rx.await.map_err(|_| ActorError::ReceiveFailed)?;
        Ok(result?)
    }

    /// Runs a command with a timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Timeout`] if the command doesn't complete in
    /// time, or any error from [`Self::invoke`].
    pub async fn invoke_timeout(
        &self,
        command: Command,
        timeout: Duration,
    ) -> Result<Outcome, ActorError> {
        tokio::time::timeout(timeout, self.invoke(command))
            .await
            .map_err(|_| ActorError::Timeout(timeout))?
    }

    /// Queues a command without waiting for it to run.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the actor has stopped or its
    /// queue is full.
    pub fn invoke_async(&self, command: Command) -> Result<(), ActorError> {
        self.sender.try_send(ActorMessage::InvokeAsync(command)).map_err(|_| ActorError::SendFailed)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Captures the whole container tree.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn snapshot(&self) -> Result<TreeSnapshot, ActorError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(ActorMessage::Snapshot { respond_to: tx })
            .await
            .map_err(|_| ActorError::SendFailed)?;
        rx.await.map_err(|_| ActorError::ReceiveFailed)
    }

    /// Lists the handles of every managed window.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn managed_handles(&self) -> Result<Vec<WindowHandle>, ActorError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(ActorMessage::ManagedHandles { respond_to: tx })
            .await
            .map_err(|_| ActorError::SendFailed)?;
        rx.await.map_err(|_| ActorError::ReceiveFailed)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Restores every window and stops the actor, waiting until it is done.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor already stopped.
    pub async fn shutdown(&self) -> Result<(), ActorError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(ActorMessage::Shutdown { respond_to: Some(tx) })
            .await
            .map_err(|_| ActorError::SendFailed)?;
        rx.await.map_err(|_| ActorError::ReceiveFailed)
    }
}
