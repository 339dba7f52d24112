//! Tiling actor.
//!
//! The actor owns the [`TilingManager`] and processes [`ActorMessage`]s
//! sequentially from a bounded channel. It is the single serialized context
//! for every tree mutation: native adapters, the config watcher and the CLI
//! all talk to it through a [`TilingHandle`].
//!
//! # Panic Recovery
//!
//! Commands already restore their checkpoint when a handler panics. The loop
//! adds an outer guard so that a panic anywhere else in message handling is
//! logged and the next message is still processed.
//!
//! # Shutdown
//!
//! On [`ActorMessage::Shutdown`], or once every handle is dropped, the actor
//! runs `ShowAllWindows` so no window is left hidden, then exits.

mod handle;
mod messages;

use std::ops::ControlFlow;
use std::panic::{AssertUnwindSafe, catch_unwind};

pub use handle::{ActorError, TilingHandle};
pub use messages::ActorMessage;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace, warn};

use super::commands::Command;
use super::constants::dispatch::ACTOR_CHANNEL_CAPACITY;
use super::manager::{TilingManager, panic_message};

/// Owns the tiling state and runs its message loop.
pub struct TilingActor {
    manager: TilingManager,
    receiver: mpsc::Receiver<ActorMessage>,
}

impl TilingActor {
    /// Creates an actor around `manager` and the handle that feeds it.
    #[must_use]
    pub fn new(manager: TilingManager) -> (Self, TilingHandle) {
        let (sender, receiver) = mpsc::channel(ACTOR_CHANNEL_CAPACITY);
        (Self { manager, receiver }, TilingHandle::new(sender))
    }

    /// Spawns the actor on the current tokio runtime.
    ///
    /// Must be called from within a runtime.
    #[must_use]
    pub fn spawn(manager: TilingManager) -> (TilingHandle, JoinHandle<()>) {
        debug!("spawning tiling actor");
        let (actor, handle) = Self::new(manager);
        let task = tokio::spawn(actor.run());
        (handle, task)
    }

    /// Runs the message loop until shutdown or until every handle is dropped.
    pub async fn run(mut self) {
        trace!("actor message loop starting");

        while let Some(message) = self.receiver.recv().await {
            let name = message.name();
            let flow = catch_unwind(AssertUnwindSafe(|| self.handle_message(message)));

            match flow {
                Ok(ControlFlow::Continue(())) => {}
                Ok(ControlFlow::Break(())) => {
                    debug!("tiling actor stopped");
                    return;
                }
                Err(payload) => {
                    error!(
                        message = name,
                        panic = %panic_message(payload.as_ref()),
                        "actor recovered from panic"
                    );
                }
            }
        }

        debug!("actor channel closed, restoring windows");
        self.restore_windows();
    }

    fn handle_message(&mut self, message: ActorMessage) -> ControlFlow<()> {
        match message {
            ActorMessage::Event(event) => self.manager.ingest(event),
            ActorMessage::Invoke { command, respond_to } => {
                let result = self.manager.invoke(command);
                if respond_to.send(result).is_err() {
                    trace!("invoke caller went away before the result was ready");
                }
            }
            ActorMessage::InvokeAsync(command) => self.manager.invoke_async(command),
            ActorMessage::Snapshot { respond_to } => {
                let _ = respond_to.send(self.manager.snapshot());
            }
            ActorMessage::ManagedHandles { respond_to } => {
                let mut handles: Vec<_> = self.manager.containers().managed_handles().collect();
                handles.sort_unstable();
                let _ = respond_to.send(handles);
            }
            ActorMessage::Shutdown { respond_to } => {
                self.restore_windows();
                if let Some(tx) = respond_to {
                    let _ = tx.send(());
                }
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn restore_windows(&mut self) {
        if let Err(err) = self.manager.invoke(Command::ShowAllWindows) {
            warn!(error = %err, "failed to restore windows on shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::TilingConfig;
    use crate::tiling::commands::Outcome;
    use crate::tiling::effects::{RecordingSink, SideEffect};
    use crate::tiling::error::TilingError;
    use crate::tiling::events::Event;
    use crate::tiling::state::{MonitorInfo, Rect, WindowHandle, WindowInfo};

    fn spawn_actor() -> (TilingHandle, JoinHandle<()>, RecordingSink) {
        let sink = RecordingSink::new();
        let mut manager = TilingManager::new(TilingConfig::default(), Box::new(sink.clone()));
        manager
            .populate(
                vec![MonitorInfo {
                    id: "primary".to_string(),
                    rect: Rect::new(0.0, 0.0, 1000.0, 800.0),
                    is_primary: true,
                }],
                Vec::new(),
            )
            .unwrap();
        let (handle, task) = TilingActor::spawn(manager);
        (handle, task, sink)
    }

    fn opened(handle: u64) -> Event {
        Event::WindowOpened {
            handle: WindowHandle(handle),
            rect: Rect::new(0.0, 0.0, 400.0, 300.0),
            info: WindowInfo::default(),
        }
    }

    #[tokio::test]
    async fn test_events_are_applied_in_order() {
        let (handle, task, _sink) = spawn_actor();

        handle.send_event(opened(1)).unwrap();
        handle.send_event(opened(2)).unwrap();
        handle.send_event(Event::WindowClosed { handle: WindowHandle(1) }).unwrap();

        let handles = handle.managed_handles().await.unwrap();
        assert_eq!(handles, vec![WindowHandle(2)]);

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_invoke_returns_outcome() {
        let (handle, task, _sink) = spawn_actor();

        let outcome = handle
            .invoke(Command::AddWindow {
                handle: WindowHandle(7),
                rect: Rect::new(0.0, 0.0, 100.0, 100.0),
                info: WindowInfo::default(),
            })
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Created(_)));

        let snapshot = handle.snapshot().await.unwrap();
        assert!(snapshot.shape().contains("0x7"));

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_invoke_reports_command_errors() {
        let (handle, task, _sink) = spawn_actor();

        let result = handle.invoke(Command::RemoveWindow { handle: WindowHandle(99) }).await;
        assert!(matches!(result, Err(ActorError::Command(TilingError::ContainerNotFound(_)))));

        // The actor is still running.
        assert!(handle.snapshot().await.is_ok());

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_invoke_timeout_succeeds_when_fast() {
        let (handle, task, _sink) = spawn_actor();

        let outcome = handle
            .invoke_timeout(Command::RedrawContainers, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::NoOp);

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_restores_windows() {
        let (handle, task, sink) = spawn_actor();
        handle.send_event(opened(1)).unwrap();
        handle.send_event(opened(2)).unwrap();
        handle.snapshot().await.unwrap();
        sink.take();

        handle.shutdown().await.unwrap();
        task.await.unwrap();

        assert_eq!(
            sink.take(),
            vec![
                SideEffect::ShowWindow { handle: WindowHandle(1) },
                SideEffect::ShowWindow { handle: WindowHandle(2) },
            ]
        );
        assert!(!handle.is_alive());
        assert!(matches!(handle.send_event(opened(3)), Err(ActorError::SendFailed)));
    }

    #[tokio::test]
    async fn test_dropping_every_handle_stops_the_actor() {
        let (handle, task, sink) = spawn_actor();
        handle.send_event(opened(1)).unwrap();
        drop(handle);

        task.await.unwrap();

        assert!(sink.recorded().contains(&SideEffect::ShowWindow { handle: WindowHandle(1) }));
    }
}
