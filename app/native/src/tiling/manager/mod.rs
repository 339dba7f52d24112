//! Tiling window manager.
//!
//! [`TilingManager`] is the single serialized context that owns the container
//! service and the event bus. Every tree mutation goes through
//! [`TilingManager::invoke`]; every notification goes through
//! [`TilingManager::emit`].
//!
//! # Dispatch model
//!
//! - `invoke` runs a command's handler inline and returns its result.
//!   Handlers may invoke further commands re-entrantly.
//! - Each invocation takes a checkpoint first. If the handler fails or
//!   panics, the tree, the queued events and the queued effects are restored
//!   to the checkpoint.
//! - Emitted events are queued and delivered once the outermost invocation
//!   has finished ("settling"). Subscribers run in registration order and
//!   their failures are logged, never propagated.
//! - Side effects are collected and handed to the [`EffectSink`] as one batch
//!   after settling.

mod helpers;

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

pub(crate) use helpers::{panic_message, resize_share, shares_from_weights};
use tracing::{debug, error, trace, warn};

use super::bus::{EventBus, EventSubscriber, SubscriptionId};
use super::commands::{Command, Outcome};
use super::constants::dispatch::{MAX_INVOKE_DEPTH, MAX_SETTLE_ROUNDS};
use super::effects::{EffectSink, SideEffect};
use super::error::{TilingError, TilingResult};
use super::events::Event;
use super::handlers;
use super::layout::Gaps;
use super::policies;
use super::service::ContainerService;
use super::state::{ContainerId, MonitorInfo, Point, TreeSnapshot, WindowHandle, WindowSeed};
use crate::config::TilingConfig;

// ============================================================================
// Checkpoint
// ============================================================================

/// Everything a failed command must not leave behind.
struct Checkpoint {
    containers: ContainerService,
    effects: usize,
    pending_events: usize,
    deferred: usize,
    border_window: Option<WindowHandle>,
    native_foreground: Option<WindowHandle>,
    cursor: Option<Point>,
}

// ============================================================================
// Manager
// ============================================================================

/// Owner of the tree, the bus and the outbound effect queue.
pub struct TilingManager {
    containers: ContainerService,
    config: Arc<TilingConfig>,
    gaps: Gaps,
    bus: EventBus,
    effects: Vec<SideEffect>,
    deferred: VecDeque<Command>,
    depth: usize,
    settling: bool,
    border_window: Option<WindowHandle>,
    native_foreground: Option<WindowHandle>,
    cursor: Option<Point>,
    sink: Box<dyn EffectSink>,
}

impl TilingManager {
    /// Creates a manager with the built-in reactive policies subscribed.
    #[must_use]
    pub fn new(config: TilingConfig, sink: Box<dyn EffectSink>) -> Self {
        let mut manager = Self::bare(config, sink);
        for subscriber in policies::default_subscribers() {
            manager.subscribe(subscriber);
        }
        manager
    }

    /// Creates a manager without any subscribers.
    #[must_use]
    pub fn bare(config: TilingConfig, sink: Box<dyn EffectSink>) -> Self {
        let gaps = Gaps::from_config(&config.gaps);
        Self {
            containers: ContainerService::new(),
            config: Arc::new(config),
            gaps,
            bus: EventBus::new(),
            effects: Vec::new(),
            deferred: VecDeque::new(),
            depth: 0,
            settling: false,
            border_window: None,
            native_foreground: None,
            cursor: None,
            sink,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub const fn containers(&self) -> &ContainerService { &self.containers }

    pub(crate) const fn containers_mut(&mut self) -> &mut ContainerService {
        &mut self.containers
    }

    #[must_use]
    pub const fn config(&self) -> &Arc<TilingConfig> { &self.config }

    #[must_use]
    pub const fn gaps(&self) -> &Gaps { &self.gaps }

    #[must_use]
    pub const fn bus(&self) -> &EventBus { &self.bus }

    /// Captures the whole tree.
    #[must_use]
    pub fn snapshot(&self) -> TreeSnapshot { self.containers.snapshot() }

    /// Window currently drawn with the active border.
    #[must_use]
    pub const fn border_window(&self) -> Option<WindowHandle> { self.border_window }

    pub(crate) const fn set_border_window(&mut self, handle: Option<WindowHandle>) {
        self.border_window = handle;
    }

    /// Last foreground window reported by, or pushed to, the OS.
    #[must_use]
    pub const fn native_foreground(&self) -> Option<WindowHandle> { self.native_foreground }

    pub(crate) const fn set_native_foreground(&mut self, handle: Option<WindowHandle>) {
        self.native_foreground = handle;
    }

    /// Last known cursor position.
    #[must_use]
    pub const fn cursor_position(&self) -> Option<Point> { self.cursor }

    pub(crate) const fn set_cursor_position(&mut self, point: Point) { self.cursor = Some(point); }

    /// Swaps the configuration snapshot.
    ///
    /// Existing workspaces pick up `keepAlive` from the new snapshot. Layout
    /// is not recomputed here.
    pub fn replace_config(&mut self, config: Arc<TilingConfig>) {
        self.gaps = Gaps::from_config(&config.gaps);

        let tree = self.containers.tree_mut();
        for workspace in tree.workspaces() {
            if let Some(data) = tree.get_mut(workspace).and_then(|ws| ws.as_workspace_mut()) {
                data.keep_alive = config.workspace(&data.name).is_some_and(|ws| ws.keep_alive);
            }
        }

        self.config = config;
        debug!("configuration snapshot replaced");
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    pub fn subscribe(&mut self, subscriber: Box<dyn EventSubscriber>) -> SubscriptionId {
        self.bus.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool { self.bus.unsubscribe(id) }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Runs a command synchronously.
    ///
    /// On failure the manager is restored to the state it had before the
    /// outermost command began. Nested commands share that checkpoint and
    /// hand their failures up to it.
    ///
    /// # Errors
    ///
    /// Returns the handler's error, or [`TilingError::HandlerFault`] if the
    /// handler panicked or the re-entrant depth limit was hit.
    pub fn invoke(&mut self, command: Command) -> TilingResult<Outcome> {
        let name = command.name();
        if self.depth >= MAX_INVOKE_DEPTH {
            let err = TilingError::fault(name, format!("nested deeper than {MAX_INVOKE_DEPTH}"));
            error!(command = name, "command recursion limit reached");
            return Err(err);
        }

        let top_level = self.is_idle();
        let checkpoint = (self.depth == 0).then(|| self.checkpoint());

        self.depth += 1;
        trace!(command = name, depth = self.depth, "invoking command");
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.execute(command)))
            .unwrap_or_else(|payload| Err(TilingError::fault(name, panic_message(payload.as_ref()))));
        self.depth -= 1;

        match &result {
            Ok(outcome) => trace!(command = name, ?outcome, "command completed"),
            Err(err) => {
                if let Some(checkpoint) = checkpoint {
                    self.restore(checkpoint);
                }
                log_failure(name, err);
            }
        }

        if top_level {
            self.settle();
            self.flush_effects();
        }
        result
    }

    /// Queues a command to run after the current work settles.
    ///
    /// Failures are logged and otherwise discarded.
    pub fn invoke_async(&mut self, command: Command) {
        trace!(command = command.name(), "command deferred");
        self.deferred.push_back(command);
        if self.is_idle() {
            self.settle();
            self.flush_effects();
        }
    }

    /// Runs a command at the recovery boundary.
    ///
    /// Missing containers are expected while the window set changes under
    /// the manager, so they turn into [`Outcome::NoOp`].
    ///
    /// # Errors
    ///
    /// Returns any error other than [`TilingError::ContainerNotFound`].
    pub fn dispatch(&mut self, command: Command) -> TilingResult<Outcome> {
        match self.invoke(command) {
            Err(err) if err.is_not_found() => Ok(Outcome::NoOp),
            other => other,
        }
    }

    fn execute(&mut self, command: Command) -> TilingResult<Outcome> {
        match command {
            // Structure
            Command::MoveFocusedWindow { direction } => {
                handlers::on_move_focused_window(self, direction)
            }
            Command::AttachContainer { parent, child, position } => {
                handlers::on_attach_container(self, parent, child, position)
            }
            Command::SwapContainers { a, b } => handlers::on_swap_containers(self, a, b),
            Command::ChangeTilingDirection { container, direction } => {
                handlers::on_change_tiling_direction(self, container, direction)
            }
            Command::ToggleTilingDirection => handlers::on_toggle_tiling_direction(self),
            Command::ResizeFocusedWindow { amount } => {
                handlers::on_resize_focused_window(self, amount)
            }

            // Redraw & Focus
            Command::RedrawContainers => handlers::on_redraw_containers(self),
            Command::SyncNativeFocus => handlers::on_sync_native_focus(self),
            Command::SetActiveWindowBorder { window } => {
                handlers::on_set_active_window_border(self, window)
            }
            Command::SetFocusedDescendant { container } => {
                handlers::on_set_focused_descendant(self, container)
            }
            Command::FocusInDirection { direction } => {
                handlers::on_focus_in_direction(self, direction)
            }

            // Window Lifecycle
            Command::AddWindow { handle, rect, info } => {
                handlers::on_add_window(self, handle, rect, info)
            }
            Command::RemoveWindow { handle } => handlers::on_remove_window(self, handle),
            Command::UpdateWindowRect { handle, rect } => {
                handlers::on_update_window_rect(self, handle, rect)
            }

            // Workspaces & Monitors
            Command::FocusWorkspace { name } => handlers::on_focus_workspace(self, &name),
            Command::MoveWindowToWorkspace { name } => {
                handlers::on_move_window_to_workspace(self, &name)
            }
            Command::RefreshMonitors { monitors } => handlers::on_refresh_monitors(self, monitors),
            Command::ShowAllWindows => handlers::on_show_all_windows(self),
        }
    }

    const fn is_idle(&self) -> bool { self.depth == 0 && !self.settling }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            containers: self.containers.clone(),
            effects: self.effects.len(),
            pending_events: self.bus.pending_len(),
            deferred: self.deferred.len(),
            border_window: self.border_window,
            native_foreground: self.native_foreground,
            cursor: self.cursor,
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.containers = checkpoint.containers;
        self.effects.truncate(checkpoint.effects);
        self.bus.truncate_pending(checkpoint.pending_events);
        self.deferred.truncate(checkpoint.deferred);
        self.border_window = checkpoint.border_window;
        self.native_foreground = checkpoint.native_foreground;
        self.cursor = checkpoint.cursor;
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Queues an event for every interested subscriber.
    ///
    /// Outside of a command the event is delivered immediately; inside one it
    /// is delivered after the outermost command returns.
    pub fn emit(&mut self, event: Event) {
        trace!(event = event.name(), "event emitted");
        self.bus.enqueue(event);
        if self.is_idle() {
            self.settle();
            self.flush_effects();
        }
    }

    /// Accepts an event from a native adapter.
    pub fn ingest(&mut self, event: Event) {
        debug!(event = event.name(), "inbound event");
        self.emit(event);
    }

    /// Delivers queued events and runs deferred commands until both queues
    /// are empty.
    fn settle(&mut self) {
        self.settling = true;
        let mut rounds = 0;

        while self.bus.has_pending() || !self.deferred.is_empty() {
            if rounds == MAX_SETTLE_ROUNDS {
                warn!(
                    pending_events = self.bus.pending_len(),
                    deferred = self.deferred.len(),
                    "event cascade did not settle, dropping the remainder"
                );
                self.bus.clear_pending();
                self.deferred.clear();
                break;
            }
            rounds += 1;

            for event in self.bus.take_pending() {
                self.deliver(&event);
            }

            let deferred: Vec<Command> = self.deferred.drain(..).collect();
            for command in deferred {
                // Failures are already logged by invoke.
                let _ = self.invoke(command);
            }
        }

        self.settling = false;
    }

    fn deliver(&mut self, event: &Event) {
        let kind = event.kind();
        let mut subscriptions = self.bus.begin_delivery();

        for subscription in &mut subscriptions {
            if !subscription.wants(kind) || self.bus.is_removed(subscription.id) {
                continue;
            }

            let subscriber = subscription.subscriber.name();
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                subscription.subscriber.on_event(event, self)
            }));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(err)) if err.is_not_found() => {
                    debug!(subscriber, event = event.name(), error = %err, "subscriber skipped");
                }
                Ok(Err(err)) => {
                    warn!(subscriber, event = event.name(), error = %err, "subscriber failed");
                }
                Err(payload) => {
                    error!(
                        subscriber,
                        event = event.name(),
                        panic = %panic_message(payload.as_ref()),
                        "subscriber panicked"
                    );
                }
            }
        }

        self.bus.end_delivery(subscriptions);
    }

    // ========================================================================
    // Effects
    // ========================================================================

    /// Queues an outbound request for the native adapter.
    pub fn push_effect(&mut self, effect: SideEffect) {
        trace!(effect = effect.name(), "effect queued");
        self.effects.push(effect);
    }

    fn flush_effects(&mut self) {
        if self.effects.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut self.effects);
        trace!(count = batch.len(), "flushing effects");
        self.sink.execute_batch(batch);
    }

    // ========================================================================
    // Startup
    // ========================================================================

    /// Builds the initial tree from enumerated displays and windows.
    ///
    /// Each window goes to the displayed workspace of the monitor containing
    /// its centre (the first monitor if none does).
    ///
    /// # Errors
    ///
    /// Returns [`TilingError::FatalStartupFault`] when no monitor or
    /// workspace could be created. Individual windows that fail to attach
    /// are skipped.
    pub fn populate(
        &mut self,
        monitors: Vec<MonitorInfo>,
        windows: Vec<WindowSeed>,
    ) -> TilingResult<()> {
        if monitors.is_empty() {
            return Err(TilingError::startup("no monitors were enumerated"));
        }

        self.invoke(Command::RefreshMonitors { monitors })
            .map_err(|err| TilingError::startup(format!("monitor setup failed: {err}")))?;

        let tree = self.containers.tree();
        let first_monitor = tree.monitors().first().copied();
        let has_workspace = tree.monitors().iter().all(|&monitor| {
            tree.get(monitor)
                .and_then(|m| m.as_monitor())
                .is_some_and(|m| m.displayed_workspace.is_some())
        });
        let Some(first_monitor) = first_monitor.filter(|_| has_workspace) else {
            return Err(TilingError::startup("no workspace could be resolved for every monitor"));
        };

        for seed in windows {
            let target = self.monitor_at(seed.rect.center()).unwrap_or(first_monitor);
            self.focus_monitor(target);

            let handle = seed.handle;
            if let Err(err) = self.invoke(Command::AddWindow {
                handle: seed.handle,
                rect: seed.rect,
                info: seed.info,
            }) {
                warn!(%handle, error = %err, "skipping pre-existing window");
            }
        }

        let _ = self.dispatch(Command::SyncNativeFocus);
        debug!(windows = self.containers.window_count(), "initial population complete");
        Ok(())
    }

    /// Asks the adapter to show `handles` right away, managed or not.
    ///
    /// Used when startup fails after windows were enumerated.
    pub fn restore_visibility(&mut self, handles: impl IntoIterator<Item = WindowHandle>) {
        for handle in handles {
            self.push_effect(SideEffect::ShowWindow { handle });
        }
        self.flush_effects();
    }

    fn monitor_at(&self, point: Point) -> Option<ContainerId> {
        let tree = self.containers.tree();
        tree.monitors()
            .iter()
            .copied()
            .find(|&monitor| tree.get(monitor).is_some_and(|m| m.rect.contains_point(point)))
    }

    /// Moves focus onto `monitor` unless it already holds it.
    fn focus_monitor(&mut self, monitor: ContainerId) {
        let tree = self.containers.tree();
        let focused_monitor =
            self.containers.focused_container().and_then(|focused| tree.monitor_of(focused));
        if focused_monitor == Some(monitor) {
            return;
        }

        let target = tree
            .get(monitor)
            .and_then(|m| m.as_monitor())
            .and_then(|m| m.displayed_workspace)
            .map(|workspace| handlers::focus_target_in(tree, workspace));
        if let Some(container) = target {
            let _ = self.dispatch(Command::SetFocusedDescendant { container });
        }
    }
}

impl std::fmt::Debug for TilingManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TilingManager")
            .field("containers", &self.containers)
            .field("bus", &self.bus)
            .field("queued_effects", &self.effects.len())
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

fn log_failure(command: &'static str, err: &TilingError) {
    match err {
        TilingError::ContainerNotFound(_) => debug!(command, error = %err, "command skipped"),
        TilingError::InvalidTopology(_) => warn!(command, error = %err, "command rejected"),
        TilingError::HandlerFault { .. } | TilingError::FatalStartupFault(_) => {
            error!(command, error = %err, "command faulted, state rolled back");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
