//! Startup for the tiling core.
//!
//! ```text
//! start()
//!  1. Build the TilingManager with the default policies
//!  2. Populate monitors, workspaces and pre-existing windows
//!  3. Spawn the TilingActor and return its handle
//! ```
//!
//! A startup fault is the only fatal error in the core. When it happens every
//! enumerated window is shown again before the error is returned.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::actor::{TilingActor, TilingHandle};
use super::effects::EffectSink;
use super::error::TilingResult;
use super::events::Event;
use super::manager::TilingManager;
use super::state::{MonitorInfo, WindowSeed};
use crate::config::{TilingConfig, watch_config_file};

/// Builds the tree from the enumerated displays and windows and spawns the
/// actor on the current tokio runtime.
///
/// # Errors
///
/// Returns [`TilingError::FatalStartupFault`](super::error::TilingError) if
/// no monitor or workspace could be resolved.
pub fn start(
    mut config: TilingConfig,
    sink: Box<dyn EffectSink>,
    monitors: Vec<MonitorInfo>,
    windows: Vec<WindowSeed>,
) -> TilingResult<(TilingHandle, JoinHandle<()>)> {
    config.prepare();
    let manager = build(config, sink, monitors, windows)?;
    let (handle, task) = TilingActor::spawn(manager);
    Ok((handle, task))
}

/// Builds and populates a manager without spawning the actor.
///
/// # Errors
///
/// Same as [`start`].
pub fn build(
    config: TilingConfig,
    sink: Box<dyn EffectSink>,
    monitors: Vec<MonitorInfo>,
    windows: Vec<WindowSeed>,
) -> TilingResult<TilingManager> {
    let mut manager = TilingManager::new(config, sink);
    let handles: Vec<_> = windows.iter().map(|seed| seed.handle).collect();
    let monitor_count = monitors.len();

    if let Err(err) = manager.populate(monitors, windows) {
        error!(error = %err, "tiling startup failed, restoring windows");
        manager.restore_visibility(handles);
        return Err(err);
    }

    info!(
        monitors = monitor_count,
        windows = manager.containers().window_count(),
        "tiling core started"
    );
    Ok(manager)
}

/// Feeds configuration file changes to a running actor as `ConfigReloaded`.
pub fn watch_config(path: PathBuf, handle: TilingHandle) {
    watch_config_file(path, move |config| {
        if let Err(err) = handle.send_event(Event::ConfigReloaded { config: Arc::new(config) }) {
            warn!(error = %err, "dropping configuration reload");
        }
    });
}
