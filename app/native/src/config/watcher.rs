//! Configuration file watcher for hot-reloading.
//!
//! Watches the configuration file's directory, waits for the file to settle,
//! reparses it and hands the new configuration to a callback. The runtime
//! turns that into a `ConfigReloaded` event.

use std::path::PathBuf;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use super::{TilingConfig, load_config_from_path};

/// Debounce duration for config file changes.
/// Some editors trigger multiple events per save (write to temp, rename, etc.).
pub const CONFIG_DEBOUNCE_MS: u64 = 200;

/// Starts watching the configuration file for changes.
///
/// Spawns a background thread. Each burst of file events is collapsed into a
/// single reload once no event arrived for [`CONFIG_DEBOUNCE_MS`]. Files that
/// fail to parse are logged and skipped; the previous configuration stays in
/// effect.
///
/// # Arguments
///
/// * `config_path` - The configuration file to watch
/// * `on_reload` - Called with each successfully parsed configuration
pub fn watch_config_file<F>(config_path: PathBuf, on_reload: F)
where
    F: Fn(TilingConfig) + Send + 'static,
{
    let config_filename =
        config_path.file_name().map(std::ffi::OsStr::to_os_string).unwrap_or_default();

    std::thread::spawn(move || {
        let (tx, rx) = std::sync::mpsc::channel();

        let mut watcher: RecommendedWatcher = match notify::recommended_watcher(tx) {
            Ok(w) => w,
            Err(err) => {
                tracing::warn!(error = %err, "failed to create config watcher");
                return;
            }
        };

        // Watch the parent directory to catch file replacements
        // (some editors save by writing to a temp file then renaming)
        let watch_path = config_path.parent().unwrap_or(&config_path);

        if let Err(err) = watcher.watch(watch_path, RecursiveMode::NonRecursive) {
            tracing::warn!(error = %err, path = %watch_path.display(), "failed to watch config file");
            return;
        }

        let debounce = Duration::from_millis(CONFIG_DEBOUNCE_MS);
        let mut pending = false;

        loop {
            let received = if pending {
                rx.recv_timeout(debounce)
            } else {
                rx.recv().map_err(|_| RecvTimeoutError::Disconnected)
            };

            match received {
                Ok(Ok(event)) => {
                    let affects_config = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().is_some_and(|name| name == config_filename));
                    pending |= affects_config;
                }
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "config watch error");
                }
                Err(RecvTimeoutError::Timeout) => {
                    pending = false;
                    match load_config_from_path(&config_path) {
                        Ok((config, _)) => {
                            tracing::info!(path = %config_path.display(), "configuration changed");
                            on_reload(config);
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, "ignoring invalid configuration change");
                        }
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    });
}
