//! `trellis simulate`: replays a scenario through the tiling actor.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use clap::Args;
use colored::Colorize;
use tracing::{debug, warn};

use crate::cli::output::{self, Placement};
use crate::cli::scenario::{Action, Scenario};
use crate::config::{self, TilingConfig};
use crate::error::TrellisError;
use crate::tiling::{self, ActorError, RecordingSink, SideEffect, TreeSnapshot};

/// Arguments for `trellis simulate`.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Scenario file (JSON or JSONC).
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,

    /// Print the final tree as JSON instead of an outline.
    #[arg(long)]
    pub json: bool,

    /// Also print every effect in the order it was emitted.
    #[arg(long)]
    pub effects: bool,
}

/// Result of a replay.
#[derive(Debug)]
pub struct Report {
    pub snapshot: TreeSnapshot,
    pub effects: Vec<SideEffect>,
    /// Commands that failed, one line each.
    pub failures: Vec<String>,
}

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the scenario can't be read, startup fails, or the
/// actor stops unexpectedly.
pub fn execute(args: &SimulateArgs, config_path: Option<&Path>) -> Result<(), TrellisError> {
    let scenario = Scenario::parse(File::open(&args.scenario)?)?;
    let config = match scenario.config.clone() {
        Some(config) => config,
        None => config::load_or_default(config_path).0,
    };

    let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
    let report = runtime.block_on(replay(config, scenario))?;

    if args.json {
        output::print_highlighted_json(&serde_json::to_value(&report.snapshot)?);
    } else {
        output::print_tree(&report.snapshot);
        println!();
        output::print_placements(&placements(&report.effects));
    }

    if args.effects {
        println!();
        for effect in &report.effects {
            println!("{}", serde_json::to_string(effect)?);
        }
    }

    for failure in &report.failures {
        eprintln!("{} {failure}", "warning:".yellow().bold());
    }
    Ok(())
}

/// Starts the tiling core with a recording sink and feeds it every step.
///
/// Must run inside a tokio runtime. Failed commands are collected in the
/// report; the replay carries on after them.
///
/// # Errors
///
/// Returns an error if startup fails or the actor can't be reached.
pub async fn replay(config: TilingConfig, scenario: Scenario) -> Result<Report, TrellisError> {
    let sink = RecordingSink::new();
    let (handle, task) =
        tiling::start(config, Box::new(sink.clone()), scenario.monitors, scenario.windows)?;

    let mut failures = Vec::new();
    for (index, step) in scenario.steps.into_iter().enumerate() {
        match step.into_action() {
            Action::Event(event) => {
                debug!(step = index, event = event.name(), "replaying event");
                handle.send_event_async(event).await?;
            }
            Action::Command(command) => {
                let name = command.name();
                debug!(step = index, command = name, "replaying command");
                match handle.invoke(command).await {
                    Ok(_) => {}
                    Err(ActorError::Command(err)) => {
                        warn!(step = index, command = name, error = %err, "step failed");
                        failures.push(format!("step {index} ({name}): {err}"));
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }
    }

    let snapshot = handle.snapshot().await?;
    let effects = sink.recorded();

    handle.shutdown().await?;
    task.await.map_err(|err| TrellisError::RuntimeError(err.to_string()))?;

    Ok(Report { snapshot, effects, failures })
}

/// Folds an effect stream into the last known frame and visibility of each
/// window, ordered by handle.
#[must_use]
pub fn placements(effects: &[SideEffect]) -> Vec<Placement> {
    let mut by_handle = BTreeMap::new();

    for effect in effects {
        let Some(handle) = effect.handle() else {
            continue;
        };
        let placement =
            by_handle.entry(handle).or_insert(Placement { handle, rect: None, visible: true });
        match effect {
            SideEffect::PositionWindow { rect, .. } => placement.rect = Some(*rect),
            SideEffect::ShowWindow { .. } => placement.visible = true,
            SideEffect::HideWindow { .. } => placement.visible = false,
            _ => {}
        }
    }

    by_handle.into_values().collect()
}
