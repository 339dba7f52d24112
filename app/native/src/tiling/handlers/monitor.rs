//! Display reconciliation and visibility restore.

use tracing::{debug, warn};

use super::workspace::{create_workspace, display_workspace};
use super::{apply_focus, focus_target_in, is_displayed};
use crate::config::TilingConfig;
use crate::tiling::commands::{Command, Outcome};
use crate::tiling::constants::layout::RECT_EPSILON;
use crate::tiling::effects::SideEffect;
use crate::tiling::error::TilingResult;
use crate::tiling::events::Event;
use crate::tiling::manager::TilingManager;
use crate::tiling::state::{
    ContainerId, ContainerKind, ContainerTree, InsertPosition, MonitorData, MonitorInfo,
};

/// Handles `RefreshMonitors`.
///
/// Known monitors get their new geometry, new displays get a Monitor node
/// with a fresh workspace, and workspaces of vanished displays move (hidden)
/// to the first remaining monitor. An empty display list is ignored.
pub fn on_refresh_monitors(
    manager: &mut TilingManager,
    monitors: Vec<MonitorInfo>,
) -> TilingResult<Outcome> {
    if monitors.is_empty() {
        warn!("display change reported no monitors, keeping the current layout");
        return Ok(Outcome::NoOp);
    }

    let mut changed = false;
    let mut present = Vec::with_capacity(monitors.len());

    for (index, info) in monitors.into_iter().enumerate() {
        let monitor = match find_monitor(manager.containers().tree(), &info.id) {
            Some(monitor) => {
                changed |= update_monitor(manager, monitor, &info)?;
                monitor
            }
            None => {
                changed = true;
                add_monitor(manager, index, info)?
            }
        };
        present.push(monitor);
    }

    let vanished: Vec<ContainerId> = manager
        .containers()
        .tree()
        .monitors()
        .iter()
        .copied()
        .filter(|monitor| !present.contains(monitor))
        .collect();
    if let Some(&destination) = present.first() {
        for monitor in vanished {
            retire_monitor(manager, monitor, destination)?;
            changed = true;
        }
    }

    refocus_if_hidden(manager)?;
    if changed {
        manager.invoke(Command::RedrawContainers)?;
    }
    Ok(Outcome::from_changed(changed))
}

/// Handles `ShowAllWindows`.
pub fn on_show_all_windows(manager: &mut TilingManager) -> TilingResult<Outcome> {
    let mut handles: Vec<_> = manager.containers().managed_handles().collect();
    if handles.is_empty() {
        return Ok(Outcome::NoOp);
    }
    handles.sort_unstable();

    debug!(count = handles.len(), "restoring visibility of every window");
    for handle in handles {
        manager.push_effect(SideEffect::ShowWindow { handle });
    }
    Ok(Outcome::Applied)
}

/// Picks the name of the workspace a new monitor starts with.
///
/// Config workspaces bound to the monitor index come first, then unbound
/// config workspaces in order, then the smallest unused number.
#[must_use]
pub fn next_workspace_name(tree: &ContainerTree, config: &TilingConfig, index: usize) -> String {
    let taken = |name: &str| tree.workspace_by_name(name).is_some();

    config
        .workspaces
        .iter()
        .find(|ws| ws.bind_to_monitor == Some(index) && !taken(&ws.name))
        .or_else(|| {
            config.workspaces.iter().find(|ws| ws.bind_to_monitor.is_none() && !taken(&ws.name))
        })
        .map(|ws| ws.name.clone())
        .unwrap_or_else(|| {
            let mut number = 1_usize;
            while taken(&number.to_string()) {
                number += 1;
            }
            number.to_string()
        })
}

fn find_monitor(tree: &ContainerTree, id: &str) -> Option<ContainerId> {
    tree.monitors()
        .iter()
        .copied()
        .find(|&monitor| tree.get(monitor).and_then(|m| m.as_monitor()).is_some_and(|m| m.id == id))
}

fn update_monitor(
    manager: &mut TilingManager,
    monitor: ContainerId,
    info: &MonitorInfo,
) -> TilingResult<bool> {
    let node = manager.containers_mut().tree_mut().container_mut(monitor)?;
    let moved = !node.rect.approx_eq(&info.rect, RECT_EPSILON);
    node.rect = info.rect;
    if let Some(data) = node.as_monitor_mut() {
        data.is_primary = info.is_primary;
    }

    if moved {
        manager.containers_mut().mark_dirty(monitor);
        debug!(monitor = %info.id, "monitor geometry changed");
    }
    Ok(moved)
}

fn add_monitor(
    manager: &mut TilingManager,
    index: usize,
    info: MonitorInfo,
) -> TilingResult<ContainerId> {
    let root = manager.containers().tree().root();
    let monitor = manager.containers_mut().insert(ContainerKind::Monitor(MonitorData {
        id: info.id.clone(),
        is_primary: info.is_primary,
        displayed_workspace: None,
    }));
    manager.containers_mut().tree_mut().container_mut(monitor)?.rect = info.rect;
    manager.containers_mut().attach(root, monitor, InsertPosition::End)?;

    let name = next_workspace_name(manager.containers().tree(), manager.config(), index);
    let workspace = create_workspace(manager, monitor, &name)?;
    display_workspace(manager, workspace)?;
    debug!(monitor = %info.id, workspace = %name, "monitor added");
    Ok(monitor)
}

/// Moves a vanished monitor's workspaces (hidden) to `destination` and
/// drops the Monitor node.
fn retire_monitor(
    manager: &mut TilingManager,
    monitor: ContainerId,
    destination: ContainerId,
) -> TilingResult<()> {
    let tree = manager.containers().tree();
    let workspaces = tree.children_of(monitor).to_vec();
    let displayed =
        tree.get(monitor).and_then(|m| m.as_monitor()).and_then(|m| m.displayed_workspace);

    for workspace in workspaces {
        let handles: Vec<_> = manager
            .containers()
            .tree()
            .windows_under(workspace)
            .into_iter()
            .filter_map(|window| manager.containers().handle_of(window))
            .collect();

        manager.containers_mut().detach(workspace)?;
        manager.containers_mut().attach(destination, workspace, InsertPosition::End)?;

        if displayed == Some(workspace) {
            for handle in handles {
                manager.push_effect(SideEffect::HideWindow { handle });
            }
            let name = super::workspace_name(manager.containers().tree(), workspace)?;
            manager.emit(Event::WorkspaceDeactivated { name });
        }
    }

    manager.containers_mut().remove(monitor)?;
    debug!(?monitor, ?destination, "monitor removed");
    Ok(())
}

/// Moves focus back onto a displayed workspace if it ended up on a hidden
/// one (or nowhere).
fn refocus_if_hidden(manager: &mut TilingManager) -> TilingResult<()> {
    let tree = manager.containers().tree();
    let visible = manager
        .containers()
        .focused_container()
        .and_then(|focused| tree.workspace_of(focused))
        .is_some_and(|workspace| is_displayed(tree, workspace));
    if visible {
        return Ok(());
    }

    let monitors = tree.monitors();
    let monitor = monitors
        .iter()
        .copied()
        .find(|&m| tree.get(m).and_then(|node| node.as_monitor()).is_some_and(|d| d.is_primary))
        .or_else(|| monitors.first().copied());
    let workspace = monitor
        .and_then(|m| tree.get(m))
        .and_then(|node| node.as_monitor())
        .and_then(|data| data.displayed_workspace);

    if let Some(workspace) = workspace {
        let target = focus_target_in(tree, workspace);
        apply_focus(manager, target)?;
    }
    Ok(())
}
