//! Tree-wide bookkeeping: focus, the pending-redraw set and the handle index.
//!
//! [`ContainerService`] wraps the [`ContainerTree`] and is the only way command
//! handlers change its structure. Every structural call keeps the derived
//! state consistent:
//!
//! - the handle index covers exactly the attached windows
//! - focus and `last_focused` never point at removed nodes
//! - the dirty set never holds collapsed or removed containers

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::tiling::error::{TilingError, TilingResult};
use crate::tiling::state::{
    ContainerId, ContainerKind, ContainerTree, Detached, InsertPosition, TilingDirection,
    TreeSnapshot, WindowHandle,
};

/// A focus transition produced by [`ContainerService::set_focus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    pub previous: Option<ContainerId>,
    pub current: ContainerId,
}

/// Insertion-ordered set of containers awaiting a redraw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtySet {
    order: Vec<ContainerId>,
    members: HashSet<ContainerId>,
}

impl DirtySet {
    /// Adds a container. Returns `false` if it was already present.
    pub fn insert(&mut self, id: ContainerId) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.order.push(id);
        true
    }

    pub fn remove(&mut self, id: ContainerId) {
        if self.members.remove(&id) {
            self.order.retain(|entry| *entry != id);
        }
    }

    #[must_use]
    pub fn contains(&self, id: ContainerId) -> bool { self.members.contains(&id) }

    #[must_use]
    pub fn len(&self) -> usize { self.order.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.order.is_empty() }

    #[must_use]
    pub fn as_slice(&self) -> &[ContainerId] { &self.order }

    /// Takes every entry, leaving the set empty.
    pub fn drain(&mut self) -> Vec<ContainerId> {
        self.members.clear();
        std::mem::take(&mut self.order)
    }
}

/// Owner of the container tree and its derived state.
#[derive(Debug, Clone, Default)]
pub struct ContainerService {
    tree: ContainerTree,
    focused: Option<ContainerId>,
    dirty: DirtySet,
    windows: HashMap<WindowHandle, ContainerId>,
}

impl ContainerService {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub const fn tree(&self) -> &ContainerTree { &self.tree }

    /// Mutable tree access for non-structural edits (geometry, weights,
    /// directions, payload fields).
    pub(crate) const fn tree_mut(&mut self) -> &mut ContainerTree { &mut self.tree }

    /// Captures the whole tree.
    #[must_use]
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot::capture(&self.tree, self.tree.root(), self.focused)
    }

    // ========================================================================
    // Focus
    // ========================================================================

    #[must_use]
    pub const fn focused_container(&self) -> Option<ContainerId> { self.focused }

    /// The focused container if it is a Window.
    #[must_use]
    pub fn focused_window(&self) -> Option<ContainerId> {
        self.focused.filter(|&id| self.tree.is_window(id))
    }

    /// Moves focus to `id`.
    ///
    /// Only Windows and empty Workspaces can hold focus. Focusing a Window
    /// also records it as its workspace's `last_focused`. Returns `None` when
    /// `id` was already focused.
    ///
    /// # Errors
    ///
    /// - [`TilingError::ContainerNotFound`] if `id` is stale
    /// - [`TilingError::InvalidTopology`] if `id` cannot hold focus
    pub fn set_focus(&mut self, id: ContainerId) -> TilingResult<Option<FocusChange>> {
        let node = self.tree.container(id)?;
        let focusable = node.is_window() || (node.is_workspace() && node.children().is_empty());
        if !focusable {
            return Err(TilingError::topology(format!("a {} cannot hold focus", node.kind.name())));
        }

        if node.is_window()
            && let Some(workspace) = self.tree.workspace_of(id)
            && let Some(data) = self.tree.get_mut(workspace).and_then(|ws| ws.as_workspace_mut())
        {
            data.last_focused = Some(id);
        }

        if self.focused == Some(id) {
            return Ok(None);
        }
        let previous = self.focused.replace(id);
        trace!(?previous, current = ?id, "focus changed");
        Ok(Some(FocusChange { previous, current: id }))
    }

    /// Drops focus entirely (only used when nothing focusable remains).
    pub fn clear_focus(&mut self) { self.focused = None; }

    // ========================================================================
    // Dirty Set
    // ========================================================================

    /// Queues a container for redraw.
    ///
    /// Windows resolve to their parent; Monitors to their displayed workspace.
    /// Stale keys are ignored.
    pub fn mark_dirty(&mut self, id: ContainerId) {
        let Some(node) = self.tree.get(id) else { return };
        let target = match &node.kind {
            ContainerKind::Workspace(_) | ContainerKind::Split(_) => Some(id),
            ContainerKind::Window(_) => node.parent(),
            ContainerKind::Monitor(monitor) => monitor.displayed_workspace,
            ContainerKind::Root => None,
        };
        if let Some(target) = target
            && self.dirty.insert(target)
        {
            trace!(container = ?target, "marked dirty");
        }
    }

    #[must_use]
    pub const fn dirty(&self) -> &DirtySet { &self.dirty }

    /// Takes the pending-redraw set, leaving it empty.
    pub fn drain_dirty(&mut self) -> Vec<ContainerId> { self.dirty.drain() }

    // ========================================================================
    // Handle Index
    // ========================================================================

    #[must_use]
    pub fn window_by_handle(&self, handle: WindowHandle) -> Option<ContainerId> {
        self.windows.get(&handle).copied()
    }

    /// Looks up an attached window, failing with `ContainerNotFound`.
    ///
    /// # Errors
    ///
    /// Returns [`TilingError::ContainerNotFound`] for unknown handles.
    pub fn require_window(&self, handle: WindowHandle) -> TilingResult<ContainerId> {
        self.window_by_handle(handle)
            .ok_or_else(|| TilingError::not_found(format!("window {handle}")))
    }

    #[must_use]
    pub fn handle_of(&self, id: ContainerId) -> Option<WindowHandle> {
        self.tree.get(id).and_then(|node| node.as_window()).map(|window| window.handle)
    }

    /// Every managed window handle, in no particular order.
    pub fn managed_handles(&self) -> impl Iterator<Item = WindowHandle> + '_ {
        self.windows.keys().copied()
    }

    #[must_use]
    pub fn window_count(&self) -> usize { self.windows.len() }

    fn index_subtree(&mut self, id: ContainerId) {
        for window in self.tree.windows_under(id) {
            if let Some(handle) = self.handle_of(window) {
                self.windows.insert(handle, window);
            }
        }
    }

    fn unindex_subtree(&mut self, id: ContainerId) {
        for window in self.tree.windows_under(id) {
            if let Some(handle) = self.handle_of(window) {
                self.windows.remove(&handle);
            }
        }
    }

    // ========================================================================
    // Structural Operations
    // ========================================================================

    /// Creates a detached node.
    pub fn insert(&mut self, kind: ContainerKind) -> ContainerId { self.tree.insert(kind) }

    /// Attaches a detached node and indexes the windows it carries.
    ///
    /// # Errors
    ///
    /// See [`ContainerTree::validate_attach`].
    pub fn attach(
        &mut self,
        parent: ContainerId,
        child: ContainerId,
        position: InsertPosition,
    ) -> TilingResult<usize> {
        let index = self.tree.attach(parent, child, position)?;
        self.index_subtree(child);
        Ok(index)
    }

    /// Detaches a node (collapsing emptied splits) and unindexes its windows.
    ///
    /// Focus is kept, since the node usually gets attached again in the same
    /// command.
    ///
    /// # Errors
    ///
    /// See [`ContainerTree::detach`].
    pub fn detach(&mut self, id: ContainerId) -> TilingResult<Detached> {
        let detached = self.tree.detach(id)?;
        self.unindex_subtree(id);
        for &split in &detached.collapsed {
            self.dirty.remove(split);
        }
        Ok(detached)
    }

    /// Detaches and deletes a node with its subtree.
    ///
    /// Focus and `last_focused` references into the subtree are cleared.
    ///
    /// # Errors
    ///
    /// See [`ContainerTree::detach`].
    pub fn remove(&mut self, id: ContainerId) -> TilingResult<Detached> {
        let detached = self.detach(id)?;
        let removed = self.tree.discard(id)?;

        for &node in &removed {
            self.dirty.remove(node);
        }
        if self.focused.is_some_and(|focused| removed.contains(&focused)) {
            self.focused = None;
        }
        for workspace in self.tree.workspaces() {
            if let Some(data) = self.tree.get_mut(workspace).and_then(|ws| ws.as_workspace_mut())
                && data.last_focused.is_some_and(|last| removed.contains(&last))
            {
                data.last_focused = None;
            }
        }
        Ok(detached)
    }

    /// Exchanges two nodes' positions.
    ///
    /// # Errors
    ///
    /// See [`ContainerTree::swap`].
    pub fn swap(&mut self, a: ContainerId, b: ContainerId) -> TilingResult<()> {
        self.tree.swap(a, b)
    }

    /// Wraps `existing` and the detached `new_child` in a new Split.
    ///
    /// # Errors
    ///
    /// See [`ContainerTree::wrap_pair`].
    pub fn wrap_pair(
        &mut self,
        existing: ContainerId,
        new_child: ContainerId,
        direction: TilingDirection,
    ) -> TilingResult<ContainerId> {
        let split = self.tree.wrap_pair(existing, new_child, direction)?;
        self.index_subtree(new_child);
        Ok(split)
    }
}

// ============================================================================
// Tests
// ============================================================================
