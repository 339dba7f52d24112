//! Arena-backed container tree.
//!
//! All nodes live in a [`SlotMap`]; a parent stores the ordered keys of its
//! children and every child keeps a plain key back to its parent. The tree
//! enforces the structural rules on every mutation:
//!
//! - a node has at most one parent and the graph stays acyclic
//! - kinds nest as Root > Monitor > Workspace > (Split | Window)*
//! - a Split never survives a detach with fewer than two children
//!
//! Mutations validate before they touch anything, so a failed call leaves the
//! tree exactly as it was.

use slotmap::SlotMap;
use tracing::trace;

use super::container::{Container, ContainerId, ContainerKind, SplitData};
use super::types::TilingDirection;
use crate::tiling::error::{TilingError, TilingResult};

// ============================================================================
// Positions & Results
// ============================================================================

/// Where to insert a child among its new siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsertPosition {
    Start,
    End,
    /// Explicit index, clamped to the number of children.
    Index(usize),
}

impl InsertPosition {
    fn resolve(self, len: usize) -> usize {
        match self {
            Self::Start => 0,
            Self::End => len,
            Self::Index(index) => index.min(len),
        }
    }
}

/// Outcome of a [`ContainerTree::detach`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detached {
    /// The closest surviving ancestor whose children changed.
    pub parent: ContainerId,
    /// Split containers discarded by the collapse, innermost first.
    pub collapsed: Vec<ContainerId>,
}

// ============================================================================
// Ancestor Iterator
// ============================================================================

/// Lazy root-ward walk over a node's ancestors, ending with the root.
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    tree: &'a ContainerTree,
    next: Option<ContainerId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ContainerId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.parent_of(current);
        Some(current)
    }
}

// ============================================================================
// Container Tree
// ============================================================================

/// The container tree.
#[derive(Debug, Clone)]
pub struct ContainerTree {
    nodes: SlotMap<ContainerId, Container>,
    root: ContainerId,
}

impl Default for ContainerTree {
    fn default() -> Self { Self::new() }
}

impl ContainerTree {
    /// Creates a tree holding only the root node.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Container::new(ContainerKind::Root));
        Self { nodes, root }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// The root node.
    #[must_use]
    pub const fn root(&self) -> ContainerId { self.root }

    /// Number of nodes, including the root and detached nodes.
    #[must_use]
    pub fn len(&self) -> usize { self.nodes.len() }

    /// Always `false`: the root is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    #[must_use]
    pub fn get(&self, id: ContainerId) -> Option<&Container> { self.nodes.get(id) }

    pub fn get_mut(&mut self, id: ContainerId) -> Option<&mut Container> { self.nodes.get_mut(id) }

    #[must_use]
    pub fn contains(&self, id: ContainerId) -> bool { self.nodes.contains_key(id) }

    /// Looks up a node, failing with `ContainerNotFound`.
    ///
    /// # Errors
    ///
    /// Returns [`TilingError::ContainerNotFound`] if the key is stale.
    pub fn container(&self, id: ContainerId) -> TilingResult<&Container> {
        self.nodes.get(id).ok_or_else(|| TilingError::not_found(format!("{id:?}")))
    }

    /// Mutable variant of [`Self::container`].
    ///
    /// # Errors
    ///
    /// Returns [`TilingError::ContainerNotFound`] if the key is stale.
    pub fn container_mut(&mut self, id: ContainerId) -> TilingResult<&mut Container> {
        self.nodes.get_mut(id).ok_or_else(|| TilingError::not_found(format!("{id:?}")))
    }

    /// Ordered children of a node. Stale keys have no children.
    #[must_use]
    pub fn children_of(&self, id: ContainerId) -> &[ContainerId] {
        self.nodes.get(id).map_or(&[], |node| node.children.as_slice())
    }

    #[must_use]
    pub fn parent_of(&self, id: ContainerId) -> Option<ContainerId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Position of a node among its siblings.
    #[must_use]
    pub fn index_in_parent(&self, id: ContainerId) -> Option<usize> {
        let parent = self.parent_of(id)?;
        self.children_of(parent).iter().position(|&child| child == id)
    }

    /// Layout direction of a Workspace or Split node.
    #[must_use]
    pub fn direction_of(&self, id: ContainerId) -> Option<TilingDirection> {
        self.nodes.get(id).and_then(Container::direction)
    }

    #[must_use]
    pub fn is_window(&self, id: ContainerId) -> bool {
        self.nodes.get(id).is_some_and(Container::is_window)
    }

    /// Root-ward walk over the ancestors of `id`, excluding `id` itself.
    #[must_use]
    pub fn traverse_up(&self, id: ContainerId) -> Ancestors<'_> {
        Ancestors { tree: self, next: self.parent_of(id) }
    }

    /// Returns `true` if `ancestor` is a strict ancestor of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: ContainerId, node: ContainerId) -> bool {
        self.traverse_up(node).any(|id| id == ancestor)
    }

    /// The node and its siblings in layout order.
    ///
    /// A detached node is its own only sibling.
    #[must_use]
    pub fn self_and_siblings(&self, id: ContainerId) -> Vec<ContainerId> {
        match self.parent_of(id) {
            Some(parent) => self.children_of(parent).to_vec(),
            None => vec![id],
        }
    }

    /// The Workspace containing `id` (or `id` itself if it is one).
    #[must_use]
    pub fn workspace_of(&self, id: ContainerId) -> Option<ContainerId> {
        std::iter::once(id)
            .chain(self.traverse_up(id))
            .find(|&node| self.nodes.get(node).is_some_and(Container::is_workspace))
    }

    /// The Monitor containing `id` (or `id` itself if it is one).
    #[must_use]
    pub fn monitor_of(&self, id: ContainerId) -> Option<ContainerId> {
        std::iter::once(id)
            .chain(self.traverse_up(id))
            .find(|&node| self.nodes.get(node).and_then(Container::as_monitor).is_some())
    }

    /// Monitors in display order.
    #[must_use]
    pub fn monitors(&self) -> &[ContainerId] { self.children_of(self.root) }

    /// Every attached workspace, grouped by monitor.
    #[must_use]
    pub fn workspaces(&self) -> Vec<ContainerId> {
        self.monitors()
            .iter()
            .flat_map(|&monitor| self.children_of(monitor).iter().copied())
            .collect()
    }

    /// Finds an attached workspace by name.
    #[must_use]
    pub fn workspace_by_name(&self, name: &str) -> Option<ContainerId> {
        self.workspaces().into_iter().find(|&ws| {
            self.nodes.get(ws).and_then(Container::as_workspace).is_some_and(|data| data.name == name)
        })
    }

    /// Pre-order list of `id` and all its descendants.
    #[must_use]
    pub fn descendants(&self, id: ContainerId) -> Vec<ContainerId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !self.contains(current) {
                continue;
            }
            out.push(current);
            stack.extend(self.children_of(current).iter().rev().copied());
        }
        out
    }

    /// Windows under `id` in layout order (including `id` if it is a window).
    #[must_use]
    pub fn windows_under(&self, id: ContainerId) -> Vec<ContainerId> {
        self.descendants(id).into_iter().filter(|&node| self.is_window(node)).collect()
    }

    /// Descends from `id` to a window, taking the first or the last child at
    /// each level.
    #[must_use]
    pub fn descend_to_window(&self, id: ContainerId, from_end: bool) -> Option<ContainerId> {
        let mut current = id;
        loop {
            if self.is_window(current) {
                return Some(current);
            }
            let children = self.children_of(current);
            current = if from_end { *children.last()? } else { *children.first()? };
        }
    }

    // ========================================================================
    // Structural Mutation
    // ========================================================================

    /// Creates a detached node.
    pub fn insert(&mut self, kind: ContainerKind) -> ContainerId {
        self.nodes.insert(Container::new(kind))
    }

    /// Checks whether `child` may be attached under `parent`.
    ///
    /// # Errors
    ///
    /// - [`TilingError::ContainerNotFound`] if either key is stale
    /// - [`TilingError::InvalidTopology`] if the child is already attached,
    ///   the attach would form a cycle, or the kinds cannot nest
    pub fn validate_attach(&self, parent: ContainerId, child: ContainerId) -> TilingResult<()> {
        let parent_node = self.container(parent)?;
        let child_node = self.container(child)?;

        if child == self.root || parent == child {
            return Err(TilingError::topology(format!("cannot attach {child:?} under {parent:?}")));
        }
        if child_node.parent.is_some() {
            return Err(TilingError::topology(format!("{child:?} already has a parent")));
        }
        if self.is_ancestor(child, parent) {
            return Err(TilingError::topology(format!(
                "attaching {child:?} under its descendant {parent:?} would form a cycle"
            )));
        }
        if !parent_node.kind.accepts(&child_node.kind) {
            return Err(TilingError::topology(format!(
                "a {} cannot hold a {}",
                parent_node.kind.name(),
                child_node.kind.name()
            )));
        }
        Ok(())
    }

    /// Attaches a detached node under `parent` at `position`.
    ///
    /// The child's weight becomes the mean weight of its new siblings, so it
    /// takes an equal share of the axis. Returns the index it landed at.
    ///
    /// # Errors
    ///
    /// See [`Self::validate_attach`].
    pub fn attach(
        &mut self,
        parent: ContainerId,
        child: ContainerId,
        position: InsertPosition,
    ) -> TilingResult<usize> {
        self.validate_attach(parent, child)?;

        let siblings = self.children_of(parent);
        let weight = if siblings.is_empty() {
            1.0
        } else {
            #[allow(clippy::cast_precision_loss)] // child counts are tiny
            let count = siblings.len() as f64;
            siblings.iter().filter_map(|&id| self.nodes.get(id)).map(|node| node.weight).sum::<f64>()
                / count
        };
        let index = position.resolve(siblings.len());

        self.link(parent, child, index, weight);
        trace!(?parent, ?child, index, "attached container");
        Ok(index)
    }

    /// Removes `id` from its parent and collapses Split ancestors left with
    /// fewer than two children.
    ///
    /// A collapsed Split's remaining child takes the Split's slot and weight
    /// in the grandparent. The detached subtree is left intact in the arena.
    ///
    /// # Errors
    ///
    /// - [`TilingError::ContainerNotFound`] if the key is stale
    /// - [`TilingError::InvalidTopology`] if the node is not attached
    pub fn detach(&mut self, id: ContainerId) -> TilingResult<Detached> {
        let parent = self
            .container(id)?
            .parent
            .ok_or_else(|| TilingError::topology(format!("{id:?} is not attached")))?;

        self.unlink(parent, id);

        let mut collapsed = Vec::new();
        let mut current = parent;
        loop {
            let Some(node) = self.nodes.get(current) else { break };
            if !node.is_split() || node.children.len() >= 2 {
                break;
            }
            let Some(grandparent) = node.parent else { break };
            let survivor = node.children.first().copied();
            let weight = node.weight;
            let Some(slot) = self.index_in_parent(current) else { break };

            if let Some(grandparent_node) = self.nodes.get_mut(grandparent) {
                grandparent_node.children.remove(slot);
            }
            if let Some(child) = survivor {
                self.link(grandparent, child, slot, weight);
            }
            self.nodes.remove(current);
            trace!(split = ?current, ?survivor, "collapsed split container");

            collapsed.push(current);
            current = grandparent;
        }

        Ok(Detached { parent: current, collapsed })
    }

    /// Deletes a detached node and its whole subtree. Returns the removed keys.
    ///
    /// # Errors
    ///
    /// - [`TilingError::ContainerNotFound`] if the key is stale
    /// - [`TilingError::InvalidTopology`] if the node is still attached or is
    ///   the root
    pub fn discard(&mut self, id: ContainerId) -> TilingResult<Vec<ContainerId>> {
        if self.container(id)?.parent.is_some() || id == self.root {
            return Err(TilingError::topology(format!("{id:?} must be detached before removal")));
        }
        let removed = self.descendants(id);
        for &node in &removed {
            self.nodes.remove(node);
        }
        Ok(removed)
    }

    /// Exchanges the positions (and parents) of two nodes. Each node keeps its
    /// subtree; the weights travel with the slots.
    ///
    /// # Errors
    ///
    /// - [`TilingError::ContainerNotFound`] if either key is stale
    /// - [`TilingError::InvalidTopology`] if the nodes are equal, detached,
    ///   nested in each other, or their kinds do not fit the other's parent
    pub fn swap(&mut self, a: ContainerId, b: ContainerId) -> TilingResult<()> {
        let node_a = self.container(a)?;
        let node_b = self.container(b)?;

        if a == b {
            return Err(TilingError::topology("cannot swap a container with itself"));
        }
        let (Some(parent_a), Some(parent_b)) = (node_a.parent, node_b.parent) else {
            return Err(TilingError::topology("cannot swap detached containers"));
        };
        if self.is_ancestor(a, b) || self.is_ancestor(b, a) {
            return Err(TilingError::topology("cannot swap a container with its ancestor"));
        }
        let fits = self.container(parent_a)?.kind.accepts(&node_b.kind)
            && self.container(parent_b)?.kind.accepts(&node_a.kind);
        if !fits {
            return Err(TilingError::topology(format!(
                "cannot swap a {} with a {}",
                node_a.kind.name(),
                node_b.kind.name()
            )));
        }

        let (Some(index_a), Some(index_b)) = (self.index_in_parent(a), self.index_in_parent(b))
        else {
            return Err(TilingError::topology("dangling parent link"));
        };

        if let Some(node) = self.nodes.get_mut(parent_a) {
            node.children[index_a] = b;
        }
        if let Some(node) = self.nodes.get_mut(parent_b) {
            node.children[index_b] = a;
        }
        let weight_a = self.nodes[a].weight;
        let weight_b = self.nodes[b].weight;
        let node = &mut self.nodes[a];
        node.parent = Some(parent_b);
        node.weight = weight_b;
        let node = &mut self.nodes[b];
        node.parent = Some(parent_a);
        node.weight = weight_a;

        trace!(?a, ?b, "swapped containers");
        Ok(())
    }

    /// Replaces `existing` with a new Split of `direction` holding `existing`
    /// followed by `new_child`. The Split inherits the slot and weight of
    /// `existing`.
    ///
    /// # Errors
    ///
    /// - [`TilingError::ContainerNotFound`] if either key is stale
    /// - [`TilingError::InvalidTopology`] if `existing` is detached, or
    ///   `new_child` cannot live under a Split
    pub fn wrap_pair(
        &mut self,
        existing: ContainerId,
        new_child: ContainerId,
        direction: TilingDirection,
    ) -> TilingResult<ContainerId> {
        let existing_node = self.container(existing)?;
        let parent = existing_node
            .parent
            .ok_or_else(|| TilingError::topology(format!("{existing:?} is not attached")))?;
        let weight = existing_node.weight;
        let new_node = self.container(new_child)?;
        let split_kind = ContainerKind::Split(SplitData { direction });

        if new_node.parent.is_some() || new_child == existing || new_child == self.root {
            return Err(TilingError::topology(format!("{new_child:?} cannot be wrapped")));
        }
        if !self.container(parent)?.kind.accepts(&split_kind)
            || !split_kind.accepts(&existing_node.kind)
            || !split_kind.accepts(&new_node.kind)
        {
            return Err(TilingError::topology("kinds cannot share a split container"));
        }
        let Some(slot) = self.index_in_parent(existing) else {
            return Err(TilingError::topology("dangling parent link"));
        };

        let split = self.insert(split_kind);
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.remove(slot);
        }
        self.link(parent, split, slot, weight);
        self.link(split, existing, 0, 1.0);
        self.link(split, new_child, 1, 1.0);

        trace!(?split, ?existing, ?new_child, %direction, "wrapped containers in split");
        Ok(split)
    }

    fn link(&mut self, parent: ContainerId, child: ContainerId, index: usize, weight: f64) {
        if let Some(node) = self.nodes.get_mut(parent) {
            let index = index.min(node.children.len());
            node.children.insert(index, child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
            node.weight = weight;
        }
    }

    fn unlink(&mut self, parent: ContainerId, child: ContainerId) {
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|id| *id != child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
    }

    // ========================================================================
    // Invariant Checking
    // ========================================================================

    /// Verifies the structural invariants of everything reachable from the
    /// root.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self) -> Result<(), String> {
        let reachable = self.descendants(self.root);
        if self.nodes[self.root].parent.is_some() {
            return Err("root has a parent".into());
        }
        for &id in &reachable {
            let node = &self.nodes[id];
            if node.is_split() && node.children.len() < 2 {
                return Err(format!("split {id:?} has {} children", node.children.len()));
            }
            for &child in &node.children {
                let Some(child_node) = self.nodes.get(child) else {
                    return Err(format!("{id:?} holds stale child {child:?}"));
                };
                if child_node.parent != Some(id) {
                    return Err(format!("{child:?} does not point back to {id:?}"));
                }
                if !node.kind.accepts(&child_node.kind) {
                    return Err(format!(
                        "{} {id:?} holds a {}",
                        node.kind.name(),
                        child_node.kind.name()
                    ));
                }
            }
            let unique: std::collections::HashSet<_> = node.children.iter().collect();
            if unique.len() != node.children.len() {
                return Err(format!("{id:?} lists a child twice"));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tiling::state::container::{MonitorData, WindowData, WorkspaceData};
    use crate::tiling::state::types::{WindowHandle, WindowInfo};

    struct Fixture {
        tree: ContainerTree,
        workspace: ContainerId,
    }

    fn fixture(direction: TilingDirection) -> Fixture {
        let mut tree = ContainerTree::new();
        let monitor = tree.insert(ContainerKind::Monitor(MonitorData {
            id: "DISPLAY1".into(),
            is_primary: true,
            displayed_workspace: None,
        }));
        tree.attach(tree.root(), monitor, InsertPosition::End).unwrap();
        let workspace = tree.insert(ContainerKind::Workspace(WorkspaceData {
            name: "1".into(),
            direction,
            last_focused: None,
            keep_alive: false,
        }));
        tree.attach(monitor, workspace, InsertPosition::End).unwrap();
        Fixture { tree, workspace }
    }

    fn window(tree: &mut ContainerTree, handle: u64) -> ContainerId {
        tree.insert(ContainerKind::Window(WindowData {
            handle: WindowHandle(handle),
            info: WindowInfo::default(),
            pending_split: None,
        }))
    }

    fn split(tree: &mut ContainerTree, direction: TilingDirection) -> ContainerId {
        tree.insert(ContainerKind::Split(SplitData { direction }))
    }

    mod attach_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_attach_positions() {
            let Fixture { mut tree, workspace } = fixture(TilingDirection::Horizontal);
            let a = window(&mut tree, 1);
            let b = window(&mut tree, 2);
            let c = window(&mut tree, 3);
            let d = window(&mut tree, 4);

            tree.attach(workspace, a, InsertPosition::End).unwrap();
            tree.attach(workspace, b, InsertPosition::Start).unwrap();
            tree.attach(workspace, c, InsertPosition::Index(1)).unwrap();
            tree.attach(workspace, d, InsertPosition::Index(99)).unwrap();

            assert_eq!(tree.children_of(workspace), &[b, c, a, d]);
            assert_eq!(tree.parent_of(a), Some(workspace));
            assert_eq!(tree.index_in_parent(d), Some(3));
            tree.check_invariants().unwrap();
        }

        #[test]
        fn test_attach_rejects_cycle() {
            let Fixture { mut tree, .. } = fixture(TilingDirection::Horizontal);
            let outer = split(&mut tree, TilingDirection::Vertical);
            let inner = split(&mut tree, TilingDirection::Horizontal);
            tree.attach(outer, inner, InsertPosition::End).unwrap();

            let err = tree.attach(inner, outer, InsertPosition::End).unwrap_err();
            assert!(matches!(err, TilingError::InvalidTopology(_)));
            assert!(tree.children_of(inner).is_empty());
        }

        #[test]
        fn test_attach_rejects_kind_violations() {
            let Fixture { mut tree, workspace } = fixture(TilingDirection::Horizontal);
            let monitor = tree.insert(ContainerKind::Monitor(MonitorData {
                id: "DISPLAY2".into(),
                is_primary: false,
                displayed_workspace: None,
            }));
            assert!(matches!(
                tree.attach(workspace, monitor, InsertPosition::End),
                Err(TilingError::InvalidTopology(_))
            ));

            let a = window(&mut tree, 1);
            let b = window(&mut tree, 2);
            tree.attach(workspace, a, InsertPosition::End).unwrap();
            assert!(tree.attach(a, b, InsertPosition::End).is_err());
        }

        #[test]
        fn test_attach_rejects_attached_child() {
            let Fixture { mut tree, workspace } = fixture(TilingDirection::Horizontal);
            let a = window(&mut tree, 1);
            tree.attach(workspace, a, InsertPosition::End).unwrap();
            assert!(tree.attach(workspace, a, InsertPosition::End).is_err());
            assert_eq!(tree.children_of(workspace).len(), 1);
        }

        #[test]
        fn test_attach_weight_is_sibling_mean() {
            let Fixture { mut tree, workspace } = fixture(TilingDirection::Horizontal);
            let a = window(&mut tree, 1);
            let b = window(&mut tree, 2);
            let c = window(&mut tree, 3);
            tree.attach(workspace, a, InsertPosition::End).unwrap();
            tree.attach(workspace, b, InsertPosition::End).unwrap();
            tree.get_mut(a).unwrap().weight = 3.0;
            tree.attach(workspace, c, InsertPosition::End).unwrap();
            assert!((tree.get(c).unwrap().weight - 2.0).abs() < f64::EPSILON);
        }

        #[test]
        fn test_attach_stale_key_is_not_found() {
            let Fixture { mut tree, workspace } = fixture(TilingDirection::Horizontal);
            let a = window(&mut tree, 1);
            tree.discard(a).unwrap();
            assert!(tree.attach(workspace, a, InsertPosition::End).unwrap_err().is_not_found());
        }
    }

    mod detach_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_detach_collapses_split() {
            let Fixture { mut tree, workspace } = fixture(TilingDirection::Horizontal);
            let a = window(&mut tree, 1);
            let s = split(&mut tree, TilingDirection::Vertical);
            let b = window(&mut tree, 2);
            let c = window(&mut tree, 3);
            tree.attach(workspace, a, InsertPosition::End).unwrap();
            tree.attach(workspace, s, InsertPosition::End).unwrap();
            tree.attach(s, b, InsertPosition::End).unwrap();
            tree.attach(s, c, InsertPosition::End).unwrap();
            tree.get_mut(s).unwrap().weight = 1.5;

            let detached = tree.detach(b).unwrap();

            assert_eq!(detached, Detached { parent: workspace, collapsed: vec![s] });
            assert!(!tree.contains(s));
            assert_eq!(tree.children_of(workspace), &[a, c]);
            assert_eq!(tree.parent_of(c), Some(workspace));
            assert!((tree.get(c).unwrap().weight - 1.5).abs() < f64::EPSILON);
            assert_eq!(tree.parent_of(b), None);
            tree.check_invariants().unwrap();
        }

        #[test]
        fn test_detach_collapses_recursively() {
            let Fixture { mut tree, workspace } = fixture(TilingDirection::Horizontal);
            let a = window(&mut tree, 1);
            let b = window(&mut tree, 2);
            let outer = split(&mut tree, TilingDirection::Vertical);
            let inner = split(&mut tree, TilingDirection::Horizontal);
            let c = window(&mut tree, 3);

            tree.attach(workspace, a, InsertPosition::End).unwrap();
            tree.attach(workspace, outer, InsertPosition::End).unwrap();
            tree.attach(outer, b, InsertPosition::End).unwrap();
            tree.attach(outer, inner, InsertPosition::End).unwrap();
            tree.attach(inner, c, InsertPosition::End).unwrap();
            let d = window(&mut tree, 4);
            tree.attach(inner, d, InsertPosition::End).unwrap();

            tree.detach(d).unwrap();
            assert!(!tree.contains(inner));
            assert_eq!(tree.children_of(outer), &[b, c]);

            let detached = tree.detach(b).unwrap();
            assert_eq!(detached.collapsed, vec![outer]);
            assert_eq!(tree.children_of(workspace), &[a, c]);
            tree.check_invariants().unwrap();
        }

        #[test]
        fn test_detach_leaves_workspace_empty() {
            let Fixture { mut tree, workspace } = fixture(TilingDirection::Horizontal);
            let a = window(&mut tree, 1);
            tree.attach(workspace, a, InsertPosition::End).unwrap();

            let detached = tree.detach(a).unwrap();
            assert_eq!(detached.parent, workspace);
            assert!(detached.collapsed.is_empty());
            assert!(tree.children_of(workspace).is_empty());
        }

        #[test]
        fn test_detach_unattached_is_topology_error() {
            let Fixture { mut tree, .. } = fixture(TilingDirection::Horizontal);
            let a = window(&mut tree, 1);
            assert!(matches!(tree.detach(a), Err(TilingError::InvalidTopology(_))));
        }

        #[test]
        fn test_discard_requires_detached() {
            let Fixture { mut tree, workspace } = fixture(TilingDirection::Horizontal);
            let a = window(&mut tree, 1);
            tree.attach(workspace, a, InsertPosition::End).unwrap();
            assert!(tree.discard(a).is_err());
            tree.detach(a).unwrap();
            assert_eq!(tree.discard(a).unwrap(), vec![a]);
            assert!(!tree.contains(a));
        }
    }

    mod traversal_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_traverse_up_ends_at_root() {
            let Fixture { mut tree, workspace } = fixture(TilingDirection::Horizontal);
            let s = split(&mut tree, TilingDirection::Vertical);
            let a = window(&mut tree, 1);
            let b = window(&mut tree, 2);
            tree.attach(workspace, s, InsertPosition::End).unwrap();
            tree.attach(s, a, InsertPosition::End).unwrap();
            tree.attach(s, b, InsertPosition::End).unwrap();

            let monitor = tree.parent_of(workspace).unwrap();
            let ancestors: Vec<_> = tree.traverse_up(a).collect();
            assert_eq!(ancestors, vec![s, workspace, monitor, tree.root()]);

            // Restartable: a second walk yields the same sequence.
            assert_eq!(tree.traverse_up(a).collect::<Vec<_>>(), ancestors);
            assert_eq!(tree.traverse_up(tree.root()).count(), 0);
        }

        #[test]
        fn test_self_and_siblings() {
            let Fixture { mut tree, workspace } = fixture(TilingDirection::Horizontal);
            let a = window(&mut tree, 1);
            let b = window(&mut tree, 2);
            tree.attach(workspace, a, InsertPosition::End).unwrap();
            tree.attach(workspace, b, InsertPosition::End).unwrap();

            assert_eq!(tree.self_and_siblings(b), vec![a, b]);
            let lone = window(&mut tree, 3);
            assert_eq!(tree.self_and_siblings(lone), vec![lone]);
        }

        #[test]
        fn test_workspace_and_monitor_of() {
            let Fixture { mut tree, workspace } = fixture(TilingDirection::Horizontal);
            let a = window(&mut tree, 1);
            tree.attach(workspace, a, InsertPosition::End).unwrap();
            assert_eq!(tree.workspace_of(a), Some(workspace));
            assert_eq!(tree.workspace_of(workspace), Some(workspace));
            assert_eq!(tree.monitor_of(a), tree.parent_of(workspace));
            assert_eq!(tree.workspace_by_name("1"), Some(workspace));
            assert_eq!(tree.workspace_by_name("2"), None);
        }

        #[test]
        fn test_descend_to_window() {
            let Fixture { mut tree, workspace } = fixture(TilingDirection::Horizontal);
            let a = window(&mut tree, 1);
            let s = split(&mut tree, TilingDirection::Vertical);
            let b = window(&mut tree, 2);
            let c = window(&mut tree, 3);
            tree.attach(workspace, a, InsertPosition::End).unwrap();
            tree.attach(workspace, s, InsertPosition::End).unwrap();
            tree.attach(s, b, InsertPosition::End).unwrap();
            tree.attach(s, c, InsertPosition::End).unwrap();

            assert_eq!(tree.descend_to_window(workspace, false), Some(a));
            assert_eq!(tree.descend_to_window(workspace, true), Some(c));
            assert_eq!(tree.descend_to_window(s, false), Some(b));
            assert_eq!(tree.windows_under(workspace), vec![a, b, c]);
        }
    }

    mod swap_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_swap_siblings_keeps_slot_weights() {
            let Fixture { mut tree, workspace } = fixture(TilingDirection::Horizontal);
            let a = window(&mut tree, 1);
            let b = window(&mut tree, 2);
            tree.attach(workspace, a, InsertPosition::End).unwrap();
            tree.attach(workspace, b, InsertPosition::End).unwrap();
            tree.get_mut(a).unwrap().weight = 2.0;

            tree.swap(a, b).unwrap();

            assert_eq!(tree.children_of(workspace), &[b, a]);
            assert!((tree.get(b).unwrap().weight - 2.0).abs() < f64::EPSILON);
            assert!((tree.get(a).unwrap().weight - 1.0).abs() < f64::EPSILON);
        }

        #[test]
        fn test_swap_across_parents() {
            let Fixture { mut tree, workspace } = fixture(TilingDirection::Horizontal);
            let a = window(&mut tree, 1);
            let s = split(&mut tree, TilingDirection::Vertical);
            let b = window(&mut tree, 2);
            let c = window(&mut tree, 3);
            tree.attach(workspace, a, InsertPosition::End).unwrap();
            tree.attach(workspace, s, InsertPosition::End).unwrap();
            tree.attach(s, b, InsertPosition::End).unwrap();
            tree.attach(s, c, InsertPosition::End).unwrap();

            tree.swap(a, c).unwrap();

            assert_eq!(tree.children_of(workspace), &[c, s]);
            assert_eq!(tree.children_of(s), &[b, a]);
            assert_eq!(tree.parent_of(a), Some(s));
            assert_eq!(tree.parent_of(c), Some(workspace));
            tree.check_invariants().unwrap();
        }

        #[test]
        fn test_swap_rejects_nested_and_self() {
            let Fixture { mut tree, workspace } = fixture(TilingDirection::Horizontal);
            let s = split(&mut tree, TilingDirection::Vertical);
            let a = window(&mut tree, 1);
            let b = window(&mut tree, 2);
            tree.attach(workspace, s, InsertPosition::End).unwrap();
            tree.attach(s, a, InsertPosition::End).unwrap();
            tree.attach(s, b, InsertPosition::End).unwrap();

            assert!(tree.swap(s, a).is_err());
            assert!(tree.swap(a, a).is_err());
            assert!(tree.swap(workspace, a).is_err());
            assert_eq!(tree.children_of(s), &[a, b]);
        }
    }

    mod wrap_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_wrap_pair_takes_slot() {
            let Fixture { mut tree, workspace } = fixture(TilingDirection::Horizontal);
            let a = window(&mut tree, 1);
            let b = window(&mut tree, 2);
            let c = window(&mut tree, 3);
            tree.attach(workspace, a, InsertPosition::End).unwrap();
            tree.attach(workspace, b, InsertPosition::End).unwrap();
            tree.get_mut(b).unwrap().weight = 0.5;

            let s = tree.wrap_pair(b, c, TilingDirection::Vertical).unwrap();

            assert_eq!(tree.children_of(workspace), &[a, s]);
            assert_eq!(tree.children_of(s), &[b, c]);
            assert_eq!(tree.direction_of(s), Some(TilingDirection::Vertical));
            assert!((tree.get(s).unwrap().weight - 0.5).abs() < f64::EPSILON);
            tree.check_invariants().unwrap();
        }
    }
}
