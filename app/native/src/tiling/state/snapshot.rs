//! Serializable, owned views of the tree for queries and diagnostics.

use std::fmt::Write as _;

use serde::Serialize;

use super::container::{ContainerId, ContainerKind};
use super::tree::ContainerTree;
use super::types::{Rect, TilingDirection, WindowHandle};

/// An owned copy of one node and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSnapshot {
    /// Kind name (`root`, `monitor`, `workspace`, `split`, `window`).
    pub kind: &'static str,
    /// Monitor id, workspace name, or window handle.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<TilingDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<WindowHandle>,
    pub rect: Rect,
    pub focused: bool,
    /// Workspace shown on its monitor (always `true` for other kinds).
    pub displayed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeSnapshot>,
}

impl TreeSnapshot {
    /// Captures the subtree rooted at `id`.
    #[must_use]
    pub fn capture(tree: &ContainerTree, id: ContainerId, focused: Option<ContainerId>) -> Self {
        let Some(node) = tree.get(id) else {
            return Self::empty();
        };

        let (label, handle) = match &node.kind {
            ContainerKind::Root | ContainerKind::Split(_) => (String::new(), None),
            ContainerKind::Monitor(monitor) => (monitor.id.clone(), None),
            ContainerKind::Workspace(ws) => (ws.name.clone(), None),
            ContainerKind::Window(window) => (window.handle.to_string(), Some(window.handle)),
        };

        let displayed = node.as_workspace().is_none()
            || node
                .parent
                .and_then(|monitor| tree.get(monitor))
                .and_then(super::container::Container::as_monitor)
                .is_some_and(|monitor| monitor.displayed_workspace == Some(id));

        Self {
            kind: node.kind.name(),
            label,
            direction: node.direction(),
            handle,
            rect: node.rect,
            focused: focused == Some(id),
            displayed,
            children: node
                .children
                .iter()
                .map(|&child| Self::capture(tree, child, focused))
                .collect(),
        }
    }

    const fn empty() -> Self {
        Self {
            kind: "missing",
            label: String::new(),
            direction: None,
            handle: None,
            rect: Rect::zero(),
            focused: false,
            displayed: false,
            children: Vec::new(),
        }
    }

    /// Single-line structural summary, e.g. `workspace:1[h](0x1 split[v](0x2 0x3))`.
    ///
    /// Geometry and focus are left out, which makes it handy for asserting
    /// tree shape.
    #[must_use]
    pub fn shape(&self) -> String {
        let mut out = String::new();
        self.write_shape(&mut out);
        out
    }

    fn write_shape(&self, out: &mut String) {
        match self.kind {
            "window" => out.push_str(&self.label),
            kind => {
                out.push_str(kind);
                if !self.label.is_empty() {
                    let _ = write!(out, ":{}", self.label);
                }
                if let Some(direction) = self.direction {
                    let axis = match direction {
                        TilingDirection::Horizontal => 'h',
                        TilingDirection::Vertical => 'v',
                    };
                    let _ = write!(out, "[{axis}]");
                }
                out.push('(');
                for (i, child) in self.children.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    child.write_shape(out);
                }
                out.push(')');
            }
        }
    }

    /// Iterates over this node and its descendants in pre-order.
    pub fn walk(&self) -> impl Iterator<Item = (usize, &Self)> {
        let mut stack = vec![(0, self)];
        std::iter::from_fn(move || {
            let (depth, node) = stack.pop()?;
            stack.extend(node.children.iter().rev().map(|child| (depth + 1, child)));
            Some((depth, node))
        })
    }
}
