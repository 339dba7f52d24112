//! Tree node types.
//!
//! Every node shares the structural fields (parent, ordered children,
//! geometry, layout weight) and carries a kind-specific payload. Nodes never
//! own each other directly: children are stored as arena keys, and the parent
//! link is a non-owning key back.

use serde::Serialize;
use slotmap::new_key_type;
use smallvec::SmallVec;

use super::types::{Rect, TilingDirection, WindowHandle, WindowInfo};

// ============================================================================
// Keys
// ============================================================================

new_key_type! {
    /// Stable key of a node in the container arena.
    pub struct ContainerId;
}

/// Ordered child list. Most containers hold a handful of children.
pub type Children = SmallVec<[ContainerId; 4]>;

// ============================================================================
// Kind Payloads
// ============================================================================

/// A physical display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorData {
    /// Platform device name.
    pub id: String,
    /// Primary display flag.
    pub is_primary: bool,
    /// The workspace currently shown on this monitor.
    pub displayed_workspace: Option<ContainerId>,
}

/// A named virtual desktop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkspaceData {
    pub name: String,
    pub direction: TilingDirection,
    /// Focus to restore when this workspace is displayed again.
    pub last_focused: Option<ContainerId>,
    /// Survives becoming empty while hidden.
    pub keep_alive: bool,
}

/// An internal layout node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitData {
    pub direction: TilingDirection,
}

/// A managed native window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowData {
    pub handle: WindowHandle,
    pub info: WindowInfo,
    /// Direction the next window inserted beside this one should split in.
    pub pending_split: Option<TilingDirection>,
}

/// The closed set of container kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ContainerKind {
    Root,
    Monitor(MonitorData),
    Workspace(WorkspaceData),
    Split(SplitData),
    Window(WindowData),
}

impl ContainerKind {
    /// Short lowercase name used in logs and error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Monitor(_) => "monitor",
            Self::Workspace(_) => "workspace",
            Self::Split(_) => "split",
            Self::Window(_) => "window",
        }
    }

    /// Returns `true` if a node of kind `child` may live under this kind.
    #[must_use]
    pub const fn accepts(&self, child: &Self) -> bool {
        matches!(
            (self, child),
            (Self::Root, Self::Monitor(_))
                | (Self::Monitor(_), Self::Workspace(_))
                | (Self::Workspace(_) | Self::Split(_), Self::Split(_) | Self::Window(_))
        )
    }
}

// ============================================================================
// Container
// ============================================================================

/// A node in the container tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    #[serde(skip)]
    pub(crate) parent: Option<ContainerId>,
    #[serde(skip)]
    pub(crate) children: Children,
    /// Last computed geometry.
    pub rect: Rect,
    /// Relative share of the parent's axis.
    pub weight: f64,
    #[serde(flatten)]
    pub kind: ContainerKind,
}

impl Container {
    pub(crate) fn new(kind: ContainerKind) -> Self {
        Self {
            parent: None,
            children: Children::new(),
            rect: Rect::zero(),
            weight: 1.0,
            kind,
        }
    }

    /// The parent node, if attached.
    #[must_use]
    pub const fn parent(&self) -> Option<ContainerId> { self.parent }

    /// Ordered children.
    #[must_use]
    pub fn children(&self) -> &[ContainerId] { &self.children }

    /// Tiling direction of a Workspace or Split, `None` for other kinds.
    #[must_use]
    pub const fn direction(&self) -> Option<TilingDirection> {
        match &self.kind {
            ContainerKind::Workspace(ws) => Some(ws.direction),
            ContainerKind::Split(split) => Some(split.direction),
            _ => None,
        }
    }

    /// Sets the direction of a Workspace or Split. Returns `false` for other kinds.
    pub fn set_direction(&mut self, direction: TilingDirection) -> bool {
        match &mut self.kind {
            ContainerKind::Workspace(ws) => ws.direction = direction,
            ContainerKind::Split(split) => split.direction = direction,
            _ => return false,
        }
        true
    }

    #[must_use]
    pub const fn is_window(&self) -> bool { matches!(self.kind, ContainerKind::Window(_)) }

    #[must_use]
    pub const fn is_workspace(&self) -> bool { matches!(self.kind, ContainerKind::Workspace(_)) }

    #[must_use]
    pub const fn is_split(&self) -> bool { matches!(self.kind, ContainerKind::Split(_)) }

    /// Workspace or Split: the nodes that lay out children along an axis.
    #[must_use]
    pub const fn is_tiling(&self) -> bool {
        matches!(self.kind, ContainerKind::Workspace(_) | ContainerKind::Split(_))
    }

    #[must_use]
    pub const fn as_window(&self) -> Option<&WindowData> {
        match &self.kind {
            ContainerKind::Window(window) => Some(window),
            _ => None,
        }
    }

    pub fn as_window_mut(&mut self) -> Option<&mut WindowData> {
        match &mut self.kind {
            ContainerKind::Window(window) => Some(window),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_workspace(&self) -> Option<&WorkspaceData> {
        match &self.kind {
            ContainerKind::Workspace(ws) => Some(ws),
            _ => None,
        }
    }

    pub fn as_workspace_mut(&mut self) -> Option<&mut WorkspaceData> {
        match &mut self.kind {
            ContainerKind::Workspace(ws) => Some(ws),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_monitor(&self) -> Option<&MonitorData> {
        match &self.kind {
            ContainerKind::Monitor(monitor) => Some(monitor),
            _ => None,
        }
    }

    pub fn as_monitor_mut(&mut self) -> Option<&mut MonitorData> {
        match &mut self.kind {
            ContainerKind::Monitor(monitor) => Some(monitor),
            _ => None,
        }
    }
}
