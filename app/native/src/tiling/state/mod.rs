//! Container tree data model.
//!
//! - [`types`]: geometry and identity values
//! - [`container`]: node kinds and the shared node struct
//! - [`tree`]: the arena and its structural operations
//! - [`snapshot`]: owned, serializable views for queries

pub mod container;
pub mod snapshot;
pub mod tree;
pub mod types;

pub use container::{
    Container, ContainerId, ContainerKind, MonitorData, SplitData, WindowData, WorkspaceData,
};
pub use snapshot::TreeSnapshot;
pub use tree::{ContainerTree, Detached, InsertPosition};
pub use types::{
    Direction, MonitorInfo, MouseButtons, Point, Rect, TilingDirection, WindowHandle, WindowInfo,
    WindowSeed,
};
