//! Tiling window manager core.
//!
//! The core keeps a single container tree (root → monitors → workspaces →
//! splits → windows) and mutates it only through typed commands:
//!
//! ```text
//!  native adapters ──Event──► TilingActor ──► TilingManager
//!                                               │  invoke(Command)
//!                                               ▼
//!                                            handlers ──► ContainerService
//!                                               │              │ dirty set
//!                                               ▼              ▼
//!                                            EventBus ◄── RedrawContainers
//!                                               │              │
//!                                    policies (subscribers)    ▼
//!                                                          EffectSink
//! ```
//!
//! Policies react to events by invoking more commands on the same thread;
//! effects leave in one batch once the outermost command has settled.
//!
//! # Usage
//!
//! ```rust,ignore
//! use trellis_lib::tiling::{self, ChannelSink, Command, Direction};
//!
//! let (sink, mut effects) = ChannelSink::new();
//! let (handle, _task) = tiling::start(config, Box::new(sink), monitors, windows)?;
//!
//! handle.invoke(Command::MoveFocusedWindow { direction: Direction::Left }).await?;
//! ```

pub mod actor;
pub mod bus;
pub mod commands;
pub mod constants;
pub mod effects;
pub mod error;
pub mod events;
pub mod handlers;
pub mod init;
pub mod layout;
pub mod manager;
pub mod policies;
pub mod rules;
pub mod service;
pub mod state;

pub use actor::{ActorError, ActorMessage, TilingActor, TilingHandle};
pub use bus::{EventBus, EventSubscriber, SubscriptionId};
pub use commands::{Command, Outcome};
pub use effects::{ChannelSink, EffectSink, RecordingSink, SideEffect};
pub use error::{TilingError, TilingResult};
pub use events::{Event, EventKind};
pub use init::{build, start, watch_config};
pub use manager::TilingManager;
pub use service::ContainerService;
pub use state::{
    ContainerId, ContainerKind, ContainerTree, Direction, InsertPosition, MonitorInfo,
    MouseButtons, Point, Rect, TilingDirection, TreeSnapshot, WindowHandle, WindowInfo,
    WindowSeed,
};
