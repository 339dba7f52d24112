//! Trellis - a tiling window manager core.
//!
//! The library holds the container tree, the command/event bus, the command
//! handlers and the reactive policies behind a serialized tokio actor. Native
//! window-system adapters feed it events and execute the side effects it
//! emits; the `trellis` binary replays scenarios through it.

pub mod cli;
pub mod config;
pub mod error;
pub mod tiling;
