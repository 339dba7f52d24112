//! Internal constants for tiling window manager tuning.
//!
//! This module centralizes the magic numbers used throughout the tiling core.
//!
//! # Organization
//!
//! Constants are grouped by functionality:
//! - `timing` - Rate limits and debouncing
//! - `layout` - Layout calculation thresholds
//! - `dispatch` - Command bus and runtime limits

/// Timing constants for event handling.
pub mod timing {
    /// Minimum interval between processed mouse-move samples (ms).
    ///
    /// Native mouse hooks fire for every pixel of movement; focus-follows-cursor
    /// only needs a handful of samples per second.
    pub const MOUSE_SAMPLE_INTERVAL_MS: u64 = 50;
}

/// Layout calculation thresholds.
pub mod layout {
    /// Smallest share of its parent's axis a resized container may keep.
    pub const MIN_SHARE: f64 = 0.05;

    /// Tolerance for geometry comparisons (pixels).
    pub const RECT_EPSILON: f64 = 0.5;
}

/// Command bus and runtime limits.
pub mod dispatch {
    /// Maximum nesting of re-entrant command invocations.
    ///
    /// A policy that keeps invoking commands from inside handlers would
    /// otherwise recurse until the stack overflows.
    pub const MAX_INVOKE_DEPTH: usize = 32;

    /// Maximum rounds of event delivery per settle.
    ///
    /// Subscribers that emit events in response to every event would
    /// otherwise never let the queue drain.
    pub const MAX_SETTLE_ROUNDS: usize = 64;

    /// Capacity of the runtime's inbound message channel.
    pub const ACTOR_CHANNEL_CAPACITY: usize = 256;
}

// ============================================================================
// Tests
// ============================================================================
