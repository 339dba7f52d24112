//! Reactive policies.
//!
//! Each policy is an [`EventSubscriber`] that turns inbound or core events
//! into commands. Policies keep no tree state of their own; they read the
//! manager's current config snapshot on every event.

mod auto_tiling;
mod border;
mod cursor;
mod lifecycle;
mod sampler;

pub use auto_tiling::{AutoTilingPolicy, automatic_direction};
pub use border::BorderPolicy;
pub use cursor::{CursorFollowsFocusPolicy, FocusFollowsCursorPolicy, window_at};
pub use lifecycle::LifecyclePolicy;
pub use sampler::MouseSampler;

use super::bus::EventSubscriber;

/// The built-in subscribers, in delivery order.
#[must_use]
pub fn default_subscribers() -> Vec<Box<dyn EventSubscriber>> {
    vec![
        Box::new(LifecyclePolicy),
        Box::new(BorderPolicy),
        Box::new(AutoTilingPolicy),
        Box::new(FocusFollowsCursorPolicy::default()),
        Box::new(CursorFollowsFocusPolicy),
    ]
}
