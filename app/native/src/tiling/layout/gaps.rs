//! Gap handling for layouts.

use crate::config::GapsConfig;
use crate::tiling::state::Rect;

/// Resolved gap values for layout calculations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Gaps {
    /// Gap between adjacent children of a container.
    pub inner: f64,
    /// Gap between a workspace and its monitor's edges.
    pub outer: f64,
}

impl Gaps {
    /// Creates gaps with the given inner and outer values.
    #[must_use]
    pub const fn uniform(inner: f64, outer: f64) -> Self { Self { inner, outer } }

    /// Converts the configured pixel values.
    #[must_use]
    pub fn from_config(config: &GapsConfig) -> Self {
        Self::uniform(f64::from(config.inner), f64::from(config.outer))
    }

    /// Returns the workspace frame for a monitor's working area.
    #[must_use]
    pub fn apply_outer(&self, monitor_rect: &Rect) -> Rect { monitor_rect.inset(self.outer) }

    /// Total inner gap consumed by `count` children laid out along an axis.
    #[allow(clippy::cast_precision_loss)] // child counts won't exceed f64 precision
    #[must_use]
    pub fn total_inner(&self, count: usize) -> f64 { self.inner * count.saturating_sub(1) as f64 }
}
