//! Layout math for the container tree.
//!
//! A Workspace or Split divides its frame among its children along its tiling
//! axis. Each child receives a share proportional to its weight; inner gaps
//! separate neighbours. The cross axis is always filled completely.
//!
//! # Performance
//!
//! Results use `SmallVec` so containers with up to 16 children lay out without
//! heap allocation.

mod gaps;

pub use gaps::Gaps;
use smallvec::SmallVec;

use crate::tiling::state::{Rect, TilingDirection};

/// Inline capacity for layout results.
pub const LAYOUT_INLINE_CAP: usize = 16;

/// Child frames in child order.
pub type LayoutResult = SmallVec<[Rect; LAYOUT_INLINE_CAP]>;

/// Splits `frame` among children with the given weights along `direction`.
///
/// Non-finite or non-positive weights count as `1.0`. The last child ends
/// exactly at the frame edge so rounding never leaves a sliver.
///
/// # Arguments
///
/// * `frame` - The container's frame
/// * `direction` - Axis to divide along
/// * `weights` - One weight per child, in layout order
/// * `gaps` - Gap values (only `inner` is used here)
#[allow(clippy::cast_precision_loss)] // child counts won't exceed f64 precision
#[must_use]
pub fn distribute(
    frame: &Rect,
    direction: TilingDirection,
    weights: &[f64],
    gaps: &Gaps,
) -> LayoutResult {
    if weights.is_empty() {
        return LayoutResult::new();
    }

    let count = weights.len();
    let sanitized: SmallVec<[f64; LAYOUT_INLINE_CAP]> = weights
        .iter()
        .map(|&weight| if weight.is_finite() && weight > 0.0 { weight } else { 1.0 })
        .collect();
    let total_weight: f64 = sanitized.iter().sum();
    let available = (frame.extent(direction) - gaps.total_inner(count)).max(0.0);

    let mut result = LayoutResult::with_capacity(count);
    let mut consumed = 0.0;
    let mut prev_ratio = 0.0;

    for (i, weight) in sanitized.iter().enumerate() {
        consumed += weight;
        let next_ratio = if i + 1 == count { 1.0 } else { consumed / total_weight };
        let start = (i as f64).mul_add(gaps.inner, prev_ratio * available);
        let length = (next_ratio - prev_ratio) * available;

        let rect = match direction {
            TilingDirection::Horizontal => {
                Rect::new(frame.x + start, frame.y, length, frame.height)
            }
            TilingDirection::Vertical => Rect::new(frame.x, frame.y + start, frame.width, length),
        };
        result.push(rect);
        prev_ratio = next_ratio;
    }

    result
}
