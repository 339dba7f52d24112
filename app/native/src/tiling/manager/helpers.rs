//! Helper functions for the tiling manager.
//!
//! Share math for resizing and panic payload formatting for the dispatch
//! boundary.

use std::any::Any;

use crate::tiling::constants::layout::MIN_SHARE;

/// Converts weights into shares that sum to `1.0`.
///
/// Non-finite or non-positive weights count as `1.0`, matching the layout.
#[allow(clippy::cast_precision_loss)] // child counts won't exceed f64 precision
pub fn shares_from_weights(weights: &[f64]) -> Vec<f64> {
    let sanitized: Vec<f64> = weights
        .iter()
        .map(|&weight| if weight.is_finite() && weight > 0.0 { weight } else { 1.0 })
        .collect();
    let total: f64 = sanitized.iter().sum();
    if total <= 0.0 {
        return vec![1.0 / weights.len().max(1) as f64; weights.len()];
    }
    sanitized.into_iter().map(|weight| weight / total).collect()
}

/// Grows (or shrinks) one share and rescales the others to compensate.
///
/// The resized share stays within `[MIN_SHARE, 1 - MIN_SHARE * (n - 1)]`,
/// and at `MIN_SHARE` once `n` is too large for that range to exist.
/// The remainder is split among the other entries in proportion to their
/// current shares.
///
/// # Arguments
///
/// * `shares` - Current shares, summing to `1.0`
/// * `index` - Entry being resized
/// * `amount` - Fraction of the whole to add (negative to shrink)
#[allow(clippy::cast_precision_loss)] // child counts won't exceed f64 precision
pub fn resize_share(shares: &[f64], index: usize, amount: f64) -> Vec<f64> {
    let count = shares.len();
    if count < 2 || index >= count {
        return shares.to_vec();
    }

    // Past 1 / MIN_SHARE entries the floors alone exceed the whole.
    let max_share = MIN_SHARE.mul_add(-((count - 1) as f64), 1.0).max(MIN_SHARE);
    let resized = (shares[index] + amount).clamp(MIN_SHARE, max_share);
    let old_rest = 1.0 - shares[index];
    let new_rest = 1.0 - resized;

    shares
        .iter()
        .enumerate()
        .map(|(i, &share)| {
            if i == index {
                resized
            } else if old_rest <= f64::EPSILON {
                new_rest / (count - 1) as f64
            } else {
                share / old_rest * new_rest
            }
        })
        .collect()
}

/// Extracts a readable message from a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
