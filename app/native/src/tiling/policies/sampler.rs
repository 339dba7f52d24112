//! Timestamp gate for mouse-move sampling.
//!
//! Cursor moves arrive far more often than focus needs to follow them. The
//! sampler lets one move through per interval and drops the rest.

use std::time::{Duration, Instant};

/// Lets at most one sample through per interval.
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseSampler {
    last_sampled: Option<Instant>,
}

impl MouseSampler {
    #[must_use]
    pub const fn new() -> Self { Self { last_sampled: None } }

    /// Returns `true` if a sample taken at `now` should be processed, and
    /// records it as the last processed sample.
    pub fn should_sample_at(&mut self, now: Instant, interval: Duration) -> bool {
        if let Some(last) = self.last_sampled
            && now.saturating_duration_since(last) < interval
        {
            return false;
        }
        self.last_sampled = Some(now);
        true
    }

    /// Forgets the last sample so the next one always passes.
    pub const fn reset(&mut self) { self.last_sampled = None; }
}
