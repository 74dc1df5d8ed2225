//! Time-based opacity for highlight regions.

/// Default fade window in milliseconds.
pub const DEFAULT_FADE_DURATION_MS: f64 = 500.0;

/// Default opacity cap.
pub const DEFAULT_MAX_ALPHA: f32 = 0.25;

/// Linear ramp from transparent to `max_alpha` over `duration_ms`.
///
/// A region is painted at the cap on its last frame and then removed
/// outright; there is no fade back out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadePolicy {
    pub duration_ms: f64,
    pub max_alpha: f32,
}

impl FadePolicy {
    pub fn new(duration_ms: f64, max_alpha: f32) -> Self {
        Self { duration_ms, max_alpha }
    }

    /// Fill opacity after `elapsed` milliseconds.
    pub fn alpha(&self, elapsed: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return self.max_alpha;
        }
        let progress = (elapsed / self.duration_ms) as f32;
        (progress * self.max_alpha).clamp(0.0, self.max_alpha)
    }

    /// Strictly past the fade window: at exactly `duration_ms` the region is
    /// still painted at `max_alpha` and expires on the following paint.
    pub fn is_expired(&self, elapsed: f64) -> bool {
        elapsed > self.duration_ms
    }
}

impl Default for FadePolicy {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_FADE_DURATION_MS,
            max_alpha: DEFAULT_MAX_ALPHA,
        }
    }
}
