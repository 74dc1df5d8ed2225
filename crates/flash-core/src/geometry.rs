//! Viewport geometry and the visibility filter.

use serde::{Deserialize, Serialize};

/// Rectangle in viewport coordinates, as returned by a bounding-box query.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self { top, left, width, height }
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Size of the visible viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Whether `rect` overlaps the viewport, keeping a 1-unit margin on every side.
///
/// A rect touching the viewport edge from outside (e.g. `bottom == -1`) does not count.
pub fn is_visible(rect: &Rect, viewport: ViewportSize) -> bool {
    let top_threshold = -1.0;
    let bottom_threshold = viewport.height as f64 - 1.0;
    let left_threshold = -1.0;
    let right_threshold = viewport.width as f64 - 1.0;

    rect.top < bottom_threshold
        && rect.bottom() > top_threshold
        && rect.left < right_threshold
        && rect.right() > left_threshold
}
