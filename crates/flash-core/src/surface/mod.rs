//! Drawing surfaces the render loop paints highlights onto.
//!
//! A surface is created on the host thread by a [`SurfaceFactory`] and then
//! moved into the worker, which becomes its only user.

mod pixmap;
mod recording;

pub use pixmap::{PixmapFactory, PixmapSurface};
pub use recording::{DrawLog, DrawOp, RecordingFactory, RecordingSurface};

use crate::color::HighlightColor;
use crate::error::Result;
use crate::geometry::{Rect, ViewportSize};

/// Immediate-mode 2D target for highlight rectangles.
pub trait DrawSurface: Send {
    /// Pixel size of the surface.
    fn size(&self) -> (u32, u32);

    /// Erase everything drawn so far.
    fn clear(&mut self);

    /// Fill `rect` with `color` at `alpha` times the color's own opacity.
    fn fill_rect(&mut self, rect: &Rect, color: HighlightColor, alpha: f32);

    /// Stroke the border of `rect` at the color's full opacity.
    fn stroke_rect(&mut self, rect: &Rect, color: HighlightColor, line_width: f32);

    /// Called once at the end of every painted frame.
    fn present(&mut self) {}

    /// A zero-sized surface cannot be drawn to.
    fn is_ready(&self) -> bool {
        let (w, h) = self.size();
        w > 0 && h > 0
    }
}

/// How the host should create the overlay surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSpec {
    /// Surface size, matching the viewport.
    pub viewport: ViewportSize,
    /// Stacking order above the host content.
    pub z_index: i32,
    /// Marker attribute so the surface can be found and removed later.
    pub marker: String,
}

/// Host capability that creates and removes the overlay surface.
pub trait SurfaceFactory {
    /// Create and attach a surface, returning the drawable half to hand to the worker.
    fn create(&mut self, spec: &SurfaceSpec) -> Result<Box<dyn DrawSurface>>;

    /// Detach the surface created last, if any.
    fn remove(&mut self);

    /// Whether a surface is currently attached to the host.
    fn is_attached(&self) -> bool;
}
