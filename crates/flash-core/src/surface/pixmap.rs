use std::path::PathBuf;

use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::{DrawSurface, SurfaceFactory, SurfaceSpec};
use crate::color::HighlightColor;
use crate::error::{FlashError, Result};
use crate::geometry::Rect;

/// CPU raster surface backed by a tiny-skia pixmap.
pub struct PixmapSurface {
    pixmap: Pixmap,
    capture: Option<Capture>,
    presented: u64,
}

struct Capture {
    dir: PathBuf,
    every: u64,
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height)
            .ok_or_else(|| FlashError::SurfaceUnavailable(format!("cannot allocate {width}x{height} pixmap")))?;
        Ok(Self {
            pixmap,
            capture: None,
            presented: 0,
        })
    }

    /// Save every `every`th presented frame as `frame-NNNNN.png` under `dir`.
    pub fn with_capture(mut self, dir: impl Into<PathBuf>, every: u32) -> Self {
        if every > 0 {
            self.capture = Some(Capture {
                dir: dir.into(),
                every: u64::from(every),
            });
        }
        self
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    fn paint(color: HighlightColor, alpha: f32) -> Paint<'static> {
        let [r, g, b, a] = color.to_rgba8(alpha);
        let mut paint = Paint::default();
        paint.set_color(Color::from_rgba8(r, g, b, a));
        paint.anti_alias = false;
        paint
    }
}

impl DrawSurface for PixmapSurface {
    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    fn fill_rect(&mut self, rect: &Rect, color: HighlightColor, alpha: f32) {
        // Zero-area fills cover nothing; tiny-skia would still touch a pixel column.
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        let Some(r) = to_skia_rect(rect) else { return };
        let paint = Self::paint(color, alpha);
        self.pixmap.fill_rect(r, &paint, Transform::identity(), None);
    }

    fn stroke_rect(&mut self, rect: &Rect, color: HighlightColor, line_width: f32) {
        let Some(r) = to_skia_rect(rect) else { return };
        let path = PathBuilder::from_rect(r);
        let paint = Self::paint(color, 1.0);
        let stroke = Stroke {
            width: line_width,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    fn present(&mut self) {
        self.presented += 1;
        let Some(capture) = &self.capture else { return };
        if self.presented % capture.every != 0 {
            return;
        }
        let path = capture.dir.join(format!("frame-{:05}.png", self.presented));
        if let Err(e) = self.pixmap.save_png(&path) {
            log::warn!("failed to capture overlay frame to {:?}: {}", path, e);
        }
    }
}

fn to_skia_rect(rect: &Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_xywh(rect.left as f32, rect.top as f32, rect.width as f32, rect.height as f32)
}

/// Factory creating [`PixmapSurface`]s sized to the viewport.
#[derive(Debug, Default)]
pub struct PixmapFactory {
    capture: Option<(PathBuf, u32)>,
    attached: bool,
    created: u32,
}

impl PixmapFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture frames of every surface this factory creates.
    pub fn with_capture(mut self, dir: impl Into<PathBuf>, every: u32) -> Self {
        self.capture = Some((dir.into(), every));
        self
    }

    /// Number of surfaces created so far.
    pub fn created(&self) -> u32 {
        self.created
    }
}

impl SurfaceFactory for PixmapFactory {
    fn create(&mut self, spec: &SurfaceSpec) -> Result<Box<dyn DrawSurface>> {
        let mut surface = PixmapSurface::new(spec.viewport.width, spec.viewport.height)?;
        if let Some((dir, every)) = &self.capture {
            let dir = dir.join(format!("surface-{}", self.created));
            std::fs::create_dir_all(&dir)
                .map_err(|e| FlashError::SurfaceUnavailable(format!("capture dir {:?}: {}", dir, e)))?;
            surface = surface.with_capture(dir, *every);
        }
        log::debug!(
            "created {}x{} overlay surface [data-{}] z={}",
            spec.viewport.width,
            spec.viewport.height,
            spec.marker,
            spec.z_index
        );
        self.created += 1;
        self.attached = true;
        Ok(Box::new(surface))
    }

    fn remove(&mut self) {
        self.attached = false;
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}
