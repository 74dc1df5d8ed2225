use std::sync::Arc;

use parking_lot::Mutex;

use super::{DrawSurface, SurfaceFactory, SurfaceSpec};
use crate::color::HighlightColor;
use crate::error::{FlashError, Result};
use crate::geometry::Rect;

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Fill { rect: Rect, color: HighlightColor, alpha: f32 },
    Stroke { rect: Rect, color: HighlightColor, line_width: f32 },
    Present,
}

/// Shared view of everything a [`RecordingSurface`] was asked to draw.
///
/// Cloning is cheap; all clones observe the same log, so the surface can be
/// moved to the worker while the host keeps reading from its copy.
#[derive(Debug, Clone, Default)]
pub struct DrawLog {
    ops: Arc<Mutex<Vec<DrawOp>>>,
}

impl DrawLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, op: DrawOp) {
        self.ops.lock().push(op);
    }

    pub fn ops(&self) -> Vec<DrawOp> {
        self.ops.lock().clone()
    }

    /// Ops grouped per presented frame, without the trailing `Present`.
    pub fn frames(&self) -> Vec<Vec<DrawOp>> {
        let ops = self.ops.lock();
        let mut frames = Vec::new();
        let mut current = Vec::new();
        for op in ops.iter() {
            match op {
                DrawOp::Present => frames.push(std::mem::take(&mut current)),
                other => current.push(other.clone()),
            }
        }
        frames
    }

    pub fn frame_count(&self) -> usize {
        self.ops.lock().iter().filter(|op| matches!(op, DrawOp::Present)).count()
    }

    /// Fill ops of the last presented frame.
    pub fn last_fills(&self) -> Vec<(Rect, f32)> {
        self.frames()
            .last()
            .map(|frame| {
                frame
                    .iter()
                    .filter_map(|op| match op {
                        DrawOp::Fill { rect, alpha, .. } => Some((*rect, *alpha)),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn reset(&self) {
        self.ops.lock().clear();
    }
}

/// Surface that records draw calls instead of rasterizing them.
#[derive(Debug)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    log: DrawLog,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> (Self, DrawLog) {
        let log = DrawLog::new();
        (Self::with_log(width, height, log.clone()), log)
    }

    pub fn with_log(width: u32, height: u32, log: DrawLog) -> Self {
        Self { width, height, log }
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.log.push(DrawOp::Clear);
    }

    fn fill_rect(&mut self, rect: &Rect, color: HighlightColor, alpha: f32) {
        self.log.push(DrawOp::Fill { rect: *rect, color, alpha });
    }

    fn stroke_rect(&mut self, rect: &Rect, color: HighlightColor, line_width: f32) {
        self.log.push(DrawOp::Stroke { rect: *rect, color, line_width });
    }

    fn present(&mut self) {
        self.log.push(DrawOp::Present);
    }
}

/// Factory handing out [`RecordingSurface`]s that all share one [`DrawLog`].
#[derive(Debug, Default)]
pub struct RecordingFactory {
    log: DrawLog,
    attached: bool,
    created: u32,
    fail: bool,
    specs: Vec<SurfaceSpec>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> DrawLog {
        self.log.clone()
    }

    /// Make every subsequent `create` fail, as when the host cannot provide a surface.
    pub fn set_failing(&mut self, fail: bool) {
        self.fail = fail;
    }

    pub fn created(&self) -> u32 {
        self.created
    }

    /// Specs passed to every successful `create`, oldest first.
    pub fn specs(&self) -> &[SurfaceSpec] {
        &self.specs
    }
}

impl SurfaceFactory for RecordingFactory {
    fn create(&mut self, spec: &SurfaceSpec) -> Result<Box<dyn DrawSurface>> {
        if self.fail {
            return Err(FlashError::SurfaceUnavailable("recording factory set to fail".into()));
        }
        self.created += 1;
        self.attached = true;
        self.specs.push(spec.clone());
        Ok(Box::new(RecordingSurface::with_log(
            spec.viewport.width,
            spec.viewport.height,
            self.log.clone(),
        )))
    }

    fn remove(&mut self) {
        self.attached = false;
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}
