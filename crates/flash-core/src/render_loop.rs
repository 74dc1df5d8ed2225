//! Per-frame highlight painting.
//!
//! The render loop owns the coalescing store and the bound surface. It is
//! driven by the worker thread, which feeds it messages as they arrive and
//! calls [`RenderLoop::frame`] whenever a scheduled frame comes due.
//!
//! ```text
//! Idle --start--> Scheduled --frame--> Draining --> Painting --> Scheduled
//!   ^                                                               |
//!   +---------------------------- stop -----------------------------+
//! ```

use crate::color::HighlightColor;
use crate::fade::FadePolicy;
use crate::message::{WorkerMessage, WorkerSnapshot};
use crate::store::{CoalescingStore, Visit};
use crate::surface::DrawSurface;

/// Render loop scheduling state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    /// No frame pending.
    #[default]
    Idle,
    /// One frame callback pending.
    Scheduled,
    /// Applying messages that arrived since the previous frame.
    Draining,
    /// Drawing and expiring regions.
    Painting,
}

/// Whether the worker should keep running after a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Shutdown,
}

/// Paint parameters fixed for the lifetime of a worker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub fade: FadePolicy,
    pub line_width: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            fade: FadePolicy::default(),
            line_width: 1.0,
        }
    }
}

pub struct RenderLoop {
    state: LoopState,
    surface: Option<Box<dyn DrawSurface>>,
    color: HighlightColor,
    store: CoalescingStore,
    settings: RenderSettings,
    frames_painted: u64,
}

impl RenderLoop {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            state: LoopState::Idle,
            surface: None,
            color: HighlightColor::default(),
            store: CoalescingStore::new(),
            settings,
            frames_painted: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_scheduled(&self) -> bool {
        self.state == LoopState::Scheduled
    }

    pub fn store(&self) -> &CoalescingStore {
        &self.store
    }

    pub fn frames_painted(&self) -> u64 {
        self.frames_painted
    }

    pub fn snapshot(&self) -> WorkerSnapshot {
        WorkerSnapshot {
            state: self.state,
            has_surface: self.surface.is_some(),
            frames_painted: self.frames_painted,
            instance_count: self.store.instance_count(),
            region_count: self.store.region_count(),
        }
    }

    /// Apply one message.
    pub fn handle(&mut self, message: WorkerMessage) -> Flow {
        log::trace!("worker message: {:?}", message);
        match message {
            WorkerMessage::Start { surface, color } => self.start(surface, color),
            WorkerMessage::AddItem { instance_id, region } => {
                if self.surface.is_none() {
                    log::trace!("dropping region for {} while stopped", instance_id);
                } else {
                    self.store.insert_regions(&instance_id, [region]);
                }
            }
            WorkerMessage::DeleteItem { instance_id } => {
                self.store.clear_instance(&instance_id);
            }
            WorkerMessage::Stop => self.stop(),
            WorkerMessage::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            WorkerMessage::Shutdown => return Flow::Shutdown,
        }
        Flow::Continue
    }

    /// Bind `surface` and schedule the first frame.
    ///
    /// An unusable surface leaves the loop as it was. Starting twice rebinds
    /// the surface without scheduling a second frame.
    pub fn start(&mut self, surface: Box<dyn DrawSurface>, color: HighlightColor) {
        if !surface.is_ready() {
            log::warn!("ignoring start with unusable {:?} surface", surface.size());
            return;
        }
        if self.surface.is_some() {
            log::debug!("render loop already started, rebinding surface");
        }
        self.surface = Some(surface);
        self.color = color;
        if self.state == LoopState::Idle {
            self.state = LoopState::Scheduled;
        }
    }

    /// Revoke the pending frame, drop the surface and forget every region.
    pub fn stop(&mut self) {
        if self.state != LoopState::Idle {
            log::debug!("render loop stopped after {} frames", self.frames_painted);
        }
        self.state = LoopState::Idle;
        self.surface = None;
        self.store.clear_all();
    }

    /// Run one scheduled frame at `timestamp` (milliseconds).
    ///
    /// `pending` holds messages that arrived since the previous frame. A frame
    /// that is no longer scheduled, or that is stopped while draining, paints
    /// nothing.
    pub fn frame(&mut self, timestamp: f64, pending: impl IntoIterator<Item = WorkerMessage>) -> Flow {
        if self.state != LoopState::Scheduled {
            return Flow::Continue;
        }

        self.state = LoopState::Draining;
        for message in pending {
            if self.handle(message) == Flow::Shutdown {
                return Flow::Shutdown;
            }
        }
        if self.state != LoopState::Draining {
            return Flow::Continue;
        }

        self.state = LoopState::Painting;
        self.paint(timestamp);
        self.state = LoopState::Scheduled;
        Flow::Continue
    }

    fn paint(&mut self, timestamp: f64) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let fade = self.settings.fade;
        let line_width = self.settings.line_width;
        let color = self.color;

        surface.clear();
        self.store.visit_all(|_, region| {
            let elapsed = region.elapsed_at(timestamp);
            surface.fill_rect(&region.rect, color, fade.alpha(elapsed));
            surface.stroke_rect(&region.rect, color, line_width);
            if fade.is_expired(elapsed) {
                Visit::Expire
            } else {
                Visit::Keep
            }
        });
        surface.present();

        self.frames_painted += 1;
        log::trace!("frame {} at {:.1}ms: {} regions", self.frames_painted, timestamp, self.store.region_count());
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}
