//! flash-core: paint-flashing overlay engine.
//!
//! The host thread runs the [`FlashController`]: render hooks queue node
//! handles in the region registry, each animation frame measures them and
//! posts visible rectangles to the [`FlashWorker`]. The worker owns the
//! coalescing store and the overlay surface and paints fading highlights.

mod color;
pub use color::HighlightColor;

mod controller;
pub use controller::{DEFAULT_CANVAS_IDENTIFIER, DEFAULT_INSTANCE_IDENTIFIER, FlashController, OverlaySettings};

mod debounce;
pub use debounce::Debouncer;

mod error;
pub use error::{FlashError, Result};

mod fade;
pub use fade::{DEFAULT_FADE_DURATION_MS, DEFAULT_MAX_ALPHA, FadePolicy};

mod geometry;
pub use geometry::{Rect, ViewportSize, is_visible};

mod host;
pub use host::{HostDom, LifecycleHooks};

mod input;
pub use input::{KeyCombo, KeyEvent, Modifiers};

mod instance;
pub use instance::{InstanceId, InstanceSlot};

mod message;
pub use message::{WorkerMessage, WorkerSnapshot};

mod node;
pub use node::{NodeArena, NodeHandle, NodeKind};

mod registry;
pub use registry::RegionRegistry;

mod render_loop;
pub use render_loop::{Flow, LoopState, RenderLoop, RenderSettings};

mod store;
pub use store::{CoalescingStore, HighlightRegion, Visit};

pub mod surface;
pub use surface::{DrawSurface, SurfaceFactory, SurfaceSpec};

mod worker;
pub use worker::{FlashWorker, WorkerConfig};
