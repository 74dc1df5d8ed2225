//! Messages exchanged between the host thread and the worker.

use std::fmt;
use std::sync::mpsc::Sender;

use crate::color::HighlightColor;
use crate::geometry::Rect;
use crate::instance::InstanceId;
use crate::render_loop::LoopState;
use crate::surface::DrawSurface;

/// Tagged message accepted by the worker.
pub enum WorkerMessage {
    /// Bind a surface (moved, not shared) and begin the render loop.
    Start {
        surface: Box<dyn DrawSurface>,
        color: HighlightColor,
    },
    /// A visible region of `instance_id` re-rendered.
    AddItem { instance_id: InstanceId, region: Rect },
    /// The instance was torn down; forget its regions.
    DeleteItem { instance_id: InstanceId },
    /// Cancel the loop, release the surface and clear all state.
    Stop,
    /// Reply with the worker's current state.
    Snapshot(Sender<WorkerSnapshot>),
    /// Exit the worker thread.
    Shutdown,
}

impl WorkerMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::AddItem { .. } => "addItem",
            Self::DeleteItem { .. } => "deleteItem",
            Self::Stop => "stop",
            Self::Snapshot(_) => "snapshot",
            Self::Shutdown => "shutdown",
        }
    }
}

impl fmt::Debug for WorkerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start { surface, color } => f
                .debug_struct("Start")
                .field("surface_size", &surface.size())
                .field("color", color)
                .finish(),
            Self::AddItem { instance_id, region } => f
                .debug_struct("AddItem")
                .field("instance_id", instance_id)
                .field("region", region)
                .finish(),
            Self::DeleteItem { instance_id } => f
                .debug_struct("DeleteItem")
                .field("instance_id", instance_id)
                .finish(),
            other => f.write_str(other.kind()),
        }
    }
}

/// Point-in-time view of the worker, for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSnapshot {
    pub state: LoopState,
    pub has_surface: bool,
    pub frames_painted: u64,
    pub instance_count: usize,
    pub region_count: usize,
}
