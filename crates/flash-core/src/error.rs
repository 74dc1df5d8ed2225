//! Error types for the highlight engine.

use thiserror::Error;

/// Result type for highlight engine operations.
pub type Result<T> = std::result::Result<T, FlashError>;

/// Errors that can occur while driving the overlay.
///
/// None of these are fatal to the host application; the controller logs
/// them and keeps going without highlights.
#[derive(Error, Debug)]
pub enum FlashError {
    /// The drawing surface could not be created or is unusable.
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// A color string could not be parsed.
    #[error("invalid highlight color {0:?}")]
    InvalidColor(String),

    /// The worker thread could not be spawned.
    #[error("failed to spawn worker thread: {0}")]
    WorkerSpawn(#[from] std::io::Error),

    /// The worker thread has exited and no longer accepts messages.
    #[error("worker thread disconnected")]
    WorkerDisconnected,
}
