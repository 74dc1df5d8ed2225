//! Worker thread owning the render loop.
//!
//! The host never touches the coalescing store or the surface directly; it
//! only posts [`WorkerMessage`]s, so per-frame painting cannot stall host
//! rendering or event handling.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::color::HighlightColor;
use crate::error::{FlashError, Result};
use crate::geometry::Rect;
use crate::instance::InstanceId;
use crate::message::{WorkerMessage, WorkerSnapshot};
use crate::render_loop::{Flow, RenderLoop, RenderSettings};
use crate::surface::DrawSurface;

const WORKER_THREAD_NAME: &str = "paintflash-worker";

/// Worker configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkerConfig {
    /// Delay between scheduled frames.
    pub frame_interval: Duration,
    pub settings: RenderSettings,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(16),
            settings: RenderSettings::default(),
        }
    }
}

/// Handle to the worker thread.
///
/// Dropping it shuts the thread down and waits for it to exit.
pub struct FlashWorker {
    sender: Sender<WorkerMessage>,
    join: Option<JoinHandle<()>>,
}

impl FlashWorker {
    pub fn spawn(config: WorkerConfig) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let join = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_worker(rx, config))?;

        log::debug!("spawned {} ({:?} frames)", WORKER_THREAD_NAME, config.frame_interval);
        Ok(Self {
            sender: tx,
            join: Some(join),
        })
    }

    pub fn post(&self, message: WorkerMessage) -> Result<()> {
        self.sender.send(message).map_err(|_| FlashError::WorkerDisconnected)
    }

    pub fn start(&self, surface: Box<dyn DrawSurface>, color: HighlightColor) -> Result<()> {
        self.post(WorkerMessage::Start { surface, color })
    }

    pub fn add_item(&self, instance_id: InstanceId, region: Rect) -> Result<()> {
        self.post(WorkerMessage::AddItem { instance_id, region })
    }

    pub fn delete_item(&self, instance_id: InstanceId) -> Result<()> {
        self.post(WorkerMessage::DeleteItem { instance_id })
    }

    pub fn stop(&self) -> Result<()> {
        self.post(WorkerMessage::Stop)
    }

    /// Ask the worker for its state and wait for the reply.
    ///
    /// The reply is sent after every message posted before this call has
    /// been applied, so it doubles as a barrier.
    pub fn snapshot(&self) -> Result<WorkerSnapshot> {
        let (tx, rx) = mpsc::channel();
        self.post(WorkerMessage::Snapshot(tx))?;
        rx.recv().map_err(|_| FlashError::WorkerDisconnected)
    }

    /// Stop the thread and wait for it to exit.
    pub fn shutdown(mut self) {
        self.join_thread();
    }

    fn join_thread(&mut self) {
        if let Some(join) = self.join.take() {
            let _ = self.sender.send(WorkerMessage::Shutdown);
            if join.join().is_err() {
                log::warn!("{} panicked", WORKER_THREAD_NAME);
            }
        }
    }
}

impl Drop for FlashWorker {
    fn drop(&mut self) {
        self.join_thread();
    }
}

fn frame_timestamp(epoch: Instant) -> f64 {
    epoch.elapsed().as_secs_f64() * 1000.0
}

fn run_worker(rx: Receiver<WorkerMessage>, config: WorkerConfig) {
    let epoch = Instant::now();
    let mut render_loop = RenderLoop::new(config.settings);
    let mut next_frame: Option<Instant> = None;

    loop {
        let message = if render_loop.is_scheduled() {
            let deadline = *next_frame.get_or_insert_with(|| Instant::now() + config.frame_interval);
            let now = Instant::now();
            if now >= deadline {
                next_frame = None;
                let pending: Vec<WorkerMessage> = rx.try_iter().collect();
                if render_loop.frame(frame_timestamp(epoch), pending) == Flow::Shutdown {
                    break;
                }
                continue;
            }
            match rx.recv_timeout(deadline - now) {
                Ok(message) => message,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        } else {
            // Stopped: any pending frame is revoked.
            next_frame = None;
            match rx.recv() {
                Ok(message) => message,
                Err(_) => break,
            }
        };

        if render_loop.handle(message) == Flow::Shutdown {
            break;
        }
    }

    log::debug!("{} exiting after {} frames", WORKER_THREAD_NAME, render_loop.frames_painted());
}
