//! Region registry: nodes queued for highlighting since the last frame.
//!
//! Lives on the host thread. Render hooks enqueue node handles and the
//! controller drains everything once per animation frame, so producer and
//! consumer never interleave.

use std::collections::HashMap;

use crate::instance::InstanceId;
use crate::node::NodeHandle;

/// Per-instance queues of weak node handles.
#[derive(Debug, Default)]
pub struct RegionRegistry {
    queues: HashMap<InstanceId, Vec<NodeHandle>>,
}

impl RegionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty queue for `id` unless one exists.
    pub fn register(&mut self, id: &InstanceId) {
        if self.queues.contains_key(id) {
            return;
        }
        self.queues.insert(id.clone(), Vec::new());
    }

    /// Queue handles in front of those already waiting.
    ///
    /// Returns `false` (and queues nothing) when `id` was never registered.
    pub fn enqueue(&mut self, id: &InstanceId, handles: impl IntoIterator<Item = NodeHandle>) -> bool {
        let Some(queue) = self.queues.get_mut(id) else {
            return false;
        };
        let mut fresh: Vec<NodeHandle> = handles.into_iter().collect();
        fresh.append(queue);
        *queue = fresh;
        true
    }

    /// Take every queued handle, leaving all queues empty.
    ///
    /// Handles for which `is_alive` returns false are dropped. Every
    /// registered instance is present in the result, possibly with no nodes.
    pub fn drain_all(&mut self, is_alive: impl Fn(NodeHandle) -> bool) -> HashMap<InstanceId, Vec<NodeHandle>> {
        self.queues
            .iter_mut()
            .map(|(id, queue)| {
                let live: Vec<NodeHandle> = queue.drain(..).filter(|h| is_alive(*h)).collect();
                (id.clone(), live)
            })
            .collect()
    }

    /// Drop the queue for an instance that was torn down.
    pub fn remove(&mut self, id: &InstanceId) -> bool {
        self.queues.remove(id).is_some()
    }

    pub fn clear(&mut self) {
        self.queues.clear();
    }

    pub fn contains(&self, id: &InstanceId) -> bool {
        self.queues.contains_key(id)
    }

    /// Queued handles for `id`, most recent first.
    pub fn queued(&self, id: &InstanceId) -> &[NodeHandle] {
        self.queues.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of registered instances.
    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }
}
