//! Non-owning node handles and the generational arena hosts can store nodes in.
//!
//! The host framework owns its nodes. The overlay only ever keeps a
//! [`NodeHandle`], which goes stale as soon as the node is removed from its
//! arena, so a queued node that was destroyed before the next frame resolves
//! to nothing instead of keeping the node alive.

use std::fmt;

/// A weak handle to a host node.
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a node is removed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl NodeHandle {
    /// Build a handle from raw parts, for hosts that keep their own storage.
    pub const fn from_raw(idx: u32, generation: u32) -> Self {
        Self { idx, generation }
    }

    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    pub const fn index(self) -> u32 {
        self.idx
    }

    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeHandle({}@gen{})", self.idx, self.generation)
    }
}

/// What kind of node a component rendered as its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A regular element with a bounding box.
    Element,
    /// A text node; the component's boxes are the element siblings that follow it.
    Text,
    /// A placeholder comment emitted before the real content is mounted.
    Comment,
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generational arena owning host nodes.
pub struct NodeArena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> NodeArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Insert a node and return a handle to it.
    pub fn insert(&mut self, value: T) -> NodeHandle {
        self.len += 1;
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.value = Some(value);
            return NodeHandle { idx, generation: slot.generation };
        }

        let idx = self.slots.len() as u32;
        self.slots.push(Slot { generation: 0, value: Some(value) });
        NodeHandle { idx, generation: 0 }
    }

    /// Remove the node behind `handle`, invalidating every copy of the handle.
    pub fn remove(&mut self, handle: NodeHandle) -> Option<T> {
        let slot = self.slots.get_mut(handle.idx as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.idx);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, handle: NodeHandle) -> Option<&T> {
        self.slots
            .get(handle.idx as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.idx as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Liveness check used when draining queued handles.
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for NodeArena<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeArena")
            .field("len", &self.len)
            .field("capacity", &self.slots.len())
            .finish()
    }
}
