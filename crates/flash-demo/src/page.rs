//! Simulated host page: a flat list of DOM nodes in a generational arena.

use std::collections::HashMap;

use paintflash::{HostDom, InstanceId, NodeArena, NodeHandle, NodeKind, Rect, ViewportSize};

pub struct SimNode {
    pub kind: NodeKind,
    pub owner: Option<InstanceId>,
    pub rect: Rect,
    pub next: Option<NodeHandle>,
}

pub struct SimDom {
    nodes: NodeArena<SimNode>,
    roots: HashMap<InstanceId, NodeHandle>,
    viewport: ViewportSize,
}

impl SimDom {
    pub fn new(viewport: ViewportSize) -> Self {
        Self {
            nodes: NodeArena::new(),
            roots: HashMap::new(),
            viewport,
        }
    }

    pub fn add(&mut self, kind: NodeKind, rect: Rect) -> NodeHandle {
        self.nodes.insert(SimNode {
            kind,
            owner: None,
            rect,
            next: None,
        })
    }

    /// Make `next` the element sibling following `node`.
    pub fn link(&mut self, node: NodeHandle, next: NodeHandle) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.next = Some(next);
        }
    }

    pub fn remove(&mut self, node: NodeHandle) {
        self.nodes.remove(node);
    }

    pub fn translate(&mut self, node: NodeHandle, dx: f64, dy: f64) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.rect.left += dx;
            n.rect.top += dy;
        }
    }

    /// Tag `nodes` as rendered by `id` and make the first one its root.
    pub fn adopt(&mut self, id: &InstanceId, nodes: &[NodeHandle]) {
        for node in nodes {
            if let Some(n) = self.nodes.get_mut(*node) {
                n.owner = Some(id.clone());
            }
        }
        if let Some(root) = nodes.first() {
            self.roots.insert(id.clone(), *root);
        }
    }

    pub fn set_root(&mut self, id: &InstanceId, root: NodeHandle) {
        self.roots.insert(id.clone(), root);
    }

    pub fn forget(&mut self, id: &InstanceId) {
        self.roots.remove(id);
    }

    pub fn resize(&mut self, viewport: ViewportSize) {
        self.viewport = viewport;
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl HostDom for SimDom {
    fn node_kind(&self, node: NodeHandle) -> Option<NodeKind> {
        self.nodes.get(node).map(|n| n.kind)
    }

    fn next_element_sibling(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(node).and_then(|n| n.next)
    }

    fn owner_instance(&self, node: NodeHandle) -> Option<InstanceId> {
        self.nodes.get(node).and_then(|n| n.owner.clone())
    }

    fn instance_root(&self, id: &InstanceId) -> Option<NodeHandle> {
        self.roots.get(id).copied()
    }

    fn measure(&self, node: NodeHandle) -> Option<Rect> {
        self.nodes.get(node).map(|n| n.rect)
    }

    fn viewport_size(&self) -> ViewportSize {
        self.viewport
    }
}
