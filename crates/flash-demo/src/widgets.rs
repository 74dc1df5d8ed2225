//! Simulated components, each exercising one kind of render root.

use std::collections::HashMap;

use paintflash::{InstanceId, LifecycleHooks, NodeHandle, NodeKind, Rect};

use crate::page::SimDom;

pub trait Widget {
    fn name(&self) -> &'static str;
    fn mount(&mut self, dom: &mut SimDom, hooks: &mut dyn LifecycleHooks);
    fn frame(&mut self, frame: u32, dom: &mut SimDom, hooks: &mut dyn LifecycleHooks);
    fn renders(&self) -> u32;
}

/// Per-instance slot plus render bookkeeping shared by every widget.
struct Instance {
    key: String,
    slot: HashMap<String, InstanceId>,
    renders: u32,
}

impl Instance {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            slot: HashMap::new(),
            renders: 0,
        }
    }

    fn create(&mut self, hooks: &mut dyn LifecycleHooks) {
        hooks.on_before_create(&mut self.slot);
    }

    fn render(&mut self, dom: &mut SimDom, hooks: &mut dyn LifecycleHooks, root: NodeHandle, nodes: &[NodeHandle]) {
        if let Some(id) = self.id() {
            dom.adopt(&id, nodes);
        }
        hooks.on_render_triggered(&mut self.slot, &*dom, root);
        // The id may have been minted by this render.
        if let Some(id) = self.id() {
            dom.adopt(&id, nodes);
        }
        self.renders += 1;
    }

    fn unmount(&mut self, dom: &mut SimDom, hooks: &mut dyn LifecycleHooks) {
        if let Some(id) = self.id() {
            dom.forget(&id);
        }
        hooks.on_unmounted(&mut self.slot);
        self.slot.clear();
    }

    fn id(&self) -> Option<InstanceId> {
        self.slot.get(&self.key).cloned()
    }
}

/// An element re-rendering on a fixed period.
pub struct Periodic {
    name: &'static str,
    rect: Rect,
    period: u32,
    node: Option<NodeHandle>,
    instance: Instance,
}

impl Periodic {
    pub fn new(name: &'static str, key: &str, rect: Rect, period: u32) -> Self {
        Self {
            name,
            rect,
            period: period.max(1),
            node: None,
            instance: Instance::new(key),
        }
    }
}

impl Widget for Periodic {
    fn name(&self) -> &'static str {
        self.name
    }

    fn mount(&mut self, dom: &mut SimDom, hooks: &mut dyn LifecycleHooks) {
        self.instance.create(hooks);
        let node = dom.add(NodeKind::Element, self.rect);
        self.node = Some(node);
        self.instance.render(dom, hooks, node, &[node]);
    }

    fn frame(&mut self, frame: u32, dom: &mut SimDom, hooks: &mut dyn LifecycleHooks) {
        let Some(node) = self.node else { return };
        if frame % self.period == 0 {
            self.instance.render(dom, hooks, node, &[node]);
        }
    }

    fn renders(&self) -> u32 {
        self.instance.renders
    }
}

/// An element that slides right a few pixels on every render.
pub struct Mover {
    node: Option<NodeHandle>,
    step: f64,
    instance: Instance,
}

impl Mover {
    pub fn new(key: &str, step: f64) -> Self {
        Self {
            node: None,
            step,
            instance: Instance::new(key),
        }
    }
}

impl Widget for Mover {
    fn name(&self) -> &'static str {
        "ticker"
    }

    fn mount(&mut self, dom: &mut SimDom, hooks: &mut dyn LifecycleHooks) {
        self.instance.create(hooks);
        let node = dom.add(NodeKind::Element, Rect::new(120.0, 20.0, 90.0, 24.0));
        self.node = Some(node);
        self.instance.render(dom, hooks, node, &[node]);
    }

    fn frame(&mut self, frame: u32, dom: &mut SimDom, hooks: &mut dyn LifecycleHooks) {
        let Some(node) = self.node else { return };
        if frame % 4 == 0 {
            dom.translate(node, self.step, 0.0);
            self.instance.render(dom, hooks, node, &[node]);
        }
    }

    fn renders(&self) -> u32 {
        self.instance.renders
    }
}

/// A fragment: a leading text node followed by sibling elements.
pub struct FragmentList {
    nodes: Vec<NodeHandle>,
    items: usize,
    instance: Instance,
}

impl FragmentList {
    pub fn new(key: &str, items: usize) -> Self {
        Self {
            nodes: Vec::new(),
            items,
            instance: Instance::new(key),
        }
    }
}

impl Widget for FragmentList {
    fn name(&self) -> &'static str {
        "list"
    }

    fn mount(&mut self, dom: &mut SimDom, hooks: &mut dyn LifecycleHooks) {
        self.instance.create(hooks);
        let text = dom.add(NodeKind::Text, Rect::new(200.0, 20.0, 0.0, 0.0));
        self.nodes.push(text);
        for i in 0..self.items {
            let item = dom.add(NodeKind::Element, Rect::new(210.0 + 30.0 * i as f64, 20.0, 240.0, 24.0));
            if let Some(prev) = self.nodes.last() {
                dom.link(*prev, item);
            }
            self.nodes.push(item);
        }
        self.instance.render(dom, hooks, text, &self.nodes);
    }

    fn frame(&mut self, frame: u32, dom: &mut SimDom, hooks: &mut dyn LifecycleHooks) {
        if frame % 7 == 0 {
            let text = self.nodes[0];
            self.instance.render(dom, hooks, text, &self.nodes);
        }
    }

    fn renders(&self) -> u32 {
        self.instance.renders
    }
}

/// Renders a placeholder until its content resolves.
pub struct LazyPanel {
    placeholder: Option<NodeHandle>,
    content: Option<NodeHandle>,
    resolve_at: u32,
    instance: Instance,
}

impl LazyPanel {
    pub fn new(key: &str, resolve_at: u32) -> Self {
        Self {
            placeholder: None,
            content: None,
            resolve_at,
            instance: Instance::new(key),
        }
    }
}

impl Widget for LazyPanel {
    fn name(&self) -> &'static str {
        "lazy-panel"
    }

    fn mount(&mut self, dom: &mut SimDom, hooks: &mut dyn LifecycleHooks) {
        self.instance.create(hooks);
        let placeholder = dom.add(NodeKind::Comment, Rect::new(0.0, 0.0, 0.0, 0.0));
        self.placeholder = Some(placeholder);
        self.instance.render(dom, hooks, placeholder, &[placeholder]);
    }

    fn frame(&mut self, frame: u32, dom: &mut SimDom, hooks: &mut dyn LifecycleHooks) {
        let Some(placeholder) = self.placeholder else { return };

        match self.content {
            None if frame == self.resolve_at => {
                // The render fires while the placeholder is still in place; the
                // real root only appears once the host has patched the tree.
                self.instance.render(dom, hooks, placeholder, &[placeholder]);
                let content = dom.add(NodeKind::Element, Rect::new(320.0, 300.0, 160.0, 120.0));
                if let Some(id) = self.instance.id() {
                    dom.adopt(&id, &[content]);
                }
                dom.remove(placeholder);
                self.content = Some(content);
            }
            Some(content) if frame % 9 == 0 => {
                self.instance.render(dom, hooks, content, &[content]);
            }
            _ => {}
        }
    }

    fn renders(&self) -> u32 {
        self.instance.renders
    }
}

/// A notification that flashes rapidly, then unmounts.
pub struct Toast {
    node: Option<NodeHandle>,
    unmount_at: u32,
    instance: Instance,
}

impl Toast {
    pub fn new(key: &str, unmount_at: u32) -> Self {
        Self {
            node: None,
            unmount_at,
            instance: Instance::new(key),
        }
    }
}

impl Widget for Toast {
    fn name(&self) -> &'static str {
        "toast"
    }

    fn mount(&mut self, dom: &mut SimDom, hooks: &mut dyn LifecycleHooks) {
        self.instance.create(hooks);
        let node = dom.add(NodeKind::Element, Rect::new(20.0, 500.0, 260.0, 48.0));
        self.node = Some(node);
        self.instance.render(dom, hooks, node, &[node]);
    }

    fn frame(&mut self, frame: u32, dom: &mut SimDom, hooks: &mut dyn LifecycleHooks) {
        let Some(node) = self.node else { return };
        if frame >= self.unmount_at {
            self.instance.unmount(dom, hooks);
            dom.remove(node);
            self.node = None;
            return;
        }
        if frame % 2 == 0 {
            self.instance.render(dom, hooks, node, &[node]);
        }
    }

    fn renders(&self) -> u32 {
        self.instance.renders
    }
}
