//! Host-side lifecycle controller.
//!
//! Owns everything that lives on the host thread: the region registry, the
//! surface factory, toggle and resize handling. Geometry is measured here and
//! only visible rectangles cross over to the worker.

use std::time::{Duration, Instant};

use crate::color::HighlightColor;
use crate::debounce::Debouncer;
use crate::error::Result;
use crate::geometry::{ViewportSize, is_visible};
use crate::host::{HostDom, LifecycleHooks};
use crate::input::{KeyCombo, KeyEvent};
use crate::instance::{InstanceId, InstanceSlot};
use crate::message::WorkerMessage;
use crate::node::{NodeHandle, NodeKind};
use crate::registry::RegionRegistry;
use crate::surface::{SurfaceFactory, SurfaceSpec};
use crate::worker::{FlashWorker, WorkerConfig};

pub const DEFAULT_CANVAS_IDENTIFIER: &str = "vue3_rendering_canvas_identifier";
pub const DEFAULT_INSTANCE_IDENTIFIER: &str = "vue3_rendering_uuid_identifier";

/// Everything the controller needs to know up front.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySettings {
    pub color: HighlightColor,
    pub z_index: i32,
    /// Marker placed on the overlay surface.
    pub canvas_identifier: String,
    /// Slot key under which instance ids are stored.
    pub instance_identifier: String,
    pub toggle: KeyCombo,
    pub resize_debounce: Duration,
    pub worker: WorkerConfig,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            color: HighlightColor::default(),
            z_index: 9999,
            canvas_identifier: DEFAULT_CANVAS_IDENTIFIER.to_string(),
            instance_identifier: DEFAULT_INSTANCE_IDENTIFIER.to_string(),
            toggle: KeyCombo::default(),
            resize_debounce: Duration::from_millis(200),
            worker: WorkerConfig::default(),
        }
    }
}

pub struct FlashController<F: SurfaceFactory> {
    settings: OverlaySettings,
    factory: F,
    worker: FlashWorker,
    registry: RegionRegistry,
    running: bool,
    resize: Debouncer,
    /// Instances whose last render produced only a placeholder root.
    deferred: Vec<InstanceId>,
}

impl<F: SurfaceFactory> FlashController<F> {
    /// Spawn the worker. The overlay starts stopped.
    pub fn new(settings: OverlaySettings, factory: F) -> Result<Self> {
        let worker = FlashWorker::spawn(settings.worker)?;
        let resize = Debouncer::new(settings.resize_debounce);
        Ok(Self {
            settings,
            factory,
            worker,
            registry: RegionRegistry::new(),
            running: false,
            resize,
            deferred: Vec::new(),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    pub fn worker(&self) -> &FlashWorker {
        &self.worker
    }

    pub fn start(&mut self, viewport: ViewportSize) {
        if self.factory.is_attached() {
            log::debug!("overlay already attached");
            return;
        }

        let spec = SurfaceSpec {
            viewport,
            z_index: self.settings.z_index,
            marker: self.settings.canvas_identifier.clone(),
        };
        let surface = match self.factory.create(&spec) {
            Ok(surface) => surface,
            Err(e) => {
                log::warn!("cannot start paint flashing: {}", e);
                return;
            }
        };
        if !surface.is_ready() {
            log::warn!("cannot start paint flashing: unusable {:?} surface", surface.size());
            self.factory.remove();
            return;
        }

        if let Err(e) = self.worker.start(surface, self.settings.color) {
            log::warn!("cannot start paint flashing: {}", e);
            self.factory.remove();
            return;
        }

        log::info!("paint flashing started ({}x{})", viewport.width, viewport.height);
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.post(WorkerMessage::Stop);
        self.factory.remove();
        self.registry.clear();
        self.deferred.clear();
        if self.running {
            log::info!("paint flashing stopped");
        }
        self.running = false;
    }

    pub fn toggle(&mut self, viewport: ViewportSize) {
        if self.factory.is_attached() {
            self.stop();
        } else {
            self.start(viewport);
        }
    }

    /// Toggle on the configured key combo. Returns whether it matched.
    pub fn handle_key(&mut self, event: &KeyEvent, viewport: ViewportSize) -> bool {
        if !self.settings.toggle.matches(event) {
            return false;
        }
        self.toggle(viewport);
        true
    }

    pub fn handle_resize(&mut self, now: Instant) {
        self.resize.call(now);
    }

    /// Run once per host animation frame.
    pub fn tick<D: HostDom + ?Sized>(&mut self, dom: &D, now: Instant) {
        if self.resize.poll(now) {
            let viewport = dom.viewport_size();
            log::debug!("viewport resized to {}x{}", viewport.width, viewport.height);
            self.stop();
            self.start(viewport);
        }

        if !self.running {
            return;
        }

        self.resolve_deferred(dom);

        let viewport = dom.viewport_size();
        let drained = self.registry.drain_all(|node| dom.node_kind(node).is_some());
        for (instance_id, nodes) in drained {
            for node in nodes {
                let Some(region) = dom.measure(node) else {
                    continue;
                };
                if !is_visible(&region, viewport) {
                    continue;
                }
                self.post(WorkerMessage::AddItem {
                    instance_id: instance_id.clone(),
                    region,
                });
            }
        }
    }

    fn resolve_deferred<D: HostDom + ?Sized>(&mut self, dom: &D) {
        for id in std::mem::take(&mut self.deferred) {
            if !self.registry.contains(&id) {
                continue;
            }
            let Some(root) = dom.instance_root(&id) else {
                continue;
            };
            match dom.node_kind(root) {
                Some(NodeKind::Element) => {
                    self.registry.enqueue(&id, [root]);
                }
                Some(NodeKind::Text) => {
                    let nodes = fragment_nodes(dom, &id, root);
                    self.registry.enqueue(&id, nodes);
                }
                Some(NodeKind::Comment) | None => {}
            }
        }
    }

    fn ensure_id(&self, slot: &mut dyn InstanceSlot) -> InstanceId {
        let key = self.settings.instance_identifier.as_str();
        if let Some(id) = slot.get(key) {
            return id;
        }
        let id = InstanceId::mint();
        slot.set(key, id.clone());
        id
    }

    fn post(&self, message: WorkerMessage) {
        let kind = message.kind();
        if let Err(e) = self.worker.post(message) {
            log::warn!("dropped {} message: {}", kind, e);
        }
    }
}

/// Nodes rendered by a fragment whose first root is a text node: the next
/// element sibling, then each following element sibling owned by `id`.
fn fragment_nodes<D: HostDom + ?Sized>(dom: &D, id: &InstanceId, root: NodeHandle) -> Vec<NodeHandle> {
    let Some(first) = dom.next_element_sibling(root) else {
        return Vec::new();
    };

    let mut nodes = vec![first];
    let mut cursor = first;
    while let Some(next) = dom.next_element_sibling(cursor) {
        if dom.owner_instance(next).as_ref() != Some(id) {
            break;
        }
        nodes.push(next);
        cursor = next;
    }
    nodes
}

impl<F: SurfaceFactory> LifecycleHooks for FlashController<F> {
    fn on_before_create(&mut self, slot: &mut dyn InstanceSlot) {
        if !self.running {
            return;
        }
        slot.set(&self.settings.instance_identifier, InstanceId::mint());
    }

    fn on_render_triggered(&mut self, slot: &mut dyn InstanceSlot, dom: &dyn HostDom, root: NodeHandle) {
        if !self.running {
            return;
        }

        let id = self.ensure_id(slot);
        self.registry.register(&id);

        match dom.node_kind(root) {
            Some(NodeKind::Element) => {
                self.registry.enqueue(&id, [root]);
            }
            Some(NodeKind::Text) => {
                let nodes = fragment_nodes(dom, &id, root);
                self.registry.enqueue(&id, nodes);
            }
            Some(NodeKind::Comment) => {
                if !self.deferred.contains(&id) {
                    self.deferred.push(id);
                }
            }
            None => log::trace!("render of {} with a dead root", id),
        }
    }

    fn on_unmounted(&mut self, slot: &mut dyn InstanceSlot) {
        let Some(id) = slot.get(&self.settings.instance_identifier) else {
            return;
        };
        self.registry.remove(&id);
        self.deferred.retain(|deferred| deferred != &id);
        self.post(WorkerMessage::DeleteItem { instance_id: id });
    }
}

impl<F: SurfaceFactory> Drop for FlashController<F> {
    fn drop(&mut self) {
        if self.running {
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::geometry::Rect;
    use crate::input::Modifiers;
    use crate::node::NodeArena;
    use crate::surface::RecordingFactory;

    struct TestNode {
        kind: NodeKind,
        owner: Option<InstanceId>,
        rect: Rect,
        next: Option<NodeHandle>,
    }

    struct TestDom {
        nodes: NodeArena<TestNode>,
        roots: HashMap<InstanceId, NodeHandle>,
        viewport: ViewportSize,
    }

    impl TestDom {
        fn new() -> Self {
            Self {
                nodes: NodeArena::new(),
                roots: HashMap::new(),
                viewport: ViewportSize::new(800, 600),
            }
        }

        fn add(&mut self, kind: NodeKind, rect: Rect) -> NodeHandle {
            self.nodes.insert(TestNode {
                kind,
                owner: None,
                rect,
                next: None,
            })
        }

        fn link(&mut self, from: NodeHandle, to: NodeHandle) {
            if let Some(node) = self.nodes.get_mut(from) {
                node.next = Some(to);
            }
        }

        fn own(&mut self, node: NodeHandle, id: &InstanceId) {
            if let Some(node) = self.nodes.get_mut(node) {
                node.owner = Some(id.clone());
            }
        }
    }

    impl HostDom for TestDom {
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

    type Slot = HashMap<String, InstanceId>;

    fn rect(top: f64, left: f64) -> Rect {
        Rect::new(top, left, 50.0, 20.0)
    }

    fn controller() -> FlashController<RecordingFactory> {
        FlashController::new(OverlaySettings::default(), RecordingFactory::new()).unwrap()
    }

    fn running(dom: &TestDom) -> FlashController<RecordingFactory> {
        let mut controller = controller();
        controller.start(dom.viewport);
        assert!(controller.is_running());
        controller
    }

    fn region_count(controller: &FlashController<RecordingFactory>) -> usize {
        controller.worker().snapshot().unwrap().region_count
    }

    #[test]
    fn test_start_creates_surface_once() {
        let dom = TestDom::new();
        let mut controller = running(&dom);
        controller.start(dom.viewport);

        assert_eq!(controller.factory().created(), 1);
        let spec = &controller.factory().specs()[0];
        assert_eq!(spec.viewport, dom.viewport);
        assert_eq!(spec.z_index, 9999);
        assert_eq!(spec.marker, DEFAULT_CANVAS_IDENTIFIER);
        assert!(controller.worker().snapshot().unwrap().has_surface);
    }

    #[test]
    fn test_start_failure_stays_stopped() {
        let mut controller = controller();
        controller.factory_mut().set_failing(true);
        controller.start(ViewportSize::new(800, 600));

        assert!(!controller.is_running());
        assert!(!controller.factory().is_attached());
        assert!(!controller.worker().snapshot().unwrap().has_surface);
    }

    #[test]
    fn test_zero_viewport_stays_stopped() {
        let mut controller = controller();
        controller.start(ViewportSize::new(0, 0));

        assert!(!controller.is_running());
        assert!(!controller.factory().is_attached());
        let snapshot = controller.worker().snapshot().unwrap();
        assert_eq!(snapshot.state, crate::render_loop::LoopState::Idle);
        assert!(!snapshot.has_surface);

        // The next toggle tries to start again rather than stopping.
        controller.toggle(ViewportSize::new(800, 600));
        assert!(controller.is_running());
        assert_eq!(controller.factory().created(), 2);
    }

    #[test]
    fn test_hooks_ignored_after_failed_start() {
        let mut dom = TestDom::new();
        let root = dom.add(NodeKind::Element, rect(10.0, 10.0));
        let mut controller = controller();
        controller.start(ViewportSize::new(0, 0));

        let mut slot = Slot::new();
        controller.on_before_create(&mut slot);
        controller.on_render_triggered(&mut slot, &dom, root);
        assert!(slot.is_empty());
        assert!(controller.registry().is_empty());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let dom = TestDom::new();
        let mut controller = running(&dom);
        controller.stop();
        controller.stop();

        assert!(!controller.is_running());
        assert!(!controller.factory().is_attached());
        assert!(controller.registry().is_empty());
        assert!(!controller.worker().snapshot().unwrap().has_surface);
    }

    #[test]
    fn test_toggle_key() {
        let viewport = ViewportSize::new(800, 600);
        let mut controller = controller();
        let toggle = KeyEvent::new(
            "T",
            Modifiers {
                shift: true,
                ..Default::default()
            },
        );

        assert!(!controller.handle_key(&KeyEvent::new("t", Modifiers::default()), viewport));
        assert!(!controller.is_running());

        assert!(controller.handle_key(&toggle, viewport));
        assert!(controller.is_running());
        assert!(controller.handle_key(&toggle, viewport));
        assert!(!controller.is_running());
    }

    #[test]
    fn test_element_render_posts_region() {
        let mut dom = TestDom::new();
        let root = dom.add(NodeKind::Element, rect(10.0, 10.0));
        let mut controller = running(&dom);
        let mut slot = Slot::new();

        controller.on_before_create(&mut slot);
        assert!(slot.contains_key(DEFAULT_INSTANCE_IDENTIFIER));
        controller.on_render_triggered(&mut slot, &dom, root);
        controller.tick(&dom, Instant::now());

        assert_eq!(region_count(&controller), 1);
        let id = slot.get(DEFAULT_INSTANCE_IDENTIFIER).unwrap();
        assert!(controller.registry().queued(id).is_empty());
    }

    #[test]
    fn test_hooks_ignored_while_stopped() {
        let mut dom = TestDom::new();
        let root = dom.add(NodeKind::Element, rect(10.0, 10.0));
        let mut controller = controller();
        let mut slot = Slot::new();

        controller.on_before_create(&mut slot);
        controller.on_render_triggered(&mut slot, &dom, root);
        assert!(slot.is_empty());
        assert!(controller.registry().is_empty());
    }

    #[test]
    fn test_render_mints_missing_id() {
        let mut dom = TestDom::new();
        let root = dom.add(NodeKind::Element, rect(10.0, 10.0));
        let mut controller = running(&dom);
        let mut slot = Slot::new();

        // Created before the overlay started, so no id yet.
        controller.on_render_triggered(&mut slot, &dom, root);
        let id = slot.get(DEFAULT_INSTANCE_IDENTIFIER).cloned().unwrap();
        assert!(controller.registry().contains(&id));
    }

    #[test]
    fn test_offscreen_regions_are_filtered() {
        let mut dom = TestDom::new();
        let onscreen = dom.add(NodeKind::Element, rect(10.0, 10.0));
        let above = dom.add(NodeKind::Element, Rect::new(-30.0, 10.0, 50.0, 20.0));
        let mut controller = running(&dom);
        let (mut a, mut b) = (Slot::new(), Slot::new());

        controller.on_render_triggered(&mut a, &dom, onscreen);
        controller.on_render_triggered(&mut b, &dom, above);
        controller.tick(&dom, Instant::now());

        let snapshot = controller.worker().snapshot().unwrap();
        assert_eq!(snapshot.region_count, 1);
        assert_eq!(snapshot.instance_count, 1);
    }

    #[test]
    fn test_repeated_render_coalesces() {
        let mut dom = TestDom::new();
        let root = dom.add(NodeKind::Element, rect(10.0, 10.0));
        let mut controller = running(&dom);
        let mut slot = Slot::new();

        controller.on_render_triggered(&mut slot, &dom, root);
        controller.on_render_triggered(&mut slot, &dom, root);
        assert_eq!(controller.registry().queued(slot.values().next().unwrap()).len(), 2);

        controller.tick(&dom, Instant::now());
        assert_eq!(region_count(&controller), 1);
    }

    #[test]
    fn test_text_root_collects_owned_siblings() {
        let mut dom = TestDom::new();
        let id = InstanceId::from("fragment");
        let text = dom.add(NodeKind::Text, rect(0.0, 0.0));
        let first = dom.add(NodeKind::Element, rect(10.0, 10.0));
        let second = dom.add(NodeKind::Element, rect(40.0, 10.0));
        let foreign = dom.add(NodeKind::Element, rect(70.0, 10.0));
        dom.link(text, first);
        dom.link(first, second);
        dom.link(second, foreign);
        dom.own(second, &id);
        dom.own(foreign, &InstanceId::from("other"));

        let mut controller = running(&dom);
        let mut slot = Slot::new();
        slot.set(DEFAULT_INSTANCE_IDENTIFIER, id.clone());
        controller.on_render_triggered(&mut slot, &dom, text);

        assert_eq!(controller.registry().queued(&id), &[first, second]);
    }

    #[test]
    fn test_placeholder_root_is_deferred() {
        let mut dom = TestDom::new();
        let id = InstanceId::from("lazy");
        let placeholder = dom.add(NodeKind::Comment, rect(0.0, 0.0));
        dom.roots.insert(id.clone(), placeholder);

        let mut controller = running(&dom);
        let mut slot = Slot::new();
        slot.set(DEFAULT_INSTANCE_IDENTIFIER, id.clone());
        controller.on_render_triggered(&mut slot, &dom, placeholder);
        assert!(controller.registry().queued(&id).is_empty());

        // Still a placeholder on the next tick: nothing to paint.
        controller.tick(&dom, Instant::now());
        assert_eq!(region_count(&controller), 0);

        controller.on_render_triggered(&mut slot, &dom, placeholder);
        let resolved = dom.add(NodeKind::Element, rect(10.0, 10.0));
        dom.roots.insert(id.clone(), resolved);
        controller.tick(&dom, Instant::now());
        assert_eq!(region_count(&controller), 1);
    }

    #[test]
    fn test_dead_nodes_are_skipped() {
        let mut dom = TestDom::new();
        let dead = dom.add(NodeKind::Element, rect(10.0, 10.0));
        let live = dom.add(NodeKind::Element, rect(40.0, 10.0));
        let mut controller = running(&dom);
        let mut slot = Slot::new();

        controller.on_render_triggered(&mut slot, &dom, dead);
        controller.on_render_triggered(&mut slot, &dom, live);
        dom.nodes.remove(dead);
        controller.tick(&dom, Instant::now());

        assert_eq!(region_count(&controller), 1);
    }

    #[test]
    fn test_unmount_deletes_instance() {
        let mut dom = TestDom::new();
        let root = dom.add(NodeKind::Element, rect(10.0, 10.0));
        let mut controller = running(&dom);
        let mut slot = Slot::new();

        controller.on_render_triggered(&mut slot, &dom, root);
        controller.tick(&dom, Instant::now());
        assert_eq!(region_count(&controller), 1);

        controller.on_unmounted(&mut slot);
        assert!(controller.registry().is_empty());
        let snapshot = controller.worker().snapshot().unwrap();
        assert_eq!(snapshot.instance_count, 0);
        assert_eq!(snapshot.region_count, 0);
    }

    #[test]
    fn test_resize_restarts_after_debounce() {
        let mut dom = TestDom::new();
        let mut controller = running(&dom);
        let t0 = Instant::now();

        dom.viewport = ViewportSize::new(1024, 768);
        controller.handle_resize(t0);
        controller.handle_resize(t0 + Duration::from_millis(100));
        controller.tick(&dom, t0 + Duration::from_millis(250));
        assert_eq!(controller.factory().created(), 1);

        controller.tick(&dom, t0 + Duration::from_millis(300));
        assert_eq!(controller.factory().created(), 2);
        assert_eq!(controller.factory().specs()[1].viewport, ViewportSize::new(1024, 768));
        assert!(controller.is_running());
    }
}
