//! Capabilities the host UI framework provides to the overlay.

use crate::geometry::{Rect, ViewportSize};
use crate::instance::{InstanceId, InstanceSlot};
use crate::node::{NodeHandle, NodeKind};

/// Read-only DOM and geometry queries, answered on the host thread.
///
/// Every node query returns `None` for a node that no longer exists.
pub trait HostDom {
    fn node_kind(&self, node: NodeHandle) -> Option<NodeKind>;

    /// The next sibling of `node` that is an element.
    fn next_element_sibling(&self, node: NodeHandle) -> Option<NodeHandle>;

    /// The instance whose render produced `node`, if it carries one.
    fn owner_instance(&self, node: NodeHandle) -> Option<InstanceId>;

    /// The current root node of a live instance.
    fn instance_root(&self, id: &InstanceId) -> Option<NodeHandle>;

    /// Bounding box of `node` in viewport coordinates.
    fn measure(&self, node: NodeHandle) -> Option<Rect>;

    fn viewport_size(&self) -> ViewportSize;
}

/// Fixed listener set the host invokes from its component lifecycle.
pub trait LifecycleHooks {
    /// A component instance is about to be created.
    fn on_before_create(&mut self, slot: &mut dyn InstanceSlot);

    /// The instance re-rendered; `root` is its current root node.
    fn on_render_triggered(&mut self, slot: &mut dyn InstanceSlot, dom: &dyn HostDom, root: NodeHandle);

    /// The instance was unmounted.
    fn on_unmounted(&mut self, slot: &mut dyn InstanceSlot);
}
