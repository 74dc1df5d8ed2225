//! Coalescing store for active highlight regions.
//!
//! Owned by the worker thread. Each instance has at most one region per
//! distinct rectangle: re-rendering an unchanged box restarts its fade rather
//! than stacking a second overlay on top of it.

use std::collections::HashMap;

use crate::geometry::Rect;
use crate::instance::InstanceId;

/// One highlighted rectangle and the frame time it was first painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightRegion {
    pub rect: Rect,
    /// Unset until the first frame that paints the region.
    pub start: Option<f64>,
}

impl HighlightRegion {
    pub fn new(rect: Rect) -> Self {
        Self { rect, start: None }
    }

    /// Milliseconds since first paint, anchoring the start to `timestamp` if unset.
    pub fn elapsed_at(&mut self, timestamp: f64) -> f64 {
        let start = *self.start.get_or_insert(timestamp);
        timestamp - start
    }
}

/// Outcome of visiting a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Keep,
    Expire,
}

/// Instance id to active region set.
#[derive(Debug, Default)]
pub struct CoalescingStore {
    instances: HashMap<InstanceId, Vec<HighlightRegion>>,
}

impl CoalescingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_instance(&mut self, id: &InstanceId) {
        if !self.instances.contains_key(id) {
            self.instances.insert(id.clone(), Vec::new());
        }
    }

    /// Insert rects for `id`, coalescing with geometrically equal regions.
    ///
    /// A match has its start cleared so the next paint treats it as fresh.
    pub fn insert_regions(&mut self, id: &InstanceId, rects: impl IntoIterator<Item = Rect>) {
        let set = self.instances.entry(id.clone()).or_default();
        for rect in rects {
            match set.iter_mut().find(|region| region.rect == rect) {
                Some(existing) => existing.start = None,
                None => set.push(HighlightRegion::new(rect)),
            }
        }
    }

    /// Visit every region of `id`; regions the visitor expires are removed.
    ///
    /// Unknown ids visit nothing.
    pub fn for_each_active_region(&mut self, id: &InstanceId, mut visitor: impl FnMut(&mut HighlightRegion) -> Visit) {
        if let Some(set) = self.instances.get_mut(id) {
            set.retain_mut(|region| visitor(region) == Visit::Keep);
        }
    }

    /// Visit every region of every instance.
    pub fn visit_all(&mut self, mut visitor: impl FnMut(&InstanceId, &mut HighlightRegion) -> Visit) {
        for (id, set) in self.instances.iter_mut() {
            set.retain_mut(|region| visitor(id, region) == Visit::Keep);
        }
    }

    /// Remove the region of `id` whose rect equals `rect`.
    pub fn expire(&mut self, id: &InstanceId, rect: &Rect) -> bool {
        let Some(set) = self.instances.get_mut(id) else {
            return false;
        };
        match set.iter().position(|region| region.rect == *rect) {
            Some(pos) => {
                set.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    /// Purge an instance's set. Returns false when the instance was unknown.
    pub fn clear_instance(&mut self, id: &InstanceId) -> bool {
        self.instances.remove(id).is_some()
    }

    pub fn clear_all(&mut self) {
        self.instances.clear();
    }

    pub fn regions(&self, id: &InstanceId) -> &[HighlightRegion] {
        self.instances.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_instance(&self, id: &InstanceId) -> bool {
        self.instances.contains_key(id)
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Total active regions across all instances.
    pub fn region_count(&self) -> usize {
        self.instances.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.region_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(top: f64) -> Rect {
        Rect::new(top, 10.0, 100.0, 20.0)
    }

    #[test]
    fn test_identical_inserts_coalesce() {
        let mut store = CoalescingStore::new();
        let id = InstanceId::from("a");
        for _ in 0..5 {
            store.insert_regions(&id, [rect(0.0)]);
        }
        store.insert_regions(&id, [rect(0.0), rect(0.0)]);
        assert_eq!(store.regions(&id).len(), 1);
    }

    #[test]
    fn test_distinct_rects_are_kept_apart() {
        let mut store = CoalescingStore::new();
        let id = InstanceId::from("a");
        store.insert_regions(&id, [rect(0.0), rect(30.0)]);
        store.insert_regions(&id, [rect(30.0)]);
        assert_eq!(store.regions(&id).len(), 2);
        assert_eq!(store.region_count(), 2);
    }

    #[test]
    fn test_same_rect_on_two_instances_is_not_coalesced() {
        let mut store = CoalescingStore::new();
        let a = InstanceId::from("a");
        let b = InstanceId::from("b");
        store.insert_regions(&a, [rect(0.0)]);
        store.insert_regions(&b, [rect(0.0)]);
        assert_eq!(store.instance_count(), 2);
        assert_eq!(store.region_count(), 2);
    }

    #[test]
    fn test_reinsert_clears_start() {
        let mut store = CoalescingStore::new();
        let id = InstanceId::from("a");
        store.insert_regions(&id, [rect(0.0)]);
        store.for_each_active_region(&id, |region| {
            assert_eq!(region.elapsed_at(100.0), 0.0);
            Visit::Keep
        });
        store.for_each_active_region(&id, |region| {
            assert_eq!(region.elapsed_at(400.0), 300.0);
            Visit::Keep
        });

        store.insert_regions(&id, [rect(0.0)]);
        assert_eq!(store.regions(&id)[0].start, None);
        store.for_each_active_region(&id, |region| {
            assert_eq!(region.elapsed_at(416.0), 0.0);
            Visit::Keep
        });
    }

    #[test]
    fn test_expire_during_iteration() {
        let mut store = CoalescingStore::new();
        let id = InstanceId::from("a");
        store.insert_regions(&id, [rect(0.0), rect(30.0), rect(60.0)]);

        store.for_each_active_region(&id, |region| {
            if region.rect.top == 30.0 { Visit::Expire } else { Visit::Keep }
        });

        let tops: Vec<f64> = store.regions(&id).iter().map(|r| r.rect.top).collect();
        assert_eq!(tops, vec![0.0, 60.0]);
    }

    #[test]
    fn test_expire_single_region() {
        let mut store = CoalescingStore::new();
        let id = InstanceId::from("a");
        store.insert_regions(&id, [rect(0.0), rect(30.0)]);

        assert!(store.expire(&id, &rect(0.0)));
        assert!(!store.expire(&id, &rect(0.0)));
        assert!(!store.expire(&InstanceId::from("b"), &rect(30.0)));
        assert_eq!(store.regions(&id).len(), 1);
    }

    #[test]
    fn test_clear_instance_purges_set() {
        let mut store = CoalescingStore::new();
        let id = InstanceId::from("a");
        store.insert_regions(&id, [rect(0.0)]);

        assert!(store.clear_instance(&id));
        assert!(!store.contains_instance(&id));

        let mut visited = 0;
        store.for_each_active_region(&id, |_| {
            visited += 1;
            Visit::Keep
        });
        assert_eq!(visited, 0);
        assert!(!store.clear_instance(&id));
    }

    #[test]
    fn test_register_instance_is_idempotent() {
        let mut store = CoalescingStore::new();
        let id = InstanceId::from("a");
        store.register_instance(&id);
        store.insert_regions(&id, [rect(0.0)]);
        store.register_instance(&id);
        assert_eq!(store.regions(&id).len(), 1);
    }

    #[test]
    fn test_clear_all() {
        let mut store = CoalescingStore::new();
        store.insert_regions(&InstanceId::from("a"), [rect(0.0)]);
        store.insert_regions(&InstanceId::from("b"), [rect(0.0)]);
        store.clear_all();
        assert_eq!(store.instance_count(), 0);
        assert!(store.is_empty());
    }
}
