use crate::{Overflow, WatcherId};

/// Host-side observation primitives.
///
/// The watcher is headless: it never touches a real UI tree. A host (a DOM
/// binding, a TUI, the `scrollwatch-adapter` simulator) implements this trait
/// family and feeds the entries its triggers produce back into
/// [`crate::BoundaryWatcher::deliver`].
///
/// The watcher assumes these primitives exist. A host running in an
/// environment without them should feature-detect and skip registration; no
/// degraded mode is defined here.
pub trait Platform {
    /// Handle to one element in the host tree. Cheap to clone; equality is
    /// node identity.
    type Node: Clone + PartialEq;
    type Intersection: IntersectionTrigger<Node = Self::Node>;
    type AttributeWatch: AttributeWatch;

    /// Returns the parent of `node`, or `None` at the tree root.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Returns the computed vertical-overflow policy of `node`.
    fn overflow_y(&self, node: &Self::Node) -> Overflow;

    /// Creates an intersection trigger scoped to `container` (`None` means
    /// the viewport), with `margin_px` of lead margin around the container's
    /// bounds. Batches the trigger produces come back tagged with `watcher`.
    fn intersection_trigger(
        &mut self,
        watcher: WatcherId,
        container: Option<&Self::Node>,
        margin_px: f64,
    ) -> Self::Intersection;

    /// Arms an attribute watch on `target`. The host reports fired batches
    /// via [`crate::BoundaryWatcher::sentinel_mutated`], once per batch.
    fn attribute_watch(&mut self, watcher: WatcherId, target: &Self::Node)
    -> Self::AttributeWatch;
}

/// A live intersection trigger bound to one container.
pub trait IntersectionTrigger {
    type Node;

    /// Starts observing `target`. Observation reports the target's current
    /// state on the next delivery, so a freshly observed sentinel never
    /// carries stale geometry.
    fn observe(&mut self, target: &Self::Node);

    /// Stops observing `target` and forgets its cached state.
    fn unobserve(&mut self, target: &Self::Node);

    /// Stops observing everything. Must be safe to call multiple times.
    fn disconnect(&mut self);
}

/// A live attribute watch on one element.
pub trait AttributeWatch {
    /// Stops watching. Must be safe to call multiple times.
    fn disconnect(&mut self);
}
