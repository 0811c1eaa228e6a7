//! A list whose ancestors never clip: boundary crossings are measured
//! against the viewport itself.
//!
//! The host here is a deliberately tiny inline platform, just enough tree
//! to register against. Real hosts hand the batches their own intersection
//! primitives produce to `BoundaryWatcher::deliver`; this example builds one
//! by hand.

use std::sync::Arc;

use scrollwatch::{
    AttributeWatch, BoundaryWatcher, Bounds, CallbackController, IntersectionEntry,
    IntersectionTrigger, Overflow, Platform, WatcherId,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Node(usize);

struct InertTrigger;

impl IntersectionTrigger for InertTrigger {
    type Node = Node;

    fn observe(&mut self, _target: &Node) {}
    fn unobserve(&mut self, _target: &Node) {}
    fn disconnect(&mut self) {}
}

struct InertWatch;

impl AttributeWatch for InertWatch {
    fn disconnect(&mut self) {}
}

/// Three nodes, none of which clips: sentinel(0) -> wrapper(1) -> body(2).
struct PlainDocument;

impl Platform for PlainDocument {
    type Node = Node;
    type Intersection = InertTrigger;
    type AttributeWatch = InertWatch;

    fn parent(&self, node: &Node) -> Option<Node> {
        (node.0 < 2).then(|| Node(node.0 + 1))
    }

    fn overflow_y(&self, _node: &Node) -> Overflow {
        Overflow::Visible
    }

    fn intersection_trigger(
        &mut self,
        _watcher: WatcherId,
        container: Option<&Node>,
        margin_px: f64,
    ) -> InertTrigger {
        println!("trigger armed: container={container:?}, margin={margin_px}px");
        InertTrigger
    }

    fn attribute_watch(&mut self, _watcher: WatcherId, target: &Node) -> InertWatch {
        println!("attribute watch armed on {target:?}");
        InertWatch
    }
}

fn main() {
    let mut document = PlainDocument;
    let mut watcher = BoundaryWatcher::new();

    let controller = CallbackController::new(
        WatcherId(1),
        |distance, size| println!("top approached: distance={distance}, container={size:?}"),
        |distance, size| println!("bottom approached: distance={distance}, container={size:?}"),
    )
    .with_on_release(|| println!("controller released"));

    let top = Node(0);
    let bottom = Node(10);
    let id = watcher.register(&mut document, Arc::new(controller), top, bottom);

    // Nothing in the ancestor chain clips, so crossings are measured against
    // the viewport.
    assert_eq!(watcher.scroll_container(id), Some(None));

    // A hand-built batch: the bottom sentinel pokes 40px past an 800px
    // viewport, inside the default 50px margin.
    let viewport = Bounds::new(0.0, 800.0);
    let batch = [IntersectionEntry {
        target: bottom,
        is_entering: true,
        target_bounds: Bounds::new(836.0, 840.0),
        visible_bounds: Bounds::new(800.0, 800.0),
        container_bounds: Some(viewport),
    }];
    let dispatched = watcher.deliver(id, &batch).expect("sentinels are wired");
    println!("dispatched {dispatched} notification(s)");

    watcher.unregister(id);
    println!("active registrations: {}", watcher.len());
}
