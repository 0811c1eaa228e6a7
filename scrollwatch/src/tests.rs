use crate::*;

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        let span = (end_exclusive - start) as u64;
        start + (self.next_u64() % span) as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Node(usize);

#[derive(Default)]
struct PlatformLog {
    observes: Mutex<Vec<(WatcherId, usize)>>,
    unobserves: Mutex<Vec<(WatcherId, usize)>>,
    trigger_disconnects: AtomicUsize,
    watch_disconnects: AtomicUsize,
}

impl PlatformLog {
    fn observe_count(&self) -> usize {
        self.observes.lock().unwrap().len()
    }
}

struct TestPlatform {
    parents: Vec<Option<usize>>,
    overflow: Vec<Overflow>,
    log: Arc<PlatformLog>,
}

/// An ancestor chain: node `i`'s parent is node `i + 1`, node 0 is the
/// sentinel the resolver starts from.
fn chain(overflow: &[Overflow]) -> TestPlatform {
    let n = overflow.len();
    TestPlatform {
        parents: (0..n).map(|i| (i + 1 < n).then_some(i + 1)).collect(),
        overflow: overflow.to_vec(),
        log: Arc::default(),
    }
}

/// Top sentinel = node 0, bottom sentinel = node 1, scroll container = node 2.
fn list_tree() -> TestPlatform {
    TestPlatform {
        parents: vec![Some(2), Some(2), None],
        overflow: vec![Overflow::Visible, Overflow::Visible, Overflow::Scroll],
        log: Arc::default(),
    }
}

struct TestTrigger {
    watcher: WatcherId,
    log: Arc<PlatformLog>,
}

impl IntersectionTrigger for TestTrigger {
    type Node = Node;

    fn observe(&mut self, target: &Node) {
        self.log
            .observes
            .lock()
            .unwrap()
            .push((self.watcher, target.0));
    }

    fn unobserve(&mut self, target: &Node) {
        self.log
            .unobserves
            .lock()
            .unwrap()
            .push((self.watcher, target.0));
    }

    fn disconnect(&mut self) {
        self.log.trigger_disconnects.fetch_add(1, Ordering::Relaxed);
    }
}

struct TestWatch {
    log: Arc<PlatformLog>,
}

impl AttributeWatch for TestWatch {
    fn disconnect(&mut self) {
        self.log.watch_disconnects.fetch_add(1, Ordering::Relaxed);
    }
}

impl Platform for TestPlatform {
    type Node = Node;
    type Intersection = TestTrigger;
    type AttributeWatch = TestWatch;

    fn parent(&self, node: &Node) -> Option<Node> {
        self.parents.get(node.0).copied().flatten().map(Node)
    }

    fn overflow_y(&self, node: &Node) -> Overflow {
        self.overflow.get(node.0).copied().unwrap_or_default()
    }

    fn intersection_trigger(
        &mut self,
        watcher: WatcherId,
        _container: Option<&Node>,
        _margin_px: f64,
    ) -> TestTrigger {
        TestTrigger {
            watcher,
            log: Arc::clone(&self.log),
        }
    }

    fn attribute_watch(&mut self, _watcher: WatcherId, _target: &Node) -> TestWatch {
        TestWatch {
            log: Arc::clone(&self.log),
        }
    }
}

#[derive(Default)]
struct RecordingController {
    id: u64,
    tops: Mutex<Vec<(f64, Option<f64>)>>,
    bottoms: Mutex<Vec<(f64, Option<f64>)>>,
    order: Mutex<Vec<Edge>>,
    released: AtomicUsize,
}

impl RecordingController {
    fn new(id: u64) -> Arc<Self> {
        Arc::new(Self {
            id,
            ..Self::default()
        })
    }
}

impl BoundaryController for RecordingController {
    fn id(&self) -> WatcherId {
        WatcherId(self.id)
    }

    fn on_top_approached(&self, distance: f64, container_size: Option<f64>) {
        self.tops.lock().unwrap().push((distance, container_size));
        self.order.lock().unwrap().push(Edge::Top);
    }

    fn on_bottom_approached(&self, distance: f64, container_size: Option<f64>) {
        self.bottoms
            .lock()
            .unwrap()
            .push((distance, container_size));
        self.order.lock().unwrap().push(Edge::Bottom);
    }

    fn release(&self) {
        self.released.fetch_add(1, Ordering::Relaxed);
    }
}

const CONTAINER: Bounds = Bounds {
    top: 0.0,
    bottom: 500.0,
};

fn entry(target: Node, is_entering: bool, target_bounds: Bounds) -> IntersectionEntry<Node> {
    IntersectionEntry {
        target,
        is_entering,
        target_bounds,
        visible_bounds: Bounds::new(
            target_bounds.top.clamp(CONTAINER.top, CONTAINER.bottom),
            target_bounds.bottom.clamp(CONTAINER.top, CONTAINER.bottom),
        ),
        container_bounds: Some(CONTAINER),
    }
}

#[test]
fn resolve_returns_nearest_clipping_ancestor() {
    let platform = chain(&[
        Overflow::Visible,
        Overflow::Visible,
        Overflow::Auto,
        Overflow::Scroll,
    ]);
    let found = resolve_scroll_container(&platform, &Node(0), 1024);
    assert_eq!(found, Some(Node(2)));
}

#[test]
fn resolve_starts_at_the_sentinel_itself() {
    let platform = chain(&[Overflow::Hidden, Overflow::Scroll]);
    let found = resolve_scroll_container(&platform, &Node(0), 1024);
    assert_eq!(found, Some(Node(0)));
}

#[test]
fn resolve_falls_back_to_viewport_when_nothing_clips() {
    let platform = chain(&[Overflow::Visible; 8]);
    assert_eq!(resolve_scroll_container(&platform, &Node(0), 1024), None);
}

#[test]
fn resolve_first_match_is_depth_independent() {
    let clipping = [
        Overflow::Hidden,
        Overflow::Scroll,
        Overflow::Auto,
        Overflow::Clip,
    ];
    let mut rng = Lcg::new(0x5eed);
    for _ in 0..200 {
        let n = rng.gen_range_usize(2, 40);
        let k = rng.gen_range_usize(0, n);
        let mut overflow = vec![Overflow::Visible; n];
        overflow[k] = clipping[rng.gen_range_usize(0, clipping.len())];
        // A second clipping ancestor above k must not win.
        if k + 2 < n {
            let deeper = rng.gen_range_usize(k + 1, n);
            overflow[deeper] = clipping[rng.gen_range_usize(0, clipping.len())];
        }
        let platform = chain(&overflow);
        assert_eq!(
            resolve_scroll_container(&platform, &Node(0), 1024),
            Some(Node(k)),
            "n={n}, k={k}"
        );
    }
}

#[test]
fn resolve_depth_bound_behaves_like_reaching_the_root() {
    let mut overflow = vec![Overflow::Visible; 10];
    overflow[5] = Overflow::Scroll;
    let platform = chain(&overflow);

    // Bound past the match preserves first-match semantics.
    assert_eq!(
        resolve_scroll_container(&platform, &Node(0), 6),
        Some(Node(5))
    );
    // Bound short of the match falls back to the viewport.
    assert_eq!(resolve_scroll_container(&platform, &Node(0), 5), None);
}

#[test]
fn register_observes_both_sentinels_against_resolved_container() {
    let mut platform = list_tree();
    let log = Arc::clone(&platform.log);
    let mut watcher = BoundaryWatcher::new();
    let controller = RecordingController::new(1);

    let id = watcher.register(&mut platform, controller, Node(0), Node(1));

    assert_eq!(*log.observes.lock().unwrap(), vec![(id, 0), (id, 1)]);
    assert_eq!(watcher.scroll_container(id), Some(Some(&Node(2))));
    assert_eq!(watcher.len(), 1);
}

#[test]
fn register_without_clipping_ancestor_watches_the_viewport() {
    let mut platform = TestPlatform {
        parents: vec![Some(2), Some(2), None],
        overflow: vec![Overflow::Visible; 3],
        log: Arc::default(),
    };
    let mut watcher = BoundaryWatcher::new();
    let id = watcher.register(&mut platform, RecordingController::new(1), Node(0), Node(1));
    assert_eq!(watcher.scroll_container(id), Some(None));
}

#[test]
fn reregistration_replaces_the_observer_set() {
    let mut platform = list_tree();
    let log = Arc::clone(&platform.log);
    let mut watcher = BoundaryWatcher::new();

    watcher.register(&mut platform, RecordingController::new(1), Node(0), Node(1));
    watcher.register(&mut platform, RecordingController::new(1), Node(0), Node(1));

    // The first set was stopped when the second replaced it.
    assert_eq!(log.trigger_disconnects.load(Ordering::Relaxed), 1);
    assert_eq!(log.watch_disconnects.load(Ordering::Relaxed), 1);
    assert_eq!(log.observe_count(), 4);
    assert_eq!(watcher.len(), 1);
}

#[test]
fn replacement_routes_to_the_new_controller() {
    let mut platform = list_tree();
    let mut watcher = BoundaryWatcher::new();
    let first = RecordingController::new(1);
    let second = RecordingController::new(1);

    let id = watcher.register(&mut platform, first.clone(), Node(0), Node(1));
    watcher.register(&mut platform, second.clone(), Node(0), Node(1));

    let batch = [entry(Node(1), true, Bounds::new(536.0, 540.0))];
    assert_eq!(watcher.deliver(id, &batch), Ok(1));
    assert!(first.bottoms.lock().unwrap().is_empty());
    assert_eq!(second.bottoms.lock().unwrap().len(), 1);
}

#[test]
fn unregister_empties_registry() {
    // Regression: disposal must remove the entry under the same key it was
    // registered with, and must do so exactly once.
    let mut platform = list_tree();
    let log = Arc::clone(&platform.log);
    let mut watcher = BoundaryWatcher::new();
    let controller = RecordingController::new(7);

    let id = watcher.register(&mut platform, controller.clone(), Node(0), Node(1));
    assert!(watcher.unregister(id));

    assert!(watcher.is_empty());
    assert!(!watcher.contains(id));
    assert_eq!(controller.released.load(Ordering::Relaxed), 1);
    assert_eq!(log.trigger_disconnects.load(Ordering::Relaxed), 1);
    assert_eq!(log.watch_disconnects.load(Ordering::Relaxed), 1);

    // Double disposal stays a no-op.
    assert!(!watcher.unregister(id));
    assert_eq!(controller.released.load(Ordering::Relaxed), 1);
}

#[test]
fn unregister_unknown_identity_is_a_noop() {
    let mut watcher = BoundaryWatcher::<TestPlatform>::new();
    assert!(!watcher.unregister(WatcherId(9)));
}

#[test]
fn top_crossing_at_margin_edge_dispatches_once_with_nonnegative_distance() {
    let mut platform = list_tree();
    let mut watcher = BoundaryWatcher::new();
    let controller = RecordingController::new(1);
    let id = watcher.register(&mut platform, controller.clone(), Node(0), Node(1));

    // Sentinel exactly at the 50px margin edge above the container.
    let batch = [entry(Node(0), true, Bounds::new(-50.0, -50.0))];
    assert_eq!(watcher.deliver(id, &batch), Ok(1));

    let tops = controller.tops.lock().unwrap();
    assert_eq!(*tops, vec![(50.0, Some(500.0))]);
    assert!(tops[0].0 >= 0.0);
    assert!(controller.bottoms.lock().unwrap().is_empty());
}

#[test]
fn bottom_crossing_measures_past_the_bottom_edge() {
    let mut platform = list_tree();
    let mut watcher = BoundaryWatcher::new();
    let controller = RecordingController::new(1);
    let id = watcher.register(&mut platform, controller.clone(), Node(0), Node(1));

    // Sentinel bottom sits 40px below the 500px container.
    let batch = [entry(Node(1), true, Bounds::new(536.0, 540.0))];
    assert_eq!(watcher.deliver(id, &batch), Ok(1));
    assert_eq!(
        *controller.bottoms.lock().unwrap(),
        vec![(40.0, Some(500.0))]
    );
}

#[test]
fn leaving_entries_notify_nothing() {
    let mut platform = list_tree();
    let mut watcher = BoundaryWatcher::new();
    let controller = RecordingController::new(1);
    let id = watcher.register(&mut platform, controller.clone(), Node(0), Node(1));

    let batch = [
        entry(Node(0), false, Bounds::new(-10.0, 0.0)),
        entry(Node(1), false, Bounds::new(520.0, 530.0)),
    ];
    assert_eq!(watcher.deliver(id, &batch), Ok(0));
    assert!(controller.order.lock().unwrap().is_empty());
}

#[test]
fn unknown_target_fails_loudly() {
    let mut platform = list_tree();
    let mut watcher = BoundaryWatcher::new();
    let controller = RecordingController::new(1);
    let id = watcher.register(&mut platform, controller.clone(), Node(0), Node(1));

    let batch = [entry(Node(7), true, Bounds::new(0.0, 10.0))];
    assert_eq!(watcher.deliver(id, &batch), Err(WatchError::UnknownTarget));
}

#[test]
fn batch_is_routed_in_platform_order() {
    let mut platform = list_tree();
    let mut watcher = BoundaryWatcher::new();
    let controller = RecordingController::new(1);
    let id = watcher.register(&mut platform, controller.clone(), Node(0), Node(1));

    let batch = [
        entry(Node(1), true, Bounds::new(536.0, 540.0)),
        entry(Node(0), true, Bounds::new(-20.0, -10.0)),
        entry(Node(1), false, Bounds::new(560.0, 570.0)),
    ];
    assert_eq!(watcher.deliver(id, &batch), Ok(2));
    assert_eq!(
        *controller.order.lock().unwrap(),
        vec![Edge::Bottom, Edge::Top]
    );
}

#[test]
fn delivery_after_unregister_is_absorbed() {
    let mut platform = list_tree();
    let mut watcher = BoundaryWatcher::new();
    let controller = RecordingController::new(1);
    let id = watcher.register(&mut platform, controller.clone(), Node(0), Node(1));
    watcher.unregister(id);

    // A platform callback already in flight at disposal time.
    let batch = [entry(Node(1), true, Bounds::new(536.0, 540.0))];
    assert_eq!(watcher.deliver(id, &batch), Ok(0));
    assert!(controller.bottoms.lock().unwrap().is_empty());
}

#[test]
fn unresolvable_container_size_maps_to_none() {
    let mut platform = list_tree();
    let mut watcher = BoundaryWatcher::new();
    let controller = RecordingController::new(1);
    let id = watcher.register(&mut platform, controller.clone(), Node(0), Node(1));

    let mut e = entry(Node(1), true, Bounds::new(536.0, 540.0));
    e.container_bounds = None;
    assert_eq!(watcher.deliver(id, &[e]), Ok(1));
    assert_eq!(*controller.bottoms.lock().unwrap(), vec![(40.0, None)]);
}

#[test]
fn mutation_rearms_exactly_once_per_batch() {
    let mut platform = list_tree();
    let log = Arc::clone(&platform.log);
    let mut watcher = BoundaryWatcher::new();
    let id = watcher.register(&mut platform, RecordingController::new(1), Node(0), Node(1));

    watcher.sentinel_mutated(id);

    assert_eq!(*log.unobserves.lock().unwrap(), vec![(id, 0), (id, 1)]);
    assert_eq!(log.observe_count(), 4); // 2 initial + 2 re-arm

    // Inactive identities re-arm nothing.
    watcher.sentinel_mutated(WatcherId(99));
    assert_eq!(log.observe_count(), 4);
}

#[test]
fn stop_is_idempotent_and_disables_rearm() {
    let mut platform = list_tree();
    let log = Arc::clone(&platform.log);
    let mut pair =
        EdgeObserverPair::start(&mut platform, WatcherId(1), None, Node(0), Node(1), 50.0);
    assert!(pair.is_live());

    pair.stop();
    pair.stop();
    assert!(!pair.is_live());
    assert_eq!(log.trigger_disconnects.load(Ordering::Relaxed), 1);
    assert_eq!(log.watch_disconnects.load(Ordering::Relaxed), 1);

    pair.rearm();
    assert_eq!(log.observe_count(), 2); // nothing re-observed after stop
}

#[test]
fn clear_stops_and_releases_everything() {
    let mut platform = list_tree();
    let log = Arc::clone(&platform.log);
    let mut watcher = BoundaryWatcher::new();
    let first = RecordingController::new(1);
    let second = RecordingController::new(2);

    watcher.register(&mut platform, first.clone(), Node(0), Node(1));
    watcher.register(&mut platform, second.clone(), Node(0), Node(1));
    watcher.clear();

    assert!(watcher.is_empty());
    assert_eq!(first.released.load(Ordering::Relaxed), 1);
    assert_eq!(second.released.load(Ordering::Relaxed), 1);
    assert_eq!(log.trigger_disconnects.load(Ordering::Relaxed), 2);
}

#[test]
fn callback_controller_routes_to_closures() {
    let tops = Arc::new(AtomicUsize::new(0));
    let bottoms = Arc::new(AtomicUsize::new(0));
    let released = Arc::new(AtomicUsize::new(0));

    let controller = CallbackController::new(
        WatcherId(3),
        {
            let tops = Arc::clone(&tops);
            move |_, _| {
                tops.fetch_add(1, Ordering::Relaxed);
            }
        },
        {
            let bottoms = Arc::clone(&bottoms);
            move |_, _| {
                bottoms.fetch_add(1, Ordering::Relaxed);
            }
        },
    )
    .with_on_release({
        let released = Arc::clone(&released);
        move || {
            released.fetch_add(1, Ordering::Relaxed);
        }
    });

    let mut platform = list_tree();
    let mut watcher = BoundaryWatcher::new();
    let id = watcher.register(&mut platform, Arc::new(controller), Node(0), Node(1));

    let batch = [
        entry(Node(0), true, Bounds::new(-20.0, -10.0)),
        entry(Node(1), true, Bounds::new(536.0, 540.0)),
    ];
    assert_eq!(watcher.deliver(id, &batch), Ok(2));
    watcher.unregister(id);

    assert_eq!(tops.load(Ordering::Relaxed), 1);
    assert_eq!(bottoms.load(Ordering::Relaxed), 1);
    assert_eq!(released.load(Ordering::Relaxed), 1);
}

#[test]
fn custom_margin_is_forwarded_to_the_trigger() {
    struct MarginPlatform {
        inner: TestPlatform,
        margins: Arc<Mutex<Vec<f64>>>,
    }

    impl Platform for MarginPlatform {
        type Node = Node;
        type Intersection = TestTrigger;
        type AttributeWatch = TestWatch;

        fn parent(&self, node: &Node) -> Option<Node> {
            self.inner.parent(node)
        }

        fn overflow_y(&self, node: &Node) -> Overflow {
            self.inner.overflow_y(node)
        }

        fn intersection_trigger(
            &mut self,
            watcher: WatcherId,
            container: Option<&Node>,
            margin_px: f64,
        ) -> TestTrigger {
            self.margins.lock().unwrap().push(margin_px);
            self.inner.intersection_trigger(watcher, container, margin_px)
        }

        fn attribute_watch(&mut self, watcher: WatcherId, target: &Node) -> TestWatch {
            self.inner.attribute_watch(watcher, target)
        }
    }

    let margins = Arc::new(Mutex::new(Vec::new()));
    let mut platform = MarginPlatform {
        inner: list_tree(),
        margins: Arc::clone(&margins),
    };

    let mut watcher = BoundaryWatcher::new();
    watcher.register(&mut platform, RecordingController::new(1), Node(0), Node(1));
    watcher.register_with_margin(
        &mut platform,
        RecordingController::new(2),
        Node(0),
        Node(1),
        120.0,
    );

    assert_eq!(*margins.lock().unwrap(), vec![50.0, 120.0]);
}
