use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use scrollwatch::{
    AttributeWatch, BoundaryWatcher, Bounds, IntersectionEntry, IntersectionTrigger, Overflow,
    Platform, WatchError, WatcherId,
};

/// Handle to one node in a [`SimHost`] tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(usize);

/// Counters over the platform primitives, for asserting observer lifecycles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimStats {
    pub observes: usize,
    pub unobserves: usize,
    pub trigger_disconnects: usize,
    pub watch_disconnects: usize,
}

struct SimNode {
    parent: Option<usize>,
    overflow: Overflow,
    bounds: Bounds,
}

struct TriggerState {
    watcher: WatcherId,
    container: Option<usize>,
    margin_px: f64,
    /// Observed target and whether it overlapped the margin region at the
    /// last pump. `None` right after `observe`, so current state is
    /// re-reported instead of assumed.
    observed: Vec<(usize, Option<bool>)>,
    connected: bool,
}

struct WatchState {
    watcher: WatcherId,
    target: usize,
    connected: bool,
}

#[derive(Default)]
struct SimState {
    nodes: Vec<SimNode>,
    viewport: Bounds,
    triggers: Vec<TriggerState>,
    watches: Vec<WatchState>,
    pending_mutations: Vec<usize>,
    stats: SimStats,
}

/// An in-memory host for tests and examples.
///
/// `SimHost` owns a small node tree (parents, overflow policies, vertical
/// bounds) plus a viewport, and implements [`Platform`] the way a real host
/// binding would: triggers are edge-triggered per observed target, report
/// current state when first observed, and forget cached state on `unobserve`
/// so a re-arm re-reports it.
///
/// The margin decides *whether* a sentinel counts as crossing (it inflates
/// the container region), while `visible_bounds` is clipped to the real
/// container edge, so reported distances measure pixels past the edge the
/// user actually sees.
pub struct SimHost {
    state: Rc<RefCell<SimState>>,
}

impl SimHost {
    pub fn new(viewport: Bounds) -> Self {
        let state = SimState {
            viewport,
            ..SimState::default()
        };
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Adds a node to the tree and returns its handle.
    pub fn node(&mut self, parent: Option<NodeId>, overflow: Overflow, bounds: Bounds) -> NodeId {
        let mut state = self.state.borrow_mut();
        state.nodes.push(SimNode {
            parent: parent.map(|p| p.0),
            overflow,
            bounds,
        });
        NodeId(state.nodes.len() - 1)
    }

    /// Moves or resizes a node (e.g. the host re-rendered the list).
    pub fn set_bounds(&mut self, node: NodeId, bounds: Bounds) {
        self.state.borrow_mut().nodes[node.0].bounds = bounds;
    }

    pub fn set_viewport(&mut self, viewport: Bounds) {
        self.state.borrow_mut().viewport = viewport;
    }

    /// Records one attribute change on `node`.
    ///
    /// Changes accumulate until [`Self::take_mutations`] collapses them into
    /// batches, like a real mutation observer delivering per callback, not
    /// per change.
    pub fn mutate(&mut self, node: NodeId) {
        self.state.borrow_mut().pending_mutations.push(node.0);
    }

    /// Flushes pending attribute changes into at most one batch per watcher
    /// with a live attribute watch on a mutated node.
    ///
    /// The caller forwards each returned id to
    /// [`BoundaryWatcher::sentinel_mutated`].
    pub fn take_mutations(&mut self) -> Vec<WatcherId> {
        let mut state = self.state.borrow_mut();
        let pending = core::mem::take(&mut state.pending_mutations);
        let mut fired = Vec::new();
        for node in pending {
            for watch in &state.watches {
                if watch.connected && watch.target == node && !fired.contains(&watch.watcher) {
                    fired.push(watch.watcher);
                }
            }
        }
        fired
    }

    /// Runs one observation pass and returns the batches each live trigger
    /// produced, in trigger-creation order.
    ///
    /// A batch entry is produced only on a state transition (or for a target
    /// whose state is unknown since `observe`), mirroring how intersection
    /// callbacks fire on crossings rather than continuously.
    pub fn pump(&mut self) -> Vec<(WatcherId, Vec<IntersectionEntry<NodeId>>)> {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let mut batches = Vec::new();

        for trigger in &mut state.triggers {
            if !trigger.connected {
                continue;
            }
            let container = match trigger.container {
                Some(index) => state.nodes[index].bounds,
                None => state.viewport,
            };
            let inflated = Bounds::new(
                container.top - trigger.margin_px,
                container.bottom + trigger.margin_px,
            );

            let mut batch = Vec::new();
            for (target, was) in &mut trigger.observed {
                let bounds = state.nodes[*target].bounds;
                let now = bounds.bottom >= inflated.top && bounds.top <= inflated.bottom;
                if *was == Some(now) {
                    continue;
                }
                *was = Some(now);
                batch.push(IntersectionEntry {
                    target: NodeId(*target),
                    is_entering: now,
                    target_bounds: bounds,
                    visible_bounds: Bounds::new(
                        bounds.top.clamp(container.top, container.bottom),
                        bounds.bottom.clamp(container.top, container.bottom),
                    ),
                    container_bounds: Some(container),
                });
            }
            if !batch.is_empty() {
                batches.push((trigger.watcher, batch));
            }
        }
        batches
    }

    /// Pumps once and delivers every produced batch into `watcher`.
    ///
    /// Returns the total number of notifications dispatched.
    pub fn deliver_all(&mut self, watcher: &BoundaryWatcher<Self>) -> Result<usize, WatchError> {
        let mut dispatched = 0;
        for (id, batch) in self.pump() {
            dispatched += watcher.deliver(id, &batch)?;
        }
        Ok(dispatched)
    }

    pub fn stats(&self) -> SimStats {
        self.state.borrow().stats
    }
}

impl fmt::Debug for SimHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SimHost")
            .field("nodes", &state.nodes.len())
            .field("viewport", &state.viewport)
            .field("stats", &state.stats)
            .finish_non_exhaustive()
    }
}

/// Trigger handle minted by [`SimHost`].
pub struct SimIntersection {
    state: Rc<RefCell<SimState>>,
    index: usize,
}

impl IntersectionTrigger for SimIntersection {
    type Node = NodeId;

    fn observe(&mut self, target: &NodeId) {
        let mut state = self.state.borrow_mut();
        if !state.triggers[self.index].connected {
            return;
        }
        state.stats.observes += 1;
        let observed = &mut state.triggers[self.index].observed;
        if let Some(slot) = observed.iter_mut().find(|(node, _)| *node == target.0) {
            slot.1 = None;
        } else {
            observed.push((target.0, None));
        }
    }

    fn unobserve(&mut self, target: &NodeId) {
        let mut state = self.state.borrow_mut();
        if !state.triggers[self.index].connected {
            return;
        }
        state.stats.unobserves += 1;
        state.triggers[self.index]
            .observed
            .retain(|(node, _)| *node != target.0);
    }

    fn disconnect(&mut self) {
        let mut state = self.state.borrow_mut();
        let trigger = &mut state.triggers[self.index];
        if !trigger.connected {
            return;
        }
        trigger.connected = false;
        trigger.observed.clear();
        state.stats.trigger_disconnects += 1;
    }
}

/// Attribute-watch handle minted by [`SimHost`].
pub struct SimAttributeWatch {
    state: Rc<RefCell<SimState>>,
    index: usize,
}

impl AttributeWatch for SimAttributeWatch {
    fn disconnect(&mut self) {
        let mut state = self.state.borrow_mut();
        let watch = &mut state.watches[self.index];
        if !watch.connected {
            return;
        }
        watch.connected = false;
        state.stats.watch_disconnects += 1;
    }
}

impl Platform for SimHost {
    type Node = NodeId;
    type Intersection = SimIntersection;
    type AttributeWatch = SimAttributeWatch;

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.state.borrow().nodes[node.0].parent.map(NodeId)
    }

    fn overflow_y(&self, node: &NodeId) -> Overflow {
        self.state.borrow().nodes[node.0].overflow
    }

    fn intersection_trigger(
        &mut self,
        watcher: WatcherId,
        container: Option<&NodeId>,
        margin_px: f64,
    ) -> SimIntersection {
        let mut state = self.state.borrow_mut();
        state.triggers.push(TriggerState {
            watcher,
            container: container.map(|node| node.0),
            margin_px,
            observed: Vec::new(),
            connected: true,
        });
        SimIntersection {
            state: Rc::clone(&self.state),
            index: state.triggers.len() - 1,
        }
    }

    fn attribute_watch(&mut self, watcher: WatcherId, target: &NodeId) -> SimAttributeWatch {
        let mut state = self.state.borrow_mut();
        state.watches.push(WatchState {
            watcher,
            target: target.0,
            connected: true,
        });
        SimAttributeWatch {
            state: Rc::clone(&self.state),
            index: state.watches.len() - 1,
        }
    }
}
