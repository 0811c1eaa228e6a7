use alloc::sync::Arc;

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::observer::EdgeObserverPair;
use crate::platform::Platform;
use crate::resolver::resolve_scroll_container;
use crate::router::route_batch;
use crate::{BoundaryController, IntersectionEntry, WatchError, WatcherId, WatcherOptions};

#[cfg(feature = "std")]
type EntryMap<P> = HashMap<WatcherId, WatcherEntry<P>>;
#[cfg(not(feature = "std"))]
type EntryMap<P> = BTreeMap<WatcherId, WatcherEntry<P>>;

struct WatcherEntry<P: Platform> {
    controller: Arc<dyn BoundaryController>,
    /// Resolved once at registration; `None` means the viewport.
    container: Option<P::Node>,
    pair: EdgeObserverPair<P>,
}

/// The boundary watcher: an explicit registry of active virtualization
/// instances, owned by the host application's lifetime scope.
///
/// Each registration wires one controller to a pair of sentinel elements:
/// the scroll container is resolved once, the observer pair starts, and
/// platform batches handed to [`Self::deliver`] turn into
/// `on_top_approached` / `on_bottom_approached` notifications on the
/// controller. The watcher is the sole long-lived owner of observation
/// resources; [`Self::unregister`] (or [`Self::clear`]) is the only way they
/// are released.
///
/// All methods are meant to be called from the host's single callback
/// context; there is no internal synchronization.
pub struct BoundaryWatcher<P: Platform> {
    options: WatcherOptions,
    entries: EntryMap<P>,
}

impl<P: Platform> BoundaryWatcher<P> {
    pub fn new() -> Self {
        Self::with_options(WatcherOptions::default())
    }

    pub fn with_options(options: WatcherOptions) -> Self {
        Self {
            options,
            entries: EntryMap::new(),
        }
    }

    pub fn options(&self) -> &WatcherOptions {
        &self.options
    }

    /// Number of active registrations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: WatcherId) -> bool {
        self.entries.contains_key(&id)
    }

    /// The scroll container resolved for `id` at registration time.
    ///
    /// Returns `None` for inactive identities; `Some(None)` means the
    /// registration watches the viewport.
    pub fn scroll_container(&self, id: WatcherId) -> Option<Option<&P::Node>> {
        self.entries.get(&id).map(|entry| entry.container.as_ref())
    }

    /// Begins watching `top` and `bottom` for `controller`, with the default
    /// margin from [`WatcherOptions`].
    ///
    /// The scroll container is resolved here, once: the nearest ancestor of
    /// `top` with clipping overflow, else the viewport. Registering an
    /// identity that is already active replaces the previous registration:
    /// the old observer set is stopped first, never duplicated. No
    /// historical events are replayed.
    ///
    /// Returns the identity the entry was registered under.
    pub fn register(
        &mut self,
        platform: &mut P,
        controller: Arc<dyn BoundaryController>,
        top: P::Node,
        bottom: P::Node,
    ) -> WatcherId {
        self.register_with_margin(platform, controller, top, bottom, self.options.margin_px)
    }

    /// Same as [`Self::register`], with an explicit margin in pixels.
    pub fn register_with_margin(
        &mut self,
        platform: &mut P,
        controller: Arc<dyn BoundaryController>,
        top: P::Node,
        bottom: P::Node,
        margin_px: f64,
    ) -> WatcherId {
        let id = controller.id();
        if let Some(previous) = self.entries.get_mut(&id) {
            wdebug!(id = id.0, "re-registration replaces the active observer set");
            previous.pair.stop();
        }

        let container = resolve_scroll_container(platform, &top, self.options.max_ancestor_depth);
        let pair =
            EdgeObserverPair::start(platform, id, container.as_ref(), top, bottom, margin_px);
        wdebug!(
            id = id.0,
            margin_px,
            viewport = container.is_none(),
            "registered boundary watcher"
        );
        self.entries.insert(
            id,
            WatcherEntry {
                controller,
                container,
                pair,
            },
        );
        id
    }

    /// Stops watching for `id`, releases all observation resources, then
    /// calls the controller's `release()`.
    ///
    /// Safe when `id` was never registered: returns `false` and does
    /// nothing.
    pub fn unregister(&mut self, id: WatcherId) -> bool {
        let Some(mut entry) = self.entries.remove(&id) else {
            wtrace!(id = id.0, "unregister for an inactive identity");
            return false;
        };
        entry.pair.stop();
        entry.controller.release();
        wdebug!(id = id.0, "unregistered boundary watcher");
        true
    }

    /// Routes one platform-delivered batch of intersection entries to the
    /// controller registered under `id`.
    ///
    /// Entries are processed in the order the platform reports them; only
    /// entering crossings notify. A batch arriving for an identity that was
    /// just unregistered is absorbed (`Ok(0)`), since disposal may race a
    /// pending delivery. An entry targeting an element that is neither registered
    /// sentinel fails loudly with [`WatchError::UnknownTarget`].
    ///
    /// Returns the number of notifications dispatched.
    pub fn deliver(
        &self,
        id: WatcherId,
        entries: &[IntersectionEntry<P::Node>],
    ) -> Result<usize, WatchError> {
        let Some(entry) = self.entries.get(&id) else {
            wtrace!(
                id = id.0,
                dropped = entries.len(),
                "dropping batch for an inactive identity"
            );
            return Ok(0);
        };
        route_batch(
            entry.pair.top(),
            entry.pair.bottom(),
            entries,
            entry.controller.as_ref(),
        )
    }

    /// Re-arms the observer pair for `id` after the host reported an
    /// attribute-mutation batch on the top sentinel.
    ///
    /// Call once per batch, not once per individual attribute change. No-op
    /// for inactive identities.
    pub fn sentinel_mutated(&mut self, id: WatcherId) {
        if let Some(entry) = self.entries.get_mut(&id) {
            wtrace!(id = id.0, "re-arming observers after sentinel mutation");
            entry.pair.rearm();
        }
    }

    /// Stops and releases every registration. Host teardown path.
    pub fn clear(&mut self) {
        let entries = core::mem::take(&mut self.entries);
        for (_, mut entry) in entries {
            entry.pair.stop();
            entry.controller.release();
        }
    }
}

impl<P: Platform> Default for BoundaryWatcher<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Platform> core::fmt::Debug for BoundaryWatcher<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BoundaryWatcher")
            .field("options", &self.options)
            .field("active", &self.entries.len())
            .finish_non_exhaustive()
    }
}
