use crate::platform::{AttributeWatch, IntersectionTrigger, Platform};
use crate::WatcherId;

/// The boundary-observer set for one registration.
///
/// One intersection trigger watches both sentinels against the resolved
/// container; one attribute watch covers the top sentinel so in-place
/// mutations (virtualization repositioning a sentinel without replacing the
/// node) can re-arm the trigger before its cached geometry goes stale.
///
/// A stopped pair is not restartable; replacement goes through a fresh
/// [`EdgeObserverPair::start`].
pub struct EdgeObserverPair<P: Platform> {
    top: P::Node,
    bottom: P::Node,
    trigger: Option<P::Intersection>,
    attributes: Option<P::AttributeWatch>,
}

impl<P: Platform> EdgeObserverPair<P> {
    /// Begins observing both sentinels against `container` and arms the
    /// attribute watch on the top sentinel.
    ///
    /// The sentinels must be distinct elements; they mark "before content"
    /// and "after content" and the observer set is built around that.
    pub fn start(
        platform: &mut P,
        watcher: WatcherId,
        container: Option<&P::Node>,
        top: P::Node,
        bottom: P::Node,
        margin_px: f64,
    ) -> Self {
        debug_assert!(
            top != bottom,
            "top and bottom sentinels must be distinct elements"
        );
        let mut trigger = platform.intersection_trigger(watcher, container, margin_px);
        trigger.observe(&top);
        trigger.observe(&bottom);
        let attributes = platform.attribute_watch(watcher, &top);
        Self {
            top,
            bottom,
            trigger: Some(trigger),
            attributes: Some(attributes),
        }
    }

    pub fn top(&self) -> &P::Node {
        &self.top
    }

    pub fn bottom(&self) -> &P::Node {
        &self.bottom
    }

    /// Whether the pair still holds live observers.
    pub fn is_live(&self) -> bool {
        self.trigger.is_some()
    }

    /// Unobserves and re-observes both sentinels on the same trigger.
    ///
    /// An in-place mutation of a sentinel can desynchronize the trigger's
    /// cached geometry; cycling the observation forces the platform to
    /// recompute it and re-report current state. No-op after [`Self::stop`].
    pub fn rearm(&mut self) {
        let Some(trigger) = self.trigger.as_mut() else {
            return;
        };
        trigger.unobserve(&self.top);
        trigger.unobserve(&self.bottom);
        trigger.observe(&self.top);
        trigger.observe(&self.bottom);
    }

    /// Disconnects the intersection trigger and the attribute watch.
    ///
    /// Safe to call multiple times; this is the only path that releases
    /// observation resources.
    pub fn stop(&mut self) {
        if let Some(mut trigger) = self.trigger.take() {
            trigger.disconnect();
        }
        if let Some(mut attributes) = self.attributes.take() {
            attributes.disconnect();
        }
    }
}

impl<P: Platform> core::fmt::Debug for EdgeObserverPair<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EdgeObserverPair")
            .field("live", &self.is_live())
            .finish_non_exhaustive()
    }
}
