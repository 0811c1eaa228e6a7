/// Configuration for [`crate::BoundaryWatcher`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WatcherOptions {
    /// Margin applied around the scroll container when detecting crossings,
    /// in pixels.
    ///
    /// A sentinel within this distance of the visible edge already counts as
    /// crossing, giving the controller lead time to render items before the
    /// user reaches the physical edge.
    pub margin_px: f64,

    /// Upper bound on ancestor-chain traversal when resolving the scroll
    /// container. Walks that exhaust the bound fall back to the viewport.
    pub max_ancestor_depth: usize,
}

impl WatcherOptions {
    pub fn new() -> Self {
        Self {
            margin_px: 50.0,
            max_ancestor_depth: 1024,
        }
    }

    pub fn with_margin_px(mut self, margin_px: f64) -> Self {
        self.margin_px = margin_px;
        self
    }

    pub fn with_max_ancestor_depth(mut self, max_ancestor_depth: usize) -> Self {
        self.max_ancestor_depth = max_ancestor_depth;
        self
    }
}

impl Default for WatcherOptions {
    fn default() -> Self {
        Self::new()
    }
}
