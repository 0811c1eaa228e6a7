/// Which sentinel crossed a boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    /// The "before content" marker; crossing it means the user approaches
    /// the start of rendered content.
    Top,
    /// The "after content" marker; crossing it means the user approaches
    /// the end of rendered content.
    Bottom,
}

/// Computed vertical-overflow policy of an element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Scroll,
    Auto,
    Clip,
}

impl Overflow {
    /// Whether this policy clips content, making the element a scroll
    /// container for boundary measurement.
    pub fn clips(&self) -> bool {
        !matches!(self, Self::Visible)
    }
}

/// Vertical extent of an element or region, in host pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub top: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Identity of one active virtualization instance.
///
/// The same key is used on every path: registration, batch delivery,
/// mutation reports, disposal. Hosts typically mint one per list controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WatcherId(pub u64);

/// One observation reported by a platform intersection trigger.
///
/// Geometry is reduced to the vertical axis the watcher measures:
/// `target_bounds` is the sentinel's own extent, `visible_bounds` is that
/// extent clipped to the container's visible region, and `container_bounds`
/// is the visible region itself when the platform can resolve it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntersectionEntry<N> {
    pub target: N,
    /// `true` when the target newly overlaps the margin-inflated region,
    /// `false` when it is leaving it.
    pub is_entering: bool,
    pub target_bounds: Bounds,
    pub visible_bounds: Bounds,
    pub container_bounds: Option<Bounds>,
}

/// A normalized boundary-crossing signal.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundaryEvent {
    pub edge: Edge,
    /// Signed distance between the sentinel's edge and the visible region's
    /// edge, in pixels. Positive means the sentinel is past the boundary by
    /// that much; controllers use it to size the next render batch.
    pub distance: f64,
    /// The container's height at crossing time, when resolvable.
    pub container_size: Option<f64>,
}
