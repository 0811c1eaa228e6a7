use alloc::sync::Arc;

use crate::WatcherId;

/// A handler invoked when a sentinel approaches a boundary.
///
/// Arguments are the signed distance past the visible edge and the
/// container's height when resolvable.
pub type ApproachHandler = Arc<dyn Fn(f64, Option<f64>) + Send + Sync>;

/// A handler invoked after a controller's observers are torn down.
pub type ReleaseHandler = Arc<dyn Fn() + Send + Sync>;

/// The capability contract a host controller exposes to the watcher.
///
/// Handlers are dispatched fire-and-forget from the delivery path: they must
/// return promptly (hand real work to a queue or task, like the
/// `scrollwatch-adapter` queue does) and never block. The watcher does not await
/// completion and will not delay later deliveries on a slow controller.
pub trait BoundaryController: Send + Sync {
    /// Identity used as the registry key. Must be stable for the lifetime of
    /// the registration.
    fn id(&self) -> WatcherId;

    /// The top sentinel entered the margin: the user is approaching the
    /// start of rendered content.
    fn on_top_approached(&self, distance: f64, container_size: Option<f64>);

    /// The bottom sentinel entered the margin: the user is approaching the
    /// end of rendered content.
    fn on_bottom_approached(&self, distance: f64, container_size: Option<f64>);

    /// Called by [`crate::BoundaryWatcher::unregister`] after the observers
    /// are torn down, giving the controller a chance to free its own
    /// resources.
    fn release(&self) {}
}

/// A [`BoundaryController`] packaged from closures, for hosts that don't
/// want a dedicated controller type.
#[derive(Clone)]
pub struct CallbackController {
    id: WatcherId,
    on_top: ApproachHandler,
    on_bottom: ApproachHandler,
    on_release: Option<ReleaseHandler>,
}

impl CallbackController {
    pub fn new(
        id: WatcherId,
        on_top: impl Fn(f64, Option<f64>) + Send + Sync + 'static,
        on_bottom: impl Fn(f64, Option<f64>) + Send + Sync + 'static,
    ) -> Self {
        Self {
            id,
            on_top: Arc::new(on_top),
            on_bottom: Arc::new(on_bottom),
            on_release: None,
        }
    }

    pub fn with_on_release(mut self, on_release: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_release = Some(Arc::new(on_release));
        self
    }
}

impl BoundaryController for CallbackController {
    fn id(&self) -> WatcherId {
        self.id
    }

    fn on_top_approached(&self, distance: f64, container_size: Option<f64>) {
        (self.on_top)(distance, container_size);
    }

    fn on_bottom_approached(&self, distance: f64, container_size: Option<f64>) {
        (self.on_bottom)(distance, container_size);
    }

    fn release(&self) {
        if let Some(on_release) = &self.on_release {
            on_release();
        }
    }
}

impl core::fmt::Debug for CallbackController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CallbackController")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
