use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use scrollwatch::{BoundaryController, Edge, WatcherId};

/// One queued boundary notification.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Notification {
    pub edge: Edge,
    pub distance: f64,
    pub container_size: Option<f64>,
}

/// Creates a queue-backed controller for `id`.
///
/// The returned controller implements [`BoundaryController`] by sending each
/// notification into the queue without blocking, which keeps slow controller
/// work off the watcher's delivery path. The queue end is single-consumer:
/// whatever task owns it drains notifications at its own pace, in dispatch
/// order.
pub fn notification_queue(id: WatcherId) -> (Arc<QueuedController>, NotificationQueue) {
    let (tx, rx) = mpsc::channel();
    let released = Arc::new(AtomicBool::new(false));
    let controller = Arc::new(QueuedController {
        id,
        tx,
        released: Arc::clone(&released),
    });
    (controller, NotificationQueue { rx, released })
}

/// The producing side: a [`BoundaryController`] that forwards notifications
/// into the queue.
pub struct QueuedController {
    id: WatcherId,
    tx: Sender<Notification>,
    released: Arc<AtomicBool>,
}

impl QueuedController {
    fn push(&self, notification: Notification) {
        // The consumer may already be gone; dispatch is fire-and-forget
        // either way.
        let _ = self.tx.send(notification);
    }
}

impl BoundaryController for QueuedController {
    fn id(&self) -> WatcherId {
        self.id
    }

    fn on_top_approached(&self, distance: f64, container_size: Option<f64>) {
        self.push(Notification {
            edge: Edge::Top,
            distance,
            container_size,
        });
    }

    fn on_bottom_approached(&self, distance: f64, container_size: Option<f64>) {
        self.push(Notification {
            edge: Edge::Bottom,
            distance,
            container_size,
        });
    }

    fn release(&self) {
        self.released.store(true, Ordering::Release);
    }
}

impl fmt::Debug for QueuedController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueuedController")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// The single-consumer end of a notification queue.
pub struct NotificationQueue {
    rx: Receiver<Notification>,
    released: Arc<AtomicBool>,
}

impl NotificationQueue {
    /// Takes the next queued notification, if any. Never blocks.
    pub fn try_next(&self) -> Option<Notification> {
        self.rx.try_recv().ok()
    }

    /// Drains every queued notification into `f`, in dispatch order.
    ///
    /// Returns the number drained.
    pub fn drain(&self, mut f: impl FnMut(Notification)) -> usize {
        let mut drained = 0;
        while let Some(notification) = self.try_next() {
            f(notification);
            drained += 1;
        }
        drained
    }

    /// Whether the controller has been released by `unregister`.
    ///
    /// Notifications already queued stay drainable after release: a dispatch
    /// racing disposal is allowed to land, and the consumer decides whether
    /// to act on it.
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}

impl fmt::Debug for NotificationQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationQueue")
            .field("released", &self.is_released())
            .finish_non_exhaustive()
    }
}
