//! Host-side utilities for the `scrollwatch` crate.
//!
//! The `scrollwatch` crate is headless and focuses on boundary detection and
//! routing. This crate provides small, framework-neutral helpers commonly
//! needed by hosts:
//!
//! - A single-consumer notification queue, so controller work runs off the
//!   watcher's delivery path (fire-and-forget dispatch)
//! - `SimHost`, an in-memory reference platform for tests and examples
//!
//! This crate is intentionally framework-agnostic (no DOM/TUI bindings).
#![forbid(unsafe_code)]

mod queue;
mod sim;


pub use queue::{notification_queue, Notification, NotificationQueue, QueuedController};
pub use sim::{NodeId, SimAttributeWatch, SimHost, SimIntersection, SimStats};
