//! A headless boundary watcher for virtualized scrolling lists.
//!
//! For host-side utilities (dispatch queue, in-memory simulator), see the
//! `scrollwatch-adapter` crate.
//!
//! `scrollwatch` decides *when* a long scrollable list is about to run out of
//! rendered content: it watches a pair of sentinel elements placed before and
//! after the rendered window and signals the host controller as a sentinel
//! approaches the visible edge, with enough lead margin to materialize items
//! before the user reaches the physical edge. Deciding how many items to add
//! or remove, and rendering them, is the controller's job, not this crate's.
//!
//! It is UI-agnostic. A host layer (DOM binding, TUI, simulator) is expected
//! to provide:
//! - element handles with parent and computed-overflow queries
//! - intersection triggers and attribute watches (the [`Platform`] traits)
//! - delivery of the batches those triggers produce ([`BoundaryWatcher::deliver`])
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod error;
mod observer;
mod options;
mod platform;
mod resolver;
mod router;
mod types;
mod watcher;

#[cfg(test)]
mod tests;

pub use controller::{ApproachHandler, BoundaryController, CallbackController, ReleaseHandler};
pub use error::WatchError;
pub use observer::EdgeObserverPair;
pub use options::WatcherOptions;
pub use platform::{AttributeWatch, IntersectionTrigger, Platform};
pub use resolver::resolve_scroll_container;
pub use types::{BoundaryEvent, Bounds, Edge, IntersectionEntry, Overflow, WatcherId};
pub use watcher::BoundaryWatcher;
