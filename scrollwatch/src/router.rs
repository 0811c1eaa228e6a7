use crate::{BoundaryController, BoundaryEvent, Edge, IntersectionEntry, WatchError};

/// Classifies one platform entry against the registered sentinel pair.
///
/// Entries that are leaving the margin yield `Ok(None)`: virtualization only
/// reacts to "about to run out of rendered items", not to scrolling back in.
pub(crate) fn event_for<N: PartialEq>(
    top: &N,
    bottom: &N,
    entry: &IntersectionEntry<N>,
) -> Result<Option<BoundaryEvent>, WatchError> {
    if !entry.is_entering {
        return Ok(None);
    }

    let container_size = entry.container_bounds.map(|bounds| bounds.height());

    if entry.target == *top {
        Ok(Some(BoundaryEvent {
            edge: Edge::Top,
            distance: entry.visible_bounds.top - entry.target_bounds.top,
            container_size,
        }))
    } else if entry.target == *bottom {
        Ok(Some(BoundaryEvent {
            edge: Edge::Bottom,
            distance: entry.target_bounds.bottom - entry.visible_bounds.bottom,
            container_size,
        }))
    } else {
        wwarn!("intersection entry targets an unregistered element");
        Err(WatchError::UnknownTarget)
    }
}

/// Routes one delivered batch to `controller`, in platform order.
///
/// Each genuine crossing dispatches the matching handler exactly once.
/// Returns the number of notifications dispatched.
pub(crate) fn route_batch<N: PartialEq>(
    top: &N,
    bottom: &N,
    entries: &[IntersectionEntry<N>],
    controller: &dyn BoundaryController,
) -> Result<usize, WatchError> {
    let mut dispatched = 0usize;
    for entry in entries {
        let Some(event) = event_for(top, bottom, entry)? else {
            continue;
        };
        wtrace!(
            edge = ?event.edge,
            distance = event.distance,
            "boundary crossing"
        );
        match event.edge {
            Edge::Top => controller.on_top_approached(event.distance, event.container_size),
            Edge::Bottom => controller.on_bottom_approached(event.distance, event.container_size),
        }
        dispatched += 1;
    }
    Ok(dispatched)
}
