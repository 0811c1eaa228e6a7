//! An infinite feed driven end-to-end through the simulator: scrolling moves
//! the sentinels, boundary crossings land in the notification queue, and the
//! "controller" answers by rendering more rows and pushing the bottom
//! sentinel further down.

use scrollwatch::{BoundaryWatcher, Bounds, Edge, Overflow, WatcherId};
use scrollwatch_adapter::{notification_queue, SimHost};

const ROW_PX: f64 = 40.0;
const VIEW_PX: f64 = 400.0;

fn main() {
    let mut host = SimHost::new(Bounds::new(0.0, VIEW_PX));
    let container = host.node(None, Overflow::Auto, Bounds::new(0.0, VIEW_PX));

    // 15 rendered rows to start with; sentinels bracket the rendered window.
    let mut rendered = 15usize;
    let mut scroll = 0.0f64;
    let top = host.node(Some(container), Overflow::Visible, Bounds::new(-4.0, 0.0));
    let bottom = host.node(
        Some(container),
        Overflow::Visible,
        Bounds::new(rendered as f64 * ROW_PX, rendered as f64 * ROW_PX + 4.0),
    );

    let (controller, queue) = notification_queue(WatcherId(1));
    let mut watcher = BoundaryWatcher::new();
    let id = watcher.register(&mut host, controller, top, bottom);

    for tick in 0..10 {
        // Content scrolls up under the container by one step per tick.
        scroll += 150.0;
        host.set_bounds(top, Bounds::new(-4.0 - scroll, -scroll));
        let end = rendered as f64 * ROW_PX - scroll;
        host.set_bounds(bottom, Bounds::new(end, end + 4.0));

        let dispatched = host.deliver_all(&watcher).expect("sentinels are wired");
        queue.drain(|n| match n.edge {
            Edge::Top => {
                println!("tick {tick}: top approached ({}px); nothing earlier to load", n.distance);
            }
            Edge::Bottom => {
                let add = (n.distance / ROW_PX).ceil() as usize + 2;
                rendered += add;
                println!(
                    "tick {tick}: bottom approached ({}px past the edge); rendering {add} more rows ({rendered} total)",
                    n.distance
                );

                // Re-rendering rewrites both sentinels in place; the watched
                // top sentinel's attribute change re-arms the observer pair.
                let end = rendered as f64 * ROW_PX - scroll;
                host.set_bounds(bottom, Bounds::new(end, end + 4.0));
                host.mutate(top);
            }
        });
        for fired in host.take_mutations() {
            watcher.sentinel_mutated(fired);
        }
        if dispatched == 0 {
            println!("tick {tick}: cruising");
        }
    }

    watcher.unregister(id);
    println!("feed torn down; queue released: {}", queue.is_released());
}
