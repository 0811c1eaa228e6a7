use crate::Platform;

/// Returns the nearest ancestor of `node` (inclusive) whose computed
/// vertical overflow clips content, or `None` when no such ancestor exists
/// up to the tree root, meaning the viewport itself is the scroll
/// container.
///
/// The walk is iterative and bounded by `max_depth`; exhausting the bound
/// behaves like reaching the root. Called once per registration, so no
/// memoization.
pub fn resolve_scroll_container<P: Platform>(
    platform: &P,
    node: &P::Node,
    max_depth: usize,
) -> Option<P::Node> {
    let mut current = node.clone();
    for _ in 0..max_depth {
        if platform.overflow_y(&current).clips() {
            return Some(current);
        }
        current = platform.parent(&current)?;
    }
    wdebug!(max_depth, "scroll container resolution hit the depth bound");
    None
}
