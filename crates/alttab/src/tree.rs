//! Layout tree helpers.

use focus_tracker::WindowId;
use swayipc_async::Node;

/// Depth-first search for the focused node, tiling children before
/// floating ones.
pub fn find_focused(node: &Node) -> Option<&Node> {
    if node.focused {
        return Some(node);
    }
    node.nodes
        .iter()
        .chain(node.floating_nodes.iter())
        .find_map(find_focused)
}

/// Window focused in `tree`, or [`WindowId::UNKNOWN`] when nothing is.
pub fn focused_window(tree: &Node) -> WindowId {
    find_focused(tree).map_or(WindowId::UNKNOWN, |node| WindowId::new(node.id))
}
