//! Transform System
//!
//! Recomputes world matrices (and their inverses) over the node hierarchy.
//! Decoupled from [`crate::Model`] so it only borrows the node arena.
//!
//! Every pass is pre-order: a node's world matrix is computed from its
//! parent's world matrix of the *same* pass, so a parent is always visited
//! before any of its children.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::NodeHandle;
use crate::node::Node;

/// Propagates world matrices through the subtree rooted at `node_handle`.
///
/// `global = parent_global * local`, `global_inverse = inverse(global)`.
pub fn propagate(
    nodes: &mut SlotMap<NodeHandle, Node>,
    node_handle: NodeHandle,
    parent_world_matrix: Affine3A,
) {
    let (world, child_count) = {
        let Some(node) = nodes.get_mut(node_handle) else {
            return;
        };
        let world = parent_world_matrix * *node.transform.local_matrix();
        node.transform.set_world_matrix(world);
        (world, node.children.len())
    };

    for i in 0..child_count {
        let Some(&child) = nodes.get(node_handle).and_then(|n| n.children.get(i)) else {
            break;
        };
        propagate(nodes, child, world);
    }
}

/// Updates the whole hierarchy starting at `root` with an identity parent.
pub fn update_hierarchy(nodes: &mut SlotMap<NodeHandle, Node>, root: NodeHandle) {
    propagate(nodes, root, Affine3A::IDENTITY);
}

/// Same result as [`update_hierarchy`], using an explicit stack instead of
/// recursion so deep skeletons cannot overflow the call stack.
pub fn update_hierarchy_iterative(nodes: &mut SlotMap<NodeHandle, Node>, root: NodeHandle) {
    // (node, parent world matrix)
    let mut stack: Vec<(NodeHandle, Affine3A)> = Vec::with_capacity(64);
    stack.push((root, Affine3A::IDENTITY));

    while let Some((node_handle, parent_world_matrix)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_handle) else {
            continue;
        };

        let world = parent_world_matrix * *node.transform.local_matrix();
        node.transform.set_world_matrix(world);

        // Reverse push keeps authored child order when popping.
        for &child in node.children.iter().rev() {
            stack.push((child, world));
        }
    }
}

/// Re-propagates a single subtree, taking the parent's current world matrix
/// as the starting point.
pub fn update_subtree(nodes: &mut SlotMap<NodeHandle, Node>, subtree_root: NodeHandle) {
    let Some(node) = nodes.get(subtree_root) else {
        return;
    };
    let parent_world = node
        .parent
        .and_then(|p| nodes.get(p))
        .map_or(Affine3A::IDENTITY, |p| *p.transform.world_matrix());

    propagate(nodes, subtree_root, parent_world);
}
