//! World-space bounds of a posed model.

use marionette_core::{Aabb, Result};
use slotmap::SlotMap;

use crate::NodeHandle;
use crate::model::Model;
use crate::node::Node;

/// Folds every live vertex, moved into world space by its node's world
/// matrix, into one box.
#[must_use]
pub fn world_vertex_bounds(nodes: &SlotMap<NodeHandle, Node>, node_list: &[NodeHandle]) -> Aabb {
    let mut aabb = Aabb::EMPTY;
    for &handle in node_list {
        let Some(node) = nodes.get(handle) else {
            continue;
        };
        let world = node.transform.world_matrix();
        for mesh in &node.meshes {
            for &v in &mesh.positions {
                aabb.extend(world.transform_point3(v));
            }
        }
    }
    aabb
}

impl Model {
    /// Computes and stores the model's bounds.
    ///
    /// Propagates, and when the model is animated also poses clip 0 at time
    /// zero and skins, so the box reflects that pose. Later frames are not
    /// considered: the result is an approximation meant for camera framing.
    /// The model is left in the pose used for the measurement.
    pub fn compute_aabb(&mut self) -> Result<Aabb> {
        self.propagate();
        if self.has_animation() {
            self.update(0, 0.0)?;
        }

        let aabb = world_vertex_bounds(self.arena(), self.node_list());
        self.set_aabb(aabb);
        Ok(aabb)
    }
}
