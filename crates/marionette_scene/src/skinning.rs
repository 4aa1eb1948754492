//! Skinning system: re-poses skinned meshes from the current world matrices.

use glam::Affine3A;
use marionette_core::{MarionetteError, Result};
use slotmap::SlotMap;

use crate::NodeHandle;
use crate::node::Node;

/// Recomputes every skinned mesh reachable from `node_list`.
///
/// Must run after propagation. Per bone the combined matrix is
/// `mesh_node.world_inverse * bone_node.world * bone.offset`: the inverse of
/// the node that owns the mesh (not the bone's node) brings the bone's world
/// influence back into mesh space.
///
/// A bone whose node is not in the arena is an [`MarionetteError::UnknownNode`].
pub fn skin(nodes: &mut SlotMap<NodeHandle, Node>, node_list: &[NodeHandle]) -> Result<()> {
    let mut bone_matrices: Vec<Affine3A> = Vec::new();

    for &handle in node_list {
        let mesh_count = match nodes.get(handle) {
            Some(node) if node.has_skinned_mesh() => node.meshes.len(),
            _ => continue,
        };

        for mesh_idx in 0..mesh_count {
            bone_matrices.clear();
            {
                let node = &nodes[handle];
                let mesh = &node.meshes[mesh_idx];
                if !mesh.is_skinned() {
                    continue;
                }

                let mesh_world_inverse = *node.transform.world_inverse();
                for bone in mesh.bones() {
                    let bone_node =
                        nodes
                            .get(bone.node)
                            .ok_or_else(|| MarionetteError::UnknownNode {
                                name: bone.name.clone(),
                                referenced_by: format!("a bone of mesh '{}'", mesh.name),
                            })?;
                    bone_matrices.push(
                        mesh_world_inverse * *bone_node.transform.world_matrix() * bone.offset,
                    );
                }
            }

            if let Some(node) = nodes.get_mut(handle) {
                node.meshes[mesh_idx].apply_skin(&bone_matrices);
            }
        }
    }
    Ok(())
}
