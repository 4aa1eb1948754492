//! Bone weight normalization.
//!
//! Authoring tools can leave vertices whose weights sum to slightly more or
//! less than one, which shows up as shrinking or bulging skin once posed.

use std::collections::BTreeMap;

use marionette_core::{MarionetteError, Result};
use marionette_scene::Mesh;
use smallvec::SmallVec;

/// `(bone index, weight index)` of every weight touching one vertex.
type WeightRefs = SmallVec<[(usize, usize); 4]>;

/// Rescales the weights of every vertex so they sum to exactly one.
///
/// Vertices are visited in ascending index order; the first one whose total
/// is zero, negative or NaN fails the whole mesh. Vertices no bone references
/// are left alone. Unskinned meshes are a no-op.
pub fn normalize_weights(mesh: &mut Mesh) -> Result<()> {
    if !mesh.is_skinned() {
        return Ok(());
    }

    let mut refs: BTreeMap<u32, WeightRefs> = BTreeMap::new();
    for (b, bone) in mesh.bones().iter().enumerate() {
        for (w, weight) in bone.weights.iter().enumerate() {
            refs.entry(weight.vertex).or_default().push((b, w));
        }
    }

    let mesh_name = mesh.name.clone();
    let bones = mesh.bones_mut();

    for (&vertex, entries) in &refs {
        let sum: f32 = entries
            .iter()
            .map(|&(b, w)| bones[b].weights[w].weight)
            .sum();

        if sum <= 0.0 || sum.is_nan() {
            return Err(MarionetteError::DegenerateWeights {
                mesh: mesh_name,
                vertex,
                sum,
            });
        }

        let scale = 1.0 / sum;
        for &(b, w) in entries {
            bones[b].weights[w].weight *= scale;
        }
    }

    log::debug!(
        "Normalized weights of {} vertices in mesh '{}'",
        refs.len(),
        mesh_name
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use glam::{Affine3A, Vec3};
    use marionette_scene::{Bone, NodeHandle, VertexWeight};

    use super::*;

    fn mesh_with_weights(weights: &[&[(u32, f32)]]) -> Mesh {
        let mut mesh = Mesh::new("skin", vec![Vec3::ZERO; 3], vec![0, 1, 2], 0);
        let bones = weights
            .iter()
            .enumerate()
            .map(|(i, ws)| Bone {
                name: format!("bone{i}"),
                node: NodeHandle::default(),
                offset: Affine3A::IDENTITY,
                weights: ws
                    .iter()
                    .map(|&(vertex, weight)| VertexWeight { vertex, weight })
                    .collect(),
            })
            .collect();
        mesh.set_bones(bones).unwrap();
        mesh
    }

    fn vertex_sum(mesh: &Mesh, vertex: u32) -> f32 {
        mesh.bones()
            .iter()
            .flat_map(|b| b.weights.iter())
            .filter(|w| w.vertex == vertex)
            .map(|w| w.weight)
            .sum()
    }

    #[test]
    fn sums_become_one() {
        let mut mesh = mesh_with_weights(&[&[(0, 0.3), (1, 2.0)], &[(0, 0.3), (2, 0.25)]]);
        normalize_weights(&mut mesh).unwrap();

        for v in 0..3 {
            assert!((vertex_sum(&mesh, v) - 1.0).abs() < 1e-5, "vertex {v}");
        }
        assert!((mesh.bones()[0].weights[0].weight - 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_sum_is_rejected() {
        let mut mesh = mesh_with_weights(&[&[(0, 1.0), (2, 0.0)]]);
        let err = normalize_weights(&mut mesh).unwrap_err();
        match err {
            MarionetteError::DegenerateWeights { mesh, vertex, sum } => {
                assert_eq!(mesh, "skin");
                assert_eq!(vertex, 2);
                assert!(sum.abs() < f32::EPSILON);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unskinned_mesh_is_untouched() {
        let mut mesh = Mesh::new("static", vec![Vec3::ONE], Vec::new(), 0);
        normalize_weights(&mut mesh).unwrap();
        assert!(mesh.bones().is_empty());
    }
}
