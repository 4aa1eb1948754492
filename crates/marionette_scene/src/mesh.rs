use glam::{Affine3A, Vec2, Vec3, Vec4};
use marionette_core::{MarionetteError, Result};

use crate::NodeHandle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexWeight {
    pub vertex: u32,
    pub weight: f32,
}

/// A bone influencing some vertices of one mesh.
#[derive(Debug, Clone)]
pub struct Bone {
    /// Name of the node whose world transform drives this bone.
    pub name: String,
    /// That node, resolved through the model's name index.
    pub node: NodeHandle,
    /// Maps mesh bind-pose space into the bone's local space.
    pub offset: Affine3A,
    pub weights: Vec<VertexWeight>,
}

/// Undeformed copy of a skinned mesh's vertex data. Skinning reads it, never
/// writes it.
#[derive(Debug, Clone)]
struct BindPose {
    positions: Vec<Vec3>,
    normals: Option<Vec<Vec3>>,
}

/// Indexed triangle list with optional skinning data.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,

    // === Live vertex data (posed when skinned) ===
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    pub uvs: Option<Vec<Vec2>>,
    pub colors: Option<Vec<Vec4>>,
    pub indices: Vec<u32>,

    pub material_index: usize,

    // === Skinning ===
    bones: Vec<Bone>,
    bind_pose: Option<BindPose>,
}

impl Mesh {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        material_index: usize,
    ) -> Self {
        Self {
            name: name.into(),
            positions,
            normals: None,
            uvs: None,
            colors: None,
            indices,
            material_index,
            bones: Vec::new(),
            bind_pose: None,
        }
    }

    #[must_use]
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = Some(normals);
        self
    }

    #[must_use]
    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: Vec<Vec4>) -> Self {
        self.colors = Some(colors);
        self
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    // ========================================================================
    // Skinning
    // ========================================================================

    /// Attaches bones and snapshots the current positions / normals as the
    /// bind pose.
    ///
    /// Fails when a weight refers to a vertex the mesh does not have. An empty
    /// bone list leaves the mesh unskinned.
    pub fn set_bones(&mut self, bones: Vec<Bone>) -> Result<()> {
        let vertex_count = self.positions.len();
        for bone in &bones {
            if let Some(w) = bone.weights.iter().find(|w| w.vertex as usize >= vertex_count) {
                return Err(MarionetteError::InvalidScene(format!(
                    "bone '{}' of mesh '{}' weights vertex {} but the mesh has {} vertices",
                    bone.name, self.name, w.vertex, vertex_count
                )));
            }
        }

        if bones.is_empty() {
            self.bones.clear();
            self.bind_pose = None;
            return Ok(());
        }

        self.bones = bones;
        self.bind_pose = Some(BindPose {
            positions: self.positions.clone(),
            normals: self.normals.clone(),
        });
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn is_skinned(&self) -> bool {
        self.bind_pose.is_some()
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Mutable access to the bones. The bone set itself is fixed; weights
    /// naming a vertex the mesh does not have are ignored by skinning.
    #[inline]
    pub fn bones_mut(&mut self) -> &mut [Bone] {
        &mut self.bones
    }

    #[must_use]
    pub fn bind_positions(&self) -> Option<&[Vec3]> {
        self.bind_pose.as_ref().map(|b| b.positions.as_slice())
    }

    #[must_use]
    pub fn bind_normals(&self) -> Option<&[Vec3]> {
        self.bind_pose.as_ref().and_then(|b| b.normals.as_deref())
    }

    /// Linear blend skinning.
    ///
    /// `bone_matrices[i]` is the combined matrix of `bones()[i]`, already
    /// expressed in this mesh's local space. The live arrays are zeroed and
    /// every weighted, transformed bind-pose vertex is accumulated into them.
    /// Normals use the linear part of each matrix only.
    pub fn apply_skin(&mut self, bone_matrices: &[Affine3A]) {
        let Some(bind) = &self.bind_pose else {
            return;
        };

        self.positions.fill(Vec3::ZERO);
        if let Some(normals) = &mut self.normals {
            normals.fill(Vec3::ZERO);
        }

        for (bone, matrix) in self.bones.iter().zip(bone_matrices) {
            for w in &bone.weights {
                let i = w.vertex as usize;
                if let (Some(p), Some(&b)) = (self.positions.get_mut(i), bind.positions.get(i)) {
                    *p += w.weight * matrix.transform_point3(b);
                }
            }

            if let (Some(normals), Some(bind_normals)) = (&mut self.normals, &bind.normals) {
                for w in &bone.weights {
                    let i = w.vertex as usize;
                    if let (Some(n), Some(&b)) = (normals.get_mut(i), bind_normals.get(i)) {
                        *n += w.weight * matrix.transform_vector3(b);
                    }
                }
            }
        }
    }

    /// Copies the bind pose back into the live arrays.
    pub fn restore_bind_pose(&mut self) {
        let Some(bind) = &self.bind_pose else {
            return;
        };

        self.positions.clone_from(&bind.positions);
        if let (Some(normals), Some(bind_normals)) = (&mut self.normals, &bind.normals) {
            normals.clone_from(bind_normals);
        }
    }
}
