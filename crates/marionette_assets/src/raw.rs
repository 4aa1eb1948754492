//! Decoded interchange scene, as handed over by a front-end parser.
//!
//! Pure data: no handles, no engine types, nothing resolved yet. Matrices are
//! 16 floats in column-major order, vectors are plain arrays, quaternions are
//! `[x, y, z, w]`. Everything is serde-friendly so a parser living in another
//! process can ship a scene as JSON.

use std::io::Read;

use glam::{Affine3A, Mat4, Quat, Vec2, Vec3, Vec4};
use marionette_core::Result;
use serde::{Deserialize, Serialize};

fn identity_matrix() -> [f32; 16] {
    Mat4::IDENTITY.to_cols_array()
}

/// Converts a column-major 4x4 into the affine form the engine works with.
/// The projective row is dropped.
#[must_use]
pub fn affine_from_cols(cols: &[f32; 16]) -> Affine3A {
    Affine3A::from_mat4(Mat4::from_cols_array(cols))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawScene {
    /// Absent when the parser produced no hierarchy; building then fails.
    #[serde(default)]
    pub root: Option<RawNode>,
    #[serde(default)]
    pub meshes: Vec<RawMesh>,
    #[serde(default)]
    pub materials: Vec<RawMaterial>,
    #[serde(default)]
    pub animations: Vec<RawAnimation>,
}

impl RawScene {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub name: String,
    #[serde(default = "identity_matrix")]
    pub transform: [f32; 16],
    /// Indices into [`RawScene::meshes`]. The same mesh may appear under
    /// several nodes.
    #[serde(default)]
    pub meshes: Vec<usize>,
    #[serde(default)]
    pub children: Vec<RawNode>,
}

impl RawNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: identity_matrix(),
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Affine3A) -> Self {
        self.transform = Mat4::from(transform).to_cols_array();
        self
    }

    #[must_use]
    pub fn with_meshes(mut self, meshes: Vec<usize>) -> Self {
        self.meshes = meshes;
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: RawNode) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn local_matrix(&self) -> Affine3A {
        affine_from_cols(&self.transform)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMesh {
    #[serde(default)]
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    #[serde(default)]
    pub normals: Option<Vec<[f32; 3]>>,
    /// First UV set only.
    #[serde(default)]
    pub uvs: Option<Vec<[f32; 2]>>,
    /// First color set only, RGBA.
    #[serde(default)]
    pub colors: Option<Vec<[f32; 4]>>,
    /// Must all be triangles.
    #[serde(default)]
    pub faces: Vec<Vec<u32>>,
    #[serde(default)]
    pub material_index: usize,
    #[serde(default)]
    pub bones: Vec<RawBone>,
}

impl RawMesh {
    pub(crate) fn positions(&self) -> Vec<Vec3> {
        self.positions.iter().copied().map(Vec3::from_array).collect()
    }

    pub(crate) fn normals(&self) -> Option<Vec<Vec3>> {
        self.normals
            .as_ref()
            .map(|n| n.iter().copied().map(Vec3::from_array).collect())
    }

    pub(crate) fn uvs(&self) -> Option<Vec<Vec2>> {
        self.uvs
            .as_ref()
            .map(|uv| uv.iter().copied().map(Vec2::from_array).collect())
    }

    pub(crate) fn colors(&self) -> Option<Vec<Vec4>> {
        self.colors
            .as_ref()
            .map(|c| c.iter().copied().map(Vec4::from_array).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBone {
    /// Name of the node driving this bone.
    pub name: String,
    /// Mesh space to bone space, column-major.
    #[serde(default = "identity_matrix")]
    pub offset: [f32; 16],
    #[serde(default)]
    pub weights: Vec<RawWeight>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawWeight {
    pub vertex: u32,
    pub weight: f32,
}

/// Colors are RGB; alpha is always 1 once imported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMaterial {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub diffuse: Option<[f32; 3]>,
    #[serde(default)]
    pub ambient: Option<[f32; 3]>,
    #[serde(default)]
    pub specular: Option<[f32; 3]>,
    #[serde(default)]
    pub emissive: Option<[f32; 3]>,
    #[serde(default)]
    pub shininess: Option<f32>,
    /// Diffuse texture path as written by the authoring tool.
    #[serde(default)]
    pub texture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAnimation {
    #[serde(default)]
    pub name: String,
    /// In the same unit as the key times.
    pub duration: f32,
    #[serde(default)]
    pub channels: Vec<RawNodeAnim>,
}

/// Keys for one node. An empty key list means the channel is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNodeAnim {
    pub node_name: String,
    #[serde(default)]
    pub position_keys: Vec<RawVectorKey>,
    #[serde(default)]
    pub rotation_keys: Vec<RawQuatKey>,
    #[serde(default)]
    pub scaling_keys: Vec<RawVectorKey>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawVectorKey {
    pub time: f32,
    pub value: [f32; 3],
}

impl RawVectorKey {
    #[must_use]
    pub fn new(time: f32, value: Vec3) -> Self {
        Self {
            time,
            value: value.to_array(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawQuatKey {
    pub time: f32,
    /// `[x, y, z, w]`
    pub value: [f32; 4],
}

impl RawQuatKey {
    #[must_use]
    pub fn new(time: f32, value: Quat) -> Self {
        Self {
            time,
            value: value.to_array(),
        }
    }
}
