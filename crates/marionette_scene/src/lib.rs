//! Runtime model for the Marionette engine.
//!
//! Owns the posable data and the per-frame systems that act on it:
//! - [`Node`] / [`Transform`]: single-owner hierarchy in a slotmap arena
//! - [`Mesh`] / [`Bone`]: triangle lists with linear blend skinning data
//! - [`Model`]: node list, name index, materials, textures, clips, bounds
//! - [`pose`], [`transform_system`], [`skinning`]: the tick pipeline, run in
//!   that order

pub mod bounds;
pub mod material;
pub mod mesh;
pub mod model;
pub mod node;
pub mod pose;
pub mod skinning;
pub mod texture;
pub mod transform;
pub mod transform_system;

pub use material::Material;
pub use mesh::{Bone, Mesh, VertexWeight};
pub use model::{DrawItem, DuplicateNamePolicy, MeshInfo, Model, NodeTree};
pub use node::Node;
pub use texture::Texture;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
}
