//! Scene import for the Marionette engine.
//!
//! A front-end parser hands over a [`RawScene`]; [`SceneBuilder`] validates
//! it and produces a posable [`marionette_scene::Model`].

pub mod builder;
pub mod raw;
pub mod settings;
pub mod texture;
pub mod weights;

pub use builder::{SceneBuilder, build};
pub use raw::{
    RawAnimation, RawBone, RawMaterial, RawMesh, RawNode, RawNodeAnim, RawQuatKey, RawScene,
    RawVectorKey, RawWeight,
};
pub use settings::ImportSettings;
pub use texture::{FileTextureLoader, NullTextureLoader, TextureLoader, texture_file_name};
pub use weights::normalize_weights;
