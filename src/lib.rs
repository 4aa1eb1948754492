//! Marionette: scene-graph import and skeletal animation.
//!
//! Hand a decoded [`RawScene`] to [`SceneBuilder`] (or [`build`]) and get a
//! [`Model`] back. Each frame, drive it with [`Model::update`] or
//! [`Model::tick`] and walk [`Model::draw_items`] to render.
//!
//! ```rust,ignore
//! use marionette::{AnimationPlayer, ImportSettings, RawScene, SceneBuilder};
//!
//! let raw = RawScene::from_json_str(&json)?;
//! let mut model = SceneBuilder::new(ImportSettings::default()).build(&raw)?;
//! let mut player = AnimationPlayer::default();
//! model.tick(&mut player, 1.0 / 60.0)?;
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub use marionette_animation as animation;
pub use marionette_assets as assets;
pub use marionette_scene as scene;

pub use marionette_animation::{
    AnimationClip, AnimationPlayer, ChannelSample, Interpolatable, KeyframeTrack, NodeTrack,
};
pub use marionette_assets::{
    FileTextureLoader, ImportSettings, NullTextureLoader, RawScene, SceneBuilder, TextureLoader,
    build,
};
pub use marionette_core::{Aabb, MarionetteError, Result};
pub use marionette_scene::{
    Bone, DrawItem, DuplicateNamePolicy, Material, Mesh, MeshInfo, Model, Node, NodeHandle,
    NodeTree, Texture, Transform, VertexWeight,
};

pub use glam;
